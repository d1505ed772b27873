use crate::errors::{PoolScaleError, Result};
use alloy_primitives::{Address, U256};

/// Placeholder address the vault uses for the chain's native asset.
pub const NATIVE_ASSET: Address = Address::ZERO;

/// Index-aligned per-token columns of a pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenColumns {
    pub tokens: Vec<Address>,
    pub decimals: Vec<u8>,
    pub scaling_factors: Vec<U256>,
    pub balances: Vec<U256>,
    pub upscaled_balances: Vec<U256>,
    pub weights: Vec<U256>,
    pub price_rates: Vec<U256>,
}

impl TokenColumns {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Fails with `MismatchedLengths` unless every column matches the token column.
    pub fn validate(&self) -> Result<()> {
        let expected = self.tokens.len();
        let lengths = [
            self.decimals.len(),
            self.scaling_factors.len(),
            self.balances.len(),
            self.upscaled_balances.len(),
            self.weights.len(),
            self.price_rates.len(),
        ];
        match lengths.into_iter().find(|&actual| actual != expected) {
            Some(actual) => Err(PoolScaleError::MismatchedLengths { expected, actual }),
            None => Ok(()),
        }
    }

    fn permuted(&self, permutation: &[usize]) -> Result<Self> {
        Ok(Self {
            tokens: apply_permutation(&self.tokens, permutation)?,
            decimals: apply_permutation(&self.decimals, permutation)?,
            scaling_factors: apply_permutation(&self.scaling_factors, permutation)?,
            balances: apply_permutation(&self.balances, permutation)?,
            upscaled_balances: apply_permutation(&self.upscaled_balances, permutation)?,
            weights: apply_permutation(&self.weights, permutation)?,
            price_rates: apply_permutation(&self.price_rates, permutation)?,
        })
    }
}

/// Reorders `values` so that `result[i] == values[permutation[i]]`.
pub fn apply_permutation<T: Clone>(values: &[T], permutation: &[usize]) -> Result<Vec<T>> {
    if values.len() != permutation.len() {
        return Err(PoolScaleError::MismatchedLengths {
            expected: permutation.len(),
            actual: values.len(),
        });
    }
    permutation
        .iter()
        .map(|&index| {
            values.get(index).cloned().ok_or(PoolScaleError::InvalidTokenIndex {
                index,
                len: values.len(),
            })
        })
        .collect()
}

/// Puts a pool's tokens into the vault's ascending address order.
///
/// One permutation is computed from the addresses and applied to every
/// column, so no column is ever sorted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetHelpers {
    wrapped_native_asset: Address,
}

impl AssetHelpers {
    pub fn new(wrapped_native_asset: Address) -> Self {
        Self { wrapped_native_asset }
    }

    pub fn wrapped_native_asset(&self) -> Address {
        self.wrapped_native_asset
    }

    pub fn is_native(&self, token: Address) -> bool {
        token == NATIVE_ASSET
    }

    /// The ERC20 the vault actually holds for `token`.
    pub fn translate_to_erc20(&self, token: Address) -> Address {
        if self.is_native(token) { self.wrapped_native_asset } else { token }
    }

    /// Computes the permutation that puts `tokens` in vault order. The
    /// native asset sorts in the position of its wrapped token.
    pub fn sort_permutation(&self, tokens: &[Address]) -> Result<Vec<usize>> {
        let keys: Vec<Address> = tokens.iter().map(|&token| self.translate_to_erc20(token)).collect();
        let mut permutation: Vec<usize> = (0..tokens.len()).collect();
        permutation.sort_by_key(|&index| keys[index]);

        if let Some(pair) = permutation.windows(2).find(|pair| keys[pair[0]] == keys[pair[1]]) {
            return Err(PoolScaleError::MalformedSnapshot(format!(
                "duplicate token {} in pool",
                keys[pair[0]]
            )));
        }
        Ok(permutation)
    }

    /// Sorts every column together into vault order.
    pub fn sort_tokens(&self, columns: &TokenColumns) -> Result<TokenColumns> {
        columns.validate()?;
        let permutation = self.sort_permutation(&columns.tokens)?;
        tracing::trace!(?permutation, "Sorting pool tokens into vault order");
        columns.permuted(&permutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");
    const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
    const WBTC: Address = address!("2260fac5e5542a773aa44fbcfedf7c193bc2c599");

    fn columns(tokens: Vec<Address>) -> TokenColumns {
        let n = tokens.len();
        let ids = |offset: u64| (0..n as u64).map(|i| U256::from(offset + i)).collect::<Vec<_>>();
        TokenColumns {
            decimals: (0..n as u8).collect(),
            scaling_factors: ids(100),
            balances: ids(200),
            upscaled_balances: ids(300),
            weights: ids(400),
            price_rates: ids(500),
            tokens,
        }
    }

    #[test]
    fn test_sorts_all_columns_together() {
        let helpers = AssetHelpers::new(WETH);
        let sorted = helpers.sort_tokens(&columns(vec![WETH, DAI, USDC, WBTC])).unwrap();

        assert_eq!(sorted.tokens, vec![WBTC, DAI, USDC, WETH]);
        assert_eq!(sorted.decimals, vec![3, 1, 2, 0]);
        assert_eq!(sorted.balances, vec![U256::from(203), U256::from(201), U256::from(202), U256::from(200)]);
        assert_eq!(sorted.price_rates[0], U256::from(503));
        assert_eq!(sorted.weights[3], U256::from(400));
    }

    #[test]
    fn test_native_asset_sorts_as_wrapped() {
        let helpers = AssetHelpers::new(WETH);
        let sorted = helpers.sort_tokens(&columns(vec![NATIVE_ASSET, USDC, DAI])).unwrap();

        // zero would sort first by raw address, WETH sorts last
        assert_eq!(sorted.tokens, vec![DAI, USDC, NATIVE_ASSET]);
        assert_eq!(sorted.decimals, vec![2, 1, 0]);
    }

    #[test]
    fn test_native_and_wrapped_together_is_rejected() {
        let helpers = AssetHelpers::new(WETH);
        assert!(matches!(
            helpers.sort_permutation(&[WETH, NATIVE_ASSET]),
            Err(PoolScaleError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_mismatched_columns() {
        let helpers = AssetHelpers::new(WETH);
        let mut bad = columns(vec![DAI, USDC]);
        bad.weights.pop();
        assert_eq!(
            helpers.sort_tokens(&bad),
            Err(PoolScaleError::MismatchedLengths { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_apply_permutation() {
        assert_eq!(apply_permutation(&["a", "b", "c"], &[2, 0, 1]).unwrap(), vec!["c", "a", "b"]);
        assert!(apply_permutation(&["a"], &[0, 1]).is_err());
        assert!(apply_permutation(&["a", "b"], &[0, 5]).is_err());
    }
}
