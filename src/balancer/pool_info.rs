use crate::{
    balancer::{
        asset_helpers::{AssetHelpers, NATIVE_ASSET, TokenColumns},
        scaling_helper::{compute_scaling_factor, upscale_array},
        snapshot::{PoolSnapshot, PoolType, TokenSnapshot},
    },
    config::{ParseOptions, PrecisionConfig},
    errors::{PoolScaleError, Result},
    math::{fixed_point::FixedPoint, units::parse_fixed},
};
use alloy_primitives::{Address, U256};
use itertools::Itertools;
use serde::Serialize;

/// A pool snapshot normalized into the exact integers the vault computes with.
///
/// Every per-token column is index-aligned with `tokens`. Integers serialize
/// as base-10 numeral strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPoolInfo {
    pub pool_type: PoolType,
    pub address: Address,
    pub tokens: Vec<Address>,
    pub decimals: Vec<u8>,
    /// Raw balances in each token's native decimals.
    #[serde(serialize_with = "decimal_strings::many")]
    pub balances: Vec<U256>,
    #[serde(serialize_with = "decimal_strings::many")]
    pub weights: Vec<U256>,
    #[serde(serialize_with = "decimal_strings::many")]
    pub price_rates: Vec<U256>,
    /// Balances lifted to the common precision, rates included.
    #[serde(serialize_with = "decimal_strings::many")]
    pub upscaled_balances: Vec<U256>,
    #[serde(serialize_with = "decimal_strings::many")]
    pub scaling_factors: Vec<U256>,
    /// Amplification parameter at `precision.amp_decimals` (3 by default).
    #[serde(serialize_with = "decimal_strings::optional")]
    pub amp: Option<U256>,
    #[serde(serialize_with = "decimal_strings::one")]
    pub total_shares: U256,
    #[serde(serialize_with = "decimal_strings::one")]
    pub swap_fee: U256,
    /// Position of the pool's own liquidity token among `tokens`.
    pub bpt_index: Option<usize>,
    pub without_bpt: WithoutBpt,
    /// Precision every integer above was produced at.
    pub precision: PrecisionConfig,
}

/// The pool's columns with the BPT entry removed. Identical to the full
/// columns when the pool does not hold its own token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithoutBpt {
    pub tokens: Vec<Address>,
    #[serde(serialize_with = "decimal_strings::many")]
    pub balances: Vec<U256>,
    #[serde(serialize_with = "decimal_strings::many")]
    pub scaling_factors: Vec<U256>,
    #[serde(serialize_with = "decimal_strings::many")]
    pub price_rates: Vec<U256>,
    #[serde(serialize_with = "decimal_strings::many")]
    pub upscaled_balances: Vec<U256>,
}

impl WithoutBpt {
    fn from_columns(columns: &TokenColumns, bpt_index: Option<usize>) -> Self {
        Self {
            tokens: remove_index(&columns.tokens, bpt_index),
            balances: remove_index(&columns.balances, bpt_index),
            scaling_factors: remove_index(&columns.scaling_factors, bpt_index),
            price_rates: remove_index(&columns.price_rates, bpt_index),
            upscaled_balances: remove_index(&columns.upscaled_balances, bpt_index),
        }
    }
}

fn remove_index<T: Clone>(values: &[T], index: Option<usize>) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter(|&(i, _)| Some(i) != index)
        .map(|(_, value)| value.clone())
        .collect()
}

impl ParsedPoolInfo {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token_index(&self, token: Address) -> Option<usize> {
        self.tokens.iter().position(|&t| t == token)
    }

    /// Maps an index of `tokens` to the matching index of the `without_bpt`
    /// columns. The BPT itself has no such index.
    pub fn index_without_bpt(&self, index: usize) -> Result<usize> {
        if index >= self.len() {
            return Err(PoolScaleError::InvalidTokenIndex { index, len: self.len() });
        }
        match self.bpt_index {
            Some(bpt) if index == bpt => Err(PoolScaleError::CalculationError(
                "the pool token has no entry without BPT".into(),
            )),
            Some(bpt) if index > bpt => Ok(index - 1),
            _ => Ok(index),
        }
    }

    /// Fixed-point precision of balances, weights, rates and fees.
    pub fn fixed_point(&self) -> Result<FixedPoint> {
        self.precision.fixed_point()
    }

    /// Fixed-point precision of `amp`.
    pub fn amp_fixed_point(&self) -> Result<FixedPoint> {
        self.precision.amp_fixed_point()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parses a pool snapshot into vault integers.
///
/// With `wrapped_native_asset` set, the tokens are sorted into vault order.
/// Unless `unwrap_native_asset` is set, the wrapped native asset's address is
/// replaced by the native asset placeholder first.
pub fn parse_pool_info(
    pool: &PoolSnapshot,
    wrapped_native_asset: Option<Address>,
    unwrap_native_asset: bool,
) -> Result<ParsedPoolInfo> {
    parse_pool_info_with(pool, &ParseOptions::new(wrapped_native_asset, unwrap_native_asset))
}

pub fn parse_pool_info_with(pool: &PoolSnapshot, options: &ParseOptions) -> Result<ParsedPoolInfo> {
    let precision = options.precision.fixed_point()?;
    let amp_precision = options.precision.amp_fixed_point()?;

    let (tokens, decimals, balances, weights, price_rates, scaling_factors): (
        Vec<Address>,
        Vec<u8>,
        Vec<U256>,
        Vec<U256>,
        Vec<U256>,
        Vec<U256>,
    ) = pool
        .tokens
        .iter()
        .map(|token| parse_token(token, options, precision))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .multiunzip();
    let upscaled_balances = upscale_array(&balances, &scaling_factors, precision)?;

    let mut columns = TokenColumns {
        tokens,
        decimals,
        scaling_factors,
        balances,
        upscaled_balances,
        weights,
        price_rates,
    };
    if let Some(wrapped) = options.wrapped_native_asset {
        columns = AssetHelpers::new(wrapped).sort_tokens(&columns)?;
    }

    // The vault keeps the amplification parameter at reduced precision
    let amp = pool
        .amp
        .as_deref()
        .map(|amp| parse_field("amp", amp, amp_precision.decimals()))
        .transpose()?;
    let total_shares = parse_field("totalShares", &pool.total_shares, precision.decimals())?;
    let swap_fee = parse_field("swapFee", &pool.swap_fee, precision.decimals())?;

    let bpt_index = columns.tokens.iter().position(|&token| token == pool.address);
    let without_bpt = WithoutBpt::from_columns(&columns, bpt_index);

    tracing::debug!(
        pool_id = %pool.id,
        address = ?pool.address,
        tokens = columns.len(),
        ?bpt_index,
        "Parsed pool info"
    );

    Ok(ParsedPoolInfo {
        pool_type: pool.pool_type.clone(),
        address: pool.address,
        tokens: columns.tokens,
        decimals: columns.decimals,
        balances: columns.balances,
        weights: columns.weights,
        price_rates: columns.price_rates,
        upscaled_balances: columns.upscaled_balances,
        scaling_factors: columns.scaling_factors,
        amp,
        total_shares,
        swap_fee,
        bpt_index,
        without_bpt,
        precision: options.precision,
    })
}

fn parse_token(
    token: &TokenSnapshot,
    options: &ParseOptions,
    precision: FixedPoint,
) -> Result<(Address, u8, U256, U256, U256, U256)> {
    let address = match options.wrapped_native_asset {
        Some(wrapped) if !options.unwrap_native_asset && token.address == wrapped => NATIVE_ASSET,
        _ => token.address,
    };
    let decimals = token.decimals.unwrap_or(precision.decimals());

    let balance = parse_field("balance", &token.balance, decimals)?;
    let weight = token
        .weight
        .as_deref()
        .map(|weight| parse_field("weight", weight, precision.decimals()))
        .transpose()?;
    let price_rate = token
        .price_rate
        .as_deref()
        .map(|rate| parse_field("priceRate", rate, precision.decimals()))
        .transpose()?;
    let scaling_factor = compute_scaling_factor(decimals, price_rate, precision)?;

    Ok((
        address,
        decimals,
        balance,
        weight.unwrap_or(precision.one()),
        price_rate.unwrap_or(precision.one()),
        scaling_factor,
    ))
}

fn parse_field(field: &str, value: &str, decimals: u8) -> Result<U256> {
    parse_fixed(value, decimals).map_err(|err| match err {
        PoolScaleError::MalformedSnapshot(reason) => {
            PoolScaleError::MalformedSnapshot(format!("{field}: {reason}"))
        }
        other => other,
    })
}

mod decimal_strings {
    use alloy_primitives::U256;
    use serde::Serializer;

    pub fn one<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn many<S: Serializer>(values: &[U256], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(U256::to_string))
    }

    pub fn optional<S: Serializer>(value: &Option<U256>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }
}
