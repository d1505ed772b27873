use crate::{
    errors::{PoolScaleError, Result},
    math::{
        constants::{DEFAULT_DECIMALS, ONE},
        fixed_point as fp,
        units::{format_fixed, parse_fixed},
    },
};
use alloy_primitives::U256;
use std::fmt;

const MAX_BPS: u32 = 10_000;

/// A slippage tolerance for transaction limits.
///
/// Bounds round toward the caller's worse case: a minimum amount out
/// rounds down and a maximum amount in rounds up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slippage {
    /// 1 bp = 0.01%, 10 000 bp = 100%.
    BasisPoints(u32),
    /// An 18-decimal fixed-point fraction, `10^16` = 1%.
    Fraction(U256),
}

impl Slippage {
    /// Parses a decimal fraction such as `"0.01"` (1%).
    pub fn from_fraction_str(value: &str) -> Result<Self> {
        parse_fixed(value, DEFAULT_DECIMALS)
            .map(Slippage::Fraction)
            .map_err(|_| PoolScaleError::InvalidTolerance(format!("{value:?} is not a non-negative fraction")))
    }

    /// The tolerance as an 18-decimal fraction.
    pub fn as_fraction(&self) -> U256 {
        match *self {
            // 1 bp = 10^14 at 18 decimals
            Slippage::BasisPoints(bps) => U256::from(bps) * U256::from(100_000_000_000_000u64),
            Slippage::Fraction(fraction) => fraction,
        }
    }

    /// Lower bound for an amount the caller receives: `floor(amount * (1 - t))`.
    pub fn min_amount_out(&self, amount: U256) -> Result<U256> {
        let fraction = self.as_fraction();
        if fraction > ONE {
            return Err(PoolScaleError::InvalidTolerance(format!(
                "{self} would make the minimum amount negative"
            )));
        }
        fp::mul_down(amount, ONE - fraction)
    }

    /// Upper bound for an amount the caller pays: `ceil(amount * (1 + t))`.
    pub fn max_amount_in(&self, amount: U256) -> Result<U256> {
        let factor = ONE
            .checked_add(self.as_fraction())
            .ok_or(PoolScaleError::ArithmeticOverflow("max_amount_in"))?;
        fp::mul_up(amount, factor)
    }
}

impl fmt::Display for Slippage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slippage::BasisPoints(bps) => write!(f, "{bps}bp"),
            Slippage::Fraction(fraction) => write!(f, "{}", format_fixed(*fraction, DEFAULT_DECIMALS)),
        }
    }
}

/// `amount` reduced by `slippage_bps` basis points, rounded down.
pub fn subtract_slippage(amount: U256, slippage_bps: u32) -> Result<U256> {
    if slippage_bps > MAX_BPS {
        return Err(PoolScaleError::InvalidTolerance(format!("{slippage_bps}bp exceeds 100%")));
    }
    Slippage::BasisPoints(slippage_bps).min_amount_out(amount)
}

/// `amount` increased by `slippage_bps` basis points, rounded up.
pub fn add_slippage(amount: U256, slippage_bps: u32) -> Result<U256> {
    Slippage::BasisPoints(slippage_bps).max_amount_in(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_percent_bounds() {
        let slippage = Slippage::from_fraction_str("0.01").unwrap();
        assert_eq!(slippage, Slippage::Fraction(U256::from(10_000_000_000_000_000u64)));
        assert_eq!(slippage.min_amount_out(U256::from(1000)).unwrap(), U256::from(990));
        assert_eq!(slippage.max_amount_in(U256::from(1000)).unwrap(), U256::from(1010));
    }

    #[test]
    fn test_rounding_against_the_caller() {
        // 1001 * 0.99 = 990.99 and 1001 * 1.01 = 1011.01
        assert_eq!(subtract_slippage(U256::from(1001), 100).unwrap(), U256::from(990));
        assert_eq!(add_slippage(U256::from(1001), 100).unwrap(), U256::from(1012));
    }

    #[test]
    fn test_basis_points_match_fraction() {
        assert_eq!(Slippage::BasisPoints(100).as_fraction(), Slippage::from_fraction_str("0.01").unwrap().as_fraction());
        assert_eq!(Slippage::BasisPoints(MAX_BPS).as_fraction(), ONE);
    }

    #[test]
    fn test_display() {
        assert_eq!(Slippage::BasisPoints(50).to_string(), "50bp");
        assert_eq!(Slippage::from_fraction_str("0.015").unwrap().to_string(), "0.015");
    }

    #[test]
    fn test_invalid_tolerance() {
        assert!(matches!(Slippage::from_fraction_str("-0.01"), Err(PoolScaleError::InvalidTolerance(_))));
        assert!(matches!(Slippage::from_fraction_str("one"), Err(PoolScaleError::InvalidTolerance(_))));
        assert!(matches!(subtract_slippage(U256::from(1000), 10_001), Err(PoolScaleError::InvalidTolerance(_))));
        assert!(matches!(
            Slippage::Fraction(ONE + U256::from(1)).min_amount_out(U256::from(1000)),
            Err(PoolScaleError::InvalidTolerance(_))
        ));
        // 100% is allowed and leaves nothing
        assert_eq!(Slippage::BasisPoints(MAX_BPS).min_amount_out(U256::from(1000)).unwrap(), U256::ZERO);
    }
}
