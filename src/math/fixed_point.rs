use crate::{
    errors::{PoolScaleError, Result},
    math::{
        constants::*,
        log_exp_math,
    },
};
use alloy_primitives::U256;

/// An implicit decimal precision for fixed-point values.
///
/// A value `v` stored under this precision represents `v / 10^decimals`.
/// Every operation mirrors the vault's 256-bit checked arithmetic: an
/// intermediate product that does not fit in 256 bits is an error, never a
/// wrap or a silent widening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    decimals: u8,
    one: U256,
}

impl FixedPoint {
    /// 18 decimals, the precision of balances, weights, rates and fees.
    pub const WAD: FixedPoint = FixedPoint { decimals: DEFAULT_DECIMALS, one: ONE };

    /// 3 decimals, the precision of the amplification parameter.
    pub const AMP: FixedPoint = FixedPoint { decimals: AMP_DECIMALS, one: AMP_PRECISION };

    pub fn new(decimals: u8) -> Result<Self> {
        let one = U256::from(10)
            .checked_pow(U256::from(decimals))
            .ok_or(PoolScaleError::ArithmeticOverflow("precision"))?;
        Ok(Self { decimals, one })
    }

    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// The representation of `1.0` under this precision.
    pub const fn one(&self) -> U256 {
        self.one
    }

    /// Equivalent to `floor(a * b)` in fixed-point math
    pub fn mul_down(&self, a: U256, b: U256) -> Result<U256> {
        let product = a
            .checked_mul(b)
            .ok_or(PoolScaleError::ArithmeticOverflow("mul_down"))?;
        Ok(product / self.one)
    }

    /// Equivalent to `ceil(a * b)` in fixed-point math
    pub fn mul_up(&self, a: U256, b: U256) -> Result<U256> {
        let product = a
            .checked_mul(b)
            .ok_or(PoolScaleError::ArithmeticOverflow("mul_up"))?;
        if product.is_zero() {
            return Ok(U256::ZERO);
        }
        Ok((product - U256::from(1)) / self.one + U256::from(1))
    }

    /// Equivalent to `floor(a / b)` in fixed-point math
    pub fn div_down(&self, a: U256, b: U256) -> Result<U256> {
        if b.is_zero() {
            return Err(PoolScaleError::DivisionByZero("div_down"));
        }
        if a.is_zero() {
            return Ok(U256::ZERO);
        }
        let a_inflated = a
            .checked_mul(self.one)
            .ok_or(PoolScaleError::ArithmeticOverflow("div_down"))?;
        Ok(a_inflated / b)
    }

    /// Equivalent to `ceil(a / b)` in fixed-point math
    pub fn div_up(&self, a: U256, b: U256) -> Result<U256> {
        if b.is_zero() {
            return Err(PoolScaleError::DivisionByZero("div_up"));
        }
        if a.is_zero() {
            return Ok(U256::ZERO);
        }
        let a_inflated = a
            .checked_mul(self.one)
            .ok_or(PoolScaleError::ArithmeticOverflow("div_up"))?;
        Ok((a_inflated - U256::from(1)) / b + U256::from(1))
    }

    /// Returns `1 - x`, floored at zero
    pub fn complement(&self, x: U256) -> U256 {
        if x < self.one { self.one - x } else { U256::ZERO }
    }

    /// Re-expresses `x` under `target`. Digits dropped by a coarser target
    /// round up when `round_up` is set.
    pub fn rescale(&self, x: U256, target: FixedPoint, round_up: bool) -> Result<U256> {
        if target.one >= self.one {
            return x
                .checked_mul(target.one / self.one)
                .ok_or(PoolScaleError::ArithmeticOverflow("rescale"));
        }
        let divisor = self.one / target.one;
        let quotient = x / divisor;
        if round_up && !(x % divisor).is_zero() {
            return Ok(quotient + U256::from(1));
        }
        Ok(quotient)
    }

    /// `x^y` rounding down. Powers are evaluated at 18 decimals.
    pub fn pow_down(&self, x: U256, y: U256) -> Result<U256> {
        if *self == Self::WAD {
            return pow_down(x, y);
        }
        let power = pow_down(self.rescale(x, Self::WAD, false)?, self.rescale(y, Self::WAD, false)?)?;
        Self::WAD.rescale(power, *self, false)
    }

    /// `x^y` rounding up. Powers are evaluated at 18 decimals.
    pub fn pow_up(&self, x: U256, y: U256) -> Result<U256> {
        if *self == Self::WAD {
            return pow_up(x, y);
        }
        let power = pow_up(self.rescale(x, Self::WAD, true)?, self.rescale(y, Self::WAD, true)?)?;
        Self::WAD.rescale(power, *self, true)
    }
}

impl Default for FixedPoint {
    fn default() -> Self {
        Self::WAD
    }
}

pub fn mul_down(a: U256, b: U256) -> Result<U256> {
    FixedPoint::WAD.mul_down(a, b)
}

pub fn mul_up(a: U256, b: U256) -> Result<U256> {
    FixedPoint::WAD.mul_up(a, b)
}

pub fn div_down(a: U256, b: U256) -> Result<U256> {
    FixedPoint::WAD.div_down(a, b)
}

pub fn div_up(a: U256, b: U256) -> Result<U256> {
    FixedPoint::WAD.div_up(a, b)
}

pub fn complement(x: U256) -> U256 {
    FixedPoint::WAD.complement(x)
}

/// Calculates `x^y` rounding down.
pub fn pow_down(x: U256, y: U256) -> Result<U256> {
    // Optimizations for common exponents
    if y == ONE {
        return Ok(x);
    }
    if y == TWO {
        return mul_down(x, x);
    }
    if y == FOUR {
        let square = mul_down(x, x)?;
        return mul_down(square, square);
    }
    log_exp_math::pow_down(x, y)
}

/// Calculates `x^y` rounding up.
pub fn pow_up(x: U256, y: U256) -> Result<U256> {
    // Optimizations for common exponents
    if y == ONE {
        return Ok(x);
    }
    if y == TWO {
        return mul_up(x, x);
    }
    if y == FOUR {
        let square = mul_up(x, x)?;
        return mul_up(square, square);
    }
    log_exp_math::pow_up(x, y)
}
