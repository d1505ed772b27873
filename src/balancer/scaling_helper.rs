use crate::{
    errors::{PoolScaleError, Result},
    math::fixed_point::FixedPoint,
};
use alloy_primitives::U256;

/// Computes the factor that lifts a token's raw balance into the common
/// internal precision, composed with its price rate.
///
/// The factor is a fixed-point value equal to `10^(precision - decimals) * rate`,
/// so `upscale(raw, factor, precision)` yields the balance at `precision` decimals. It
/// only ever upscales: tokens with more decimals than the precision are
/// rejected, and so is a rate that would push the factor below `1.0`.
pub fn compute_scaling_factor(decimals: u8, price_rate: Option<U256>, precision: FixedPoint) -> Result<U256> {
    let decimals_diff = precision
        .decimals()
        .checked_sub(decimals)
        .ok_or(PoolScaleError::InvalidDecimals { decimals, max: precision.decimals() })?;
    let base = U256::from(10)
        .checked_pow(U256::from(decimals_diff))
        .and_then(|factor| factor.checked_mul(precision.one()))
        .ok_or(PoolScaleError::ArithmeticOverflow("compute_scaling_factor"))?;

    let Some(rate) = price_rate else {
        return Ok(base);
    };
    let factor = precision.mul_down(base, rate)?;
    if factor < precision.one() {
        return Err(PoolScaleError::InvalidPriceRate { rate, decimals });
    }
    Ok(factor)
}

pub fn upscale(amount: U256, scaling_factor: U256, precision: FixedPoint) -> Result<U256> {
    precision.mul_down(amount, scaling_factor)
}

/// Upscales every amount by its index-aligned factor under `precision`.
pub fn upscale_array(amounts: &[U256], scaling_factors: &[U256], precision: FixedPoint) -> Result<Vec<U256>> {
    if amounts.len() != scaling_factors.len() {
        return Err(PoolScaleError::MismatchedLengths {
            expected: scaling_factors.len(),
            actual: amounts.len(),
        });
    }
    amounts
        .iter()
        .zip(scaling_factors)
        .map(|(&amount, &factor)| upscale(amount, factor, precision))
        .collect()
}

pub fn downscale_down(amount: U256, scaling_factor: U256, precision: FixedPoint) -> Result<U256> {
    precision.div_down(amount, scaling_factor)
}

pub fn downscale_up(amount: U256, scaling_factor: U256, precision: FixedPoint) -> Result<U256> {
    precision.div_up(amount, scaling_factor)
}
