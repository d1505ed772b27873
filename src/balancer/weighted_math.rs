use crate::{
    errors::{PoolScaleError, Result},
    math::fixed_point::FixedPoint,
};
use alloy_primitives::U256;

// Swap limits: amounts swapped may not be larger than this percentage of total balance.
// 0.3 under the pool's precision
fn max_ratio(precision: FixedPoint) -> U256 {
    precision.one() * U256::from(3) / U256::from(10)
}

/// Calculates the invariant for a weighted pool.
/// V = product(balance_i ^ weight_i)
pub fn calculate_invariant(normalized_weights: &[U256], balances: &[U256], precision: FixedPoint) -> Result<U256> {
    if normalized_weights.len() != balances.len() {
        return Err(PoolScaleError::MismatchedLengths {
            expected: normalized_weights.len(),
            actual: balances.len(),
        });
    }
    let mut invariant = precision.one();
    for (&weight, &balance) in normalized_weights.iter().zip(balances) {
        invariant = precision.mul_down(invariant, precision.pow_down(balance, weight)?)?;
    }
    if invariant.is_zero() {
        return Err(PoolScaleError::CalculationError("ZERO_INVARIANT".into()));
    }
    Ok(invariant)
}

/// Computes how many tokens can be taken out of a pool if `amount_in` are sent.
pub fn calc_out_given_in(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    amount_in: U256,
    precision: FixedPoint,
) -> Result<U256> {
    // Formula: aO = bO * (1 - (bI / (bI + aI))^(wI / wO))
    if amount_in > precision.mul_down(balance_in, max_ratio(precision))? {
        return Err(PoolScaleError::CalculationError("MAX_IN_RATIO".into()));
    }

    let denominator = balance_in
        .checked_add(amount_in)
        .ok_or(PoolScaleError::ArithmeticOverflow("calc_out_given_in"))?;
    // The base rounds up so the power, and with it the complement, stays protocol-favourable
    let base = precision.div_up(balance_in, denominator)?;
    let exponent = precision.div_down(weight_in, weight_out)?;
    let power = precision.pow_up(base, exponent)?;

    precision.mul_down(balance_out, precision.complement(power))
}

/// Computes how many tokens must be sent to a pool in order to take `amount_out`.
pub fn calc_in_given_out(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    amount_out: U256,
    precision: FixedPoint,
) -> Result<U256> {
    // Formula: aI = bI * ((bO / (bO - aO))^(wO / wI) - 1)
    if amount_out > precision.mul_down(balance_out, max_ratio(precision))? {
        return Err(PoolScaleError::CalculationError("MAX_OUT_RATIO".into()));
    }

    let base = precision.div_up(balance_out, balance_out - amount_out)?;
    let exponent = precision.div_up(weight_out, weight_in)?;
    let power = precision.pow_up(base, exponent)?;

    let ratio = power.saturating_sub(precision.one());
    precision.mul_up(balance_in, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::ONE;

    const WAD: FixedPoint = FixedPoint::WAD;

    fn wad(n: u64) -> U256 {
        U256::from(n) * ONE
    }

    const HALF: U256 = U256::from_limbs([500_000_000_000_000_000, 0, 0, 0]);

    #[test]
    fn test_equal_weights_out_given_in() {
        let out = calc_out_given_in(wad(1000), HALF, wad(1000), HALF, wad(10), WAD).unwrap();
        // 1000 * (1 - ceil(1000 / 1010)) at 18 decimals
        assert_eq!(out, U256::from(9_900_990_099_009_900_000u64));
        assert!(out < wad(10));
    }

    #[test]
    fn test_equal_weights_in_given_out() {
        let amount_in = calc_in_given_out(wad(1000), HALF, wad(1000), HALF, wad(10), WAD).unwrap();
        // 1000 * (ceil(1000 / 990) - 1)
        assert_eq!(amount_in, U256::from(10_101_010_101_010_102_000u64));
        assert!(amount_in > wad(10));
    }

    #[test]
    fn test_ratio_guards() {
        assert_eq!(
            calc_out_given_in(wad(100), HALF, wad(100), HALF, wad(31), WAD),
            Err(PoolScaleError::CalculationError("MAX_IN_RATIO".into()))
        );
        assert_eq!(
            calc_in_given_out(wad(100), HALF, wad(100), HALF, wad(31), WAD),
            Err(PoolScaleError::CalculationError("MAX_OUT_RATIO".into()))
        );
    }

    #[test]
    fn test_invariant_length_mismatch() {
        assert!(matches!(
            calculate_invariant(&[HALF, HALF], &[wad(1)], WAD),
            Err(PoolScaleError::MismatchedLengths { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_single_unit_weight_invariant() {
        // balance^1 takes the exact fast path
        assert_eq!(calculate_invariant(&[ONE], &[wad(42)], WAD).unwrap(), wad(42));
    }

    #[test]
    fn test_out_given_in_at_twelve_decimals() {
        // the same 1000/1000 swap of 10, expressed with 12 decimals
        let pico = FixedPoint::new(12).unwrap();
        let thousand = U256::from(1_000_000_000_000_000u64);
        let half = U256::from(500_000_000_000u64);
        let out = calc_out_given_in(thousand, half, thousand, half, U256::from(10_000_000_000_000u64), pico).unwrap();
        assert_eq!(out, U256::from(9_900_990_099_000u64));
    }
}
