use crate::errors::{PoolScaleError, Result};
use alloy_primitives::U256;
use balancer_maths_rust::common::maths::{pow_down_fixed, pow_up_fixed};
use num_bigint::{BigInt, Sign};
use num_traits::Signed;

pub fn to_bigint(value: U256) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}

pub fn to_u256(value: BigInt) -> Result<U256> {
    if value.is_negative() || value.bits() > 256 {
        return Err(PoolScaleError::ArithmeticOverflow("BigInt to U256 conversion"));
    }
    let (_, bytes) = value.to_bytes_be();
    let mut padded_bytes = [0u8; 32];
    padded_bytes[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(U256::from_be_bytes(padded_bytes))
}

// The log/exp power is delegated to the protocol's reference implementation
pub fn pow_down(x: U256, y: U256) -> Result<U256> {
    let result = pow_down_fixed(&to_bigint(x), &to_bigint(y))
        .map_err(|e| PoolScaleError::CalculationError(format!("pow_down: {e:?}")))?;
    to_u256(result)
}

pub fn pow_up(x: U256, y: U256) -> Result<U256> {
    let result = pow_up_fixed(&to_bigint(x), &to_bigint(y))
        .map_err(|e| PoolScaleError::CalculationError(format!("pow_up: {e:?}")))?;
    to_u256(result)
}
