use alloy_primitives::U256;

// Unless configured otherwise, fixed-point numbers carry 18 decimals
pub const ONE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
pub const TWO: U256 = U256::from_limbs([2_000_000_000_000_000_000, 0, 0, 0]);
pub const FOUR: U256 = U256::from_limbs([4_000_000_000_000_000_000, 0, 0, 0]);

pub const DEFAULT_DECIMALS: u8 = 18;

// The amplification parameter keeps its own reduced precision (3 decimals)
pub const AMP_DECIMALS: u8 = 3;
pub const AMP_PRECISION: U256 = U256::from_limbs([1_000, 0, 0, 0]);
