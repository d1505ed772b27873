pub mod balancer;
pub mod config;
pub mod errors;
pub mod math;
pub mod slippage;

pub use errors::PoolScaleError;

pub use balancer::pool_info::{ParsedPoolInfo, WithoutBpt, parse_pool_info, parse_pool_info_with};
pub use balancer::pool_math::{PoolMath, math_for};
pub use balancer::snapshot::{PoolSnapshot, PoolType, TokenSnapshot};

pub use config::{ParseOptions, PrecisionConfig};
pub use math::fixed_point::FixedPoint;
pub use slippage::Slippage;
