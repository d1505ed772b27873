pub mod asset_helpers;
pub mod pool_info;
pub mod pool_math;
pub mod scaling_helper;
pub mod snapshot;
pub mod stable_math;
pub mod weighted_math;
