pub mod constants;
pub mod fixed_point;
pub mod log_exp_math;
pub mod units;
