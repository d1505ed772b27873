use crate::{
    errors::Result,
    math::{
        constants::{AMP_DECIMALS, DEFAULT_DECIMALS},
        fixed_point::FixedPoint,
    },
};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Precision conventions of the target protocol deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrecisionConfig {
    /// Decimals of the common internal precision (balances, weights, rates, fees).
    pub decimals: u8,
    /// Decimals of the amplification parameter.
    pub amp_decimals: u8,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            amp_decimals: AMP_DECIMALS,
        }
    }
}

impl PrecisionConfig {
    pub fn fixed_point(&self) -> Result<FixedPoint> {
        FixedPoint::new(self.decimals)
    }

    pub fn amp_fixed_point(&self) -> Result<FixedPoint> {
        FixedPoint::new(self.amp_decimals)
    }
}

/// Options for [`parse_pool_info_with`](crate::balancer::pool_info::parse_pool_info_with).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// When set, tokens are sorted into vault order and this token is
    /// treated as the wrapped form of the native asset.
    pub wrapped_native_asset: Option<Address>,
    /// Keep the wrapped native asset's address instead of replacing it with
    /// the native asset sentinel.
    pub unwrap_native_asset: bool,
    pub precision: PrecisionConfig,
}

impl ParseOptions {
    pub fn new(wrapped_native_asset: Option<Address>, unwrap_native_asset: bool) -> Self {
        Self {
            wrapped_native_asset,
            unwrap_native_asset,
            precision: PrecisionConfig::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
