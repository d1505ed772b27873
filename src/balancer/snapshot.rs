use crate::errors::Result;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Invariant family a pool's swap and join/exit math belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantFamily {
    Weighted,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    Weighted,
    LiquidityBootstrapping,
    Investment,
    Stable,
    MetaStable,
    ComposableStable,
    StablePhantom,
    #[serde(other)]
    Unknown,
}

impl PoolType {
    pub fn family(&self) -> Option<InvariantFamily> {
        match self {
            PoolType::Weighted | PoolType::LiquidityBootstrapping | PoolType::Investment => {
                Some(InvariantFamily::Weighted)
            }
            PoolType::Stable
            | PoolType::MetaStable
            | PoolType::ComposableStable
            | PoolType::StablePhantom => Some(InvariantFamily::Stable),
            PoolType::Unknown => None,
        }
    }
}

/// A token entry as reported by the data source, in human scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSnapshot {
    pub address: Address,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    pub balance: String,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub price_rate: Option<String>,
    #[serde(default)]
    pub index: Option<usize>,
}

impl TokenSnapshot {
    pub fn new(address: Address, decimals: u8, balance: impl Into<String>) -> Self {
        Self {
            address,
            symbol: None,
            decimals: Some(decimals),
            balance: balance.into(),
            weight: None,
            price_rate: None,
            index: None,
        }
    }

    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn with_price_rate(mut self, price_rate: impl Into<String>) -> Self {
        self.price_rate = Some(price_rate.into());
        self
    }
}

/// A pool's on-chain state in human-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    #[serde(default)]
    pub id: String,
    /// The pool contract, which is also the pool's liquidity token (BPT).
    pub address: Address,
    pub pool_type: PoolType,
    pub tokens: Vec<TokenSnapshot>,
    pub total_shares: String,
    pub swap_fee: String,
    #[serde(default)]
    pub amp: Option<String>,
}

impl PoolSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
