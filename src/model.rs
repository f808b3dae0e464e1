use std::collections::BTreeMap;
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::registry::{ChainConfig, ChainId, TokenConfig};

/// Amounts travel as base-10 strings, never hex or JSON numbers.
mod decimal {
    use alloy::primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        U256::from_str_radix(&s, 10).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyBreakdown {
    pub chain_id: ChainId,
    #[schema(value_type = String, example = "0x8F452a1fdd388A45e1080992eFF051b4dd9048d2")]
    pub token_address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(with = "decimal")]
    #[schema(value_type = String, example = "1000000000000000000000000")]
    pub total_supply_raw: U256,
    #[serde(with = "decimal")]
    #[schema(value_type = String, example = "0")]
    pub burned_zero_raw: U256,
    #[serde(with = "decimal")]
    #[schema(value_type = String, example = "0")]
    pub burned_dead_raw: U256,
    #[serde(with = "decimal")]
    #[schema(value_type = String, example = "1000000000000000000000000")]
    pub total_supply_adjusted_raw: U256,
    #[serde(with = "decimal")]
    #[schema(value_type = String, example = "1000000000000000000000000")]
    pub circulating_supply_raw: U256,
}

impl SupplyBreakdown {
    pub fn compute(
        chain_id: ChainId,
        token_address: Address,
        symbol: String,
        decimals: u8,
        total_supply: U256,
        burned_zero: U256,
        burned_dead: U256,
    ) -> Self {
        // a burn sum past uint256 already exceeds any total supply, so saturating is exact
        let burned = burned_zero.saturating_add(burned_dead);
        let adjusted = total_supply.saturating_sub(burned);

        Self {
            chain_id,
            token_address,
            symbol,
            decimals,
            total_supply_raw: total_supply,
            burned_zero_raw: burned_zero,
            burned_dead_raw: burned_dead,
            total_supply_adjusted_raw: adjusted,
            circulating_supply_raw: adjusted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupplyData {
    pub data: SupplyBreakdown,
}

/// Flat shape consumed by listing sites on `/api/v1/supply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SupplyV1 {
    pub symbol: String,
    #[schema(value_type = String)]
    pub address: Address,
    pub chain: ChainId,
    pub decimals: u8,
    #[serde(with = "decimal")]
    #[schema(value_type = String)]
    pub total_supply: U256,
    #[serde(with = "decimal")]
    #[schema(value_type = String)]
    pub burned_zero: U256,
    #[serde(with = "decimal")]
    #[schema(value_type = String)]
    pub burned_dead: U256,
    #[serde(with = "decimal")]
    #[schema(value_type = String)]
    pub total_supply_adjusted: U256,
    #[serde(with = "decimal")]
    #[schema(value_type = String)]
    pub circulating_supply: U256,
}

impl From<SupplyBreakdown> for SupplyV1 {
    fn from(s: SupplyBreakdown) -> Self {
        Self {
            symbol: s.symbol,
            address: s.token_address,
            chain: s.chain_id,
            decimals: s.decimals,
            total_supply: s.total_supply_raw,
            burned_zero: s.burned_zero_raw,
            burned_dead: s.burned_dead_raw,
            total_supply_adjusted: s.total_supply_adjusted_raw,
            circulating_supply: s.circulating_supply_raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SupplyResult {
    #[schema(example = "999850.0")]
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChainsResponse {
    pub chains: BTreeMap<ChainId, ChainConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokensResponse {
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
