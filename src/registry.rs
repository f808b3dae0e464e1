use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

pub const ZERO_ADDRESS: Address = Address::ZERO;
pub const DEAD_ADDRESS: Address = address!("0x000000000000000000000000000000000000dEaD");

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    ToSchema, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChainId {
    Bsc,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub id: ChainId,
    pub name: String,
    pub rpc_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id_numeric: Option<u64>,
}

impl ChainConfig {
    /// The active endpoint. Additional urls are kept for failover but never dialed.
    pub fn primary_rpc_url(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenConfig {
    pub symbol: String,
    #[schema(value_type = String, example = "0x8F452a1fdd388A45e1080992eFF051b4dd9048d2")]
    pub address: Address,
    pub chain_id: ChainId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

impl TokenConfig {
    pub fn new(symbol: &str, address: Address, chain_id: ChainId) -> Self {
        Self {
            symbol: symbol.to_owned(),
            address,
            chain_id,
            decimals: None,
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: BTreeMap<ChainId, ChainConfig>,
}

impl ChainRegistry {
    pub fn new(chains: impl IntoIterator<Item = ChainConfig>) -> Self {
        Self {
            chains: chains.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn builtin() -> Self {
        Self::new([ChainConfig {
            id: ChainId::Bsc,
            name: "BNB Smart Chain".to_owned(),
            rpc_urls: vec!["https://bsc-dataseed.bnbchain.org".to_owned()],
            explorer_url: Some("https://bscscan.com".to_owned()),
            chain_id_numeric: Some(56),
        }])
    }

    pub fn lookup(&self, id: ChainId) -> Option<&ChainConfig> {
        self.chains.get(&id)
    }

    pub fn contains(&self, id: ChainId) -> bool {
        self.chains.contains_key(&id)
    }

    pub fn all(&self) -> &BTreeMap<ChainId, ChainConfig> {
        &self.chains
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Vec<TokenConfig>,
}

impl TokenRegistry {
    /// Builds the registry, refusing ambiguous symbols and tokens on unknown chains.
    pub fn new(tokens: Vec<TokenConfig>, chains: &ChainRegistry) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();

        for token in &tokens {
            if token.symbol.trim().is_empty() {
                anyhow::bail!("token {} has an empty symbol", token.address);
            }
            if !seen.insert(token.symbol.to_lowercase()) {
                anyhow::bail!("duplicate token symbol '{}'", token.symbol);
            }
            if !chains.contains(token.chain_id) {
                anyhow::bail!("token '{}' refers to unknown chain '{}'", token.symbol, token.chain_id);
            }
        }

        Ok(Self { tokens })
    }

    pub fn builtin(chains: &ChainRegistry) -> anyhow::Result<Self> {
        Self::new(vec![
            TokenConfig::new("CL8Y", address!("0x8F452a1fdd388A45e1080992eFF051b4dd9048d2"),
                             ChainId::Bsc),
            TokenConfig::new("CZB", address!("0xD963b2236D227a0302E19F2f9595F424950dc186"),
                             ChainId::Bsc),
        ], chains)
    }

    pub fn find_by_symbol(&self, symbol: &str) -> Option<&TokenConfig> {
        let symbol = symbol.to_lowercase();
        self.tokens.iter().find(|t| t.symbol.to_lowercase() == symbol)
    }

    pub fn list_all(&self) -> &[TokenConfig] {
        &self.tokens
    }
}
