use crate::chain::{Backend, TokenReader};
use crate::error::SupplyError;
use crate::model::SupplyBreakdown;
use crate::registry::{ChainId, ChainRegistry, TokenConfig, DEAD_ADDRESS, ZERO_ADDRESS};
use crate::state::cache::SupplyCache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    pub ttl: Option<Duration>,
    pub chain: Option<ChainId>,
}

#[derive(Clone)]
pub struct SupplyResolver {
    chains: Arc<ChainRegistry>,
    cache: Arc<SupplyCache>,
    backend: Backend,
    default_ttl: Duration,
}

impl SupplyResolver {
    pub fn new(chains: Arc<ChainRegistry>, cache: Arc<SupplyCache>, backend: Backend) -> Self {
        Self {
            chains,
            cache,
            backend,
            default_ttl: DEFAULT_TTL,
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn cache(&self) -> &SupplyCache {
        &self.cache
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub async fn resolve(&self, token: &TokenConfig) -> Result<SupplyBreakdown, SupplyError> {
        self.resolve_with(token, ResolveOptions::default()).await
    }

    #[instrument(skip_all, fields(symbol = %token.symbol, address = %token.address))]
    pub async fn resolve_with(
        &self,
        token: &TokenConfig,
        options: ResolveOptions,
    ) -> Result<SupplyBreakdown, SupplyError> {
        let chain_id = options.chain.unwrap_or(token.chain_id);
        let ttl = options.ttl.unwrap_or(self.default_ttl);

        let key = SupplyCache::key(chain_id, token.address);
        if let Some(cached) = self.cache.get(&key) {
            debug!(%key, "supply cache hit");
            return Ok(cached);
        }

        let chain = self.chains.lookup(chain_id)
            .ok_or_else(|| SupplyError::ChainNotFound(chain_id.to_string()))?;
        let reader = self.backend.connect(chain)?;

        debug!(%key, chain = %chain_id, "supply cache miss, reading contract");

        let address = token.address;
        let decimals = async {
            match token.decimals {
                Some(d) => Ok(d),
                None => reader.decimals(address).await,
            }
        };
        let symbol = async {
            if token.symbol.is_empty() {
                reader.symbol(address).await
            } else {
                Ok(token.symbol.clone())
            }
        };

        let (total_supply, burned_zero, burned_dead, decimals, symbol) = tokio::try_join!(
            reader.total_supply(address),
            reader.balance_of(address, ZERO_ADDRESS),
            reader.balance_of(address, DEAD_ADDRESS),
            decimals,
            symbol,
        )?;

        let breakdown = SupplyBreakdown::compute(chain_id, address, symbol, decimals,
                                                 total_supply, burned_zero, burned_dead);

        info!(
            chain = %chain_id,
            total = %breakdown.total_supply_raw,
            adjusted = %breakdown.total_supply_adjusted_raw,
            "supply resolved"
        );

        self.cache.insert(key, breakdown.clone(), ttl);

        Ok(breakdown)
    }
}
