pub mod cache;
pub mod janitor;
pub mod limiter;
pub mod resolver;

use crate::chain::Backend;
use crate::config::Settings;
use crate::registry::{ChainRegistry, TokenRegistry};
use crate::state::cache::SupplyCache;
use crate::state::limiter::{RateLimitConfig, RateLimiter};
use crate::state::resolver::SupplyResolver;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct AppState {
    pub chains: Arc<ChainRegistry>,
    pub tokens: Arc<TokenRegistry>,
    pub resolver: SupplyResolver,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        chains: ChainRegistry,
        tokens: TokenRegistry,
        backend: Backend,
        cache_ttl: Duration,
        rate_limit: RateLimitConfig,
    ) -> Self {
        let chains = Arc::new(chains);
        let resolver = SupplyResolver::new(chains.clone(), Arc::new(SupplyCache::new()), backend)
            .with_default_ttl(cache_ttl);

        Self {
            chains,
            tokens: Arc::new(tokens),
            resolver,
            limiter: Arc::new(RateLimiter::new(rate_limit)),
        }
    }

    /// Builds the state over the built-in registries, talking to real rpc nodes,
    /// and starts the background janitor.
    pub fn init(settings: &Settings) -> anyhow::Result<(Arc<AppState>, JoinHandle<()>)> {
        let chains = ChainRegistry::builtin();
        let tokens = TokenRegistry::builtin(&chains)?;

        let state = Arc::new(Self::new(
            chains,
            tokens,
            Backend::Rpc,
            settings.cache_ttl,
            settings.rate_limit,
        ));

        let janitor_interval = settings.rate_limit.window.min(Duration::from_secs(60));
        let janitor = janitor::start_janitor(state.limiter.clone(), janitor_interval);

        Ok((state, janitor))
    }
}
