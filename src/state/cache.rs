use crate::model::SupplyBreakdown;
use crate::registry::ChainId;
use alloy::primitives::Address;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: SupplyBreakdown,
    expires_at: Instant,
}

/// Short-lived supply results keyed by `chain:lowercase-address`.
///
/// Expired entries stay in place until the next successful resolution of the
/// same key overwrites them.
#[derive(Debug, Default)]
pub struct SupplyCache {
    entries: DashMap<String, CacheEntry>,
}

impl SupplyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(chain: ChainId, token: Address) -> String {
        format!("{}:{}", chain, token.to_string().to_lowercase())
    }

    pub fn get(&self, key: &str) -> Option<SupplyBreakdown> {
        let entry = self.entries.get(key)?;
        (entry.expires_at > Instant::now()).then(|| entry.value.clone())
    }

    pub fn insert(&self, key: String, value: SupplyBreakdown, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};

    fn sample() -> SupplyBreakdown {
        SupplyBreakdown::compute(ChainId::Bsc, Address::repeat_byte(1), "SYM".into(), 18,
                                 U256::from(10), U256::ZERO, U256::ZERO)
    }

    #[test]
    fn key_is_case_insensitive_on_address() {
        let key = SupplyCache::key(ChainId::Bsc,
                                   address!("0x8F452a1fdd388A45e1080992eFF051b4dd9048d2"));
        assert_eq!(key, "bsc:0x8f452a1fdd388a45e1080992eff051b4dd9048d2");
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = SupplyCache::new();
        cache.insert("k".into(), sample(), Duration::from_secs(60));

        assert_eq!(cache.get("k"), Some(sample()));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("k").is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("k").is_none());
        // lazily kept until overwritten
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_is_never_served() {
        let cache = SupplyCache::new();
        cache.insert("k".into(), sample(), Duration::ZERO);

        assert!(cache.get("k").is_none());
    }

    #[tokio::test]
    async fn clear_wipes_everything() {
        let cache = SupplyCache::new();
        cache.insert("a".into(), sample(), Duration::from_secs(60));
        cache.insert("b".into(), sample(), Duration::from_secs(60));

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }
}
