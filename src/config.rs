use crate::state::limiter::RateLimitConfig;
use crate::state::resolver::DEFAULT_TTL;
use anyhow::Context;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub rate_limit: RateLimitConfig,
    pub cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rate_limit: RateLimitConfig::default(),
            cache_ttl: DEFAULT_TTL,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `PORT`, `RATE_LIMIT_WINDOW_SECS`, `RATE_LIMIT_MAX`, `SUPPLY_CACHE_TTL_SECS`;
    /// anything unset keeps its default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = parse_or(&lookup, "PORT", defaults.port)?;
        let window_secs = parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS",
                                   defaults.rate_limit.window.as_secs())?;
        let max_requests = parse_or(&lookup, "RATE_LIMIT_MAX", defaults.rate_limit.max_requests)?;
        let ttl_secs = parse_or(&lookup, "SUPPLY_CACHE_TTL_SECS", defaults.cache_ttl.as_secs())?;

        if window_secs == 0 {
            anyhow::bail!("RATE_LIMIT_WINDOW_SECS must be greater than zero");
        }
        if max_requests == 0 {
            anyhow::bail!("RATE_LIMIT_MAX must be greater than zero");
        }

        Ok(Self {
            port,
            rate_limit: RateLimitConfig {
                window: Duration::from_secs(window_secs),
                max_requests,
            },
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse()
            .with_context(|| format!("invalid value for {}: '{}'", key, raw)),
        _ => Ok(default),
    }
}
