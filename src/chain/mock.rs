use crate::chain::TokenReader;
use crate::error::SupplyError;
use alloy::primitives::{Address, U256};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, Default)]
pub struct MockToken {
    pub total_supply: U256,
    pub balances: HashMap<Address, U256>,
    pub decimals: u8,
    pub symbol: String,
}

impl MockToken {
    pub fn new(symbol: &str, decimals: u8, total_supply: U256) -> Self {
        Self {
            total_supply,
            balances: HashMap::new(),
            decimals,
            symbol: symbol.to_owned(),
        }
    }

    pub fn with_balance(mut self, holder: Address, amount: U256) -> Self {
        self.balances.insert(holder, amount);
        self
    }
}

/// In-memory chain: serves contract reads from a map and counts every call.
/// Unknown contracts and a chain switched to failing answer like a reverted call.
pub struct MockBlockchain {
    tokens: DashMap<Address, MockToken>, // key = contract address
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MockBlockchain {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_token(&self, contract: Address, token: MockToken) {
        self.tokens.insert(contract, token);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of contract reads served (or refused) so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn read<T>(&self, contract: Address, f: impl FnOnce(&MockToken) -> T) -> Result<T, SupplyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(SupplyError::RemoteCall("mock rpc unavailable".to_owned()));
        }

        self.tokens.get(&contract)
            .map(|token| f(&token))
            .ok_or_else(|| SupplyError::RemoteCall(format!("execution reverted: no contract at {}", contract)))
    }
}

impl Default for MockBlockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenReader for MockBlockchain {
    async fn total_supply(&self, token: Address) -> Result<U256, SupplyError> {
        self.read(token, |t| t.total_supply)
    }

    async fn balance_of(&self, token: Address, holder: Address) -> Result<U256, SupplyError> {
        self.read(token, |t| t.balances.get(&holder).copied().unwrap_or_default())
    }

    async fn decimals(&self, token: Address) -> Result<u8, SupplyError> {
        self.read(token, |t| t.decimals)
    }

    async fn symbol(&self, token: Address) -> Result<String, SupplyError> {
        self.read(token, |t| t.symbol.clone())
    }
}
