use crate::chain::evm::EvmBlockchain;
use crate::chain::mock::MockBlockchain;
use crate::error::SupplyError;
use crate::registry::ChainConfig;
use alloy::primitives::{Address, U256};
use std::future::Future;
use std::sync::Arc;

pub mod evm;
pub mod mock;

/// Read-only view of an ERC-20 contract on one chain.
pub trait TokenReader: Send + Sync {
    fn total_supply(&self, token: Address) -> impl Future<Output = Result<U256, SupplyError>> + Send;
    fn balance_of(&self, token: Address, holder: Address)
        -> impl Future<Output = Result<U256, SupplyError>> + Send;
    fn decimals(&self, token: Address) -> impl Future<Output = Result<u8, SupplyError>> + Send;
    fn symbol(&self, token: Address) -> impl Future<Output = Result<String, SupplyError>> + Send;
}

#[derive(Clone)]
pub enum Blockchain {
    Evm(EvmBlockchain),
    Mock(Arc<MockBlockchain>),
}

impl TokenReader for Blockchain {
    async fn total_supply(&self, token: Address) -> Result<U256, SupplyError> {
        match self {
            Blockchain::Evm(bc) => bc.total_supply(token).await,
            Blockchain::Mock(bc) => bc.total_supply(token).await,
        }
    }

    async fn balance_of(&self, token: Address, holder: Address) -> Result<U256, SupplyError> {
        match self {
            Blockchain::Evm(bc) => bc.balance_of(token, holder).await,
            Blockchain::Mock(bc) => bc.balance_of(token, holder).await,
        }
    }

    async fn decimals(&self, token: Address) -> Result<u8, SupplyError> {
        match self {
            Blockchain::Evm(bc) => bc.decimals(token).await,
            Blockchain::Mock(bc) => bc.decimals(token).await,
        }
    }

    async fn symbol(&self, token: Address) -> Result<String, SupplyError> {
        match self {
            Blockchain::Evm(bc) => bc.symbol(token).await,
            Blockchain::Mock(bc) => bc.symbol(token).await,
        }
    }
}

/// How the resolver reaches a chain. `Rpc` dials the chain's primary endpoint,
/// `Mock` hands out a shared in-memory chain.
#[derive(Clone)]
pub enum Backend {
    Rpc,
    Mock(Arc<MockBlockchain>),
}

impl Backend {
    pub fn connect(&self, chain: &ChainConfig) -> Result<Blockchain, SupplyError> {
        match self {
            Backend::Rpc => Ok(Blockchain::Evm(EvmBlockchain::new(chain)?)),
            Backend::Mock(bc) => Ok(Blockchain::Mock(bc.clone())),
        }
    }
}
