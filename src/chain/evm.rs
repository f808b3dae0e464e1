use crate::chain::TokenReader;
use crate::error::SupplyError;
use crate::registry::{ChainConfig, ChainId};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;
use tracing::{debug, warn};
use url::Url;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

#[derive(Clone)]
pub struct EvmBlockchain {
    chain_id: ChainId,
    provider: DynProvider,
}

impl EvmBlockchain {
    pub fn new(chain_config: &ChainConfig) -> Result<Self, SupplyError> {
        let rpc_url = chain_config.primary_rpc_url()
            .ok_or_else(|| SupplyError::Endpoint(
                format!("chain '{}' has no rpc url", chain_config.id)))?;
        let rpc_url = Url::parse(rpc_url)
            .map_err(|e| SupplyError::Endpoint(format!("{}: {}", rpc_url, e)))?;

        debug!(chain = %chain_config.id, url = %rpc_url, "connecting to rpc");
        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();

        Ok(Self {
            chain_id: chain_config.id,
            provider,
        })
    }

    fn contract(&self, token: Address) -> IERC20::IERC20Instance<DynProvider> {
        IERC20::new(token, self.provider.clone())
    }

    fn remote_error(&self, token: Address, call: &str, e: alloy::contract::Error) -> SupplyError {
        warn!(chain = %self.chain_id, %token, call, error = %e, "contract call failed");
        SupplyError::RemoteCall(e.to_string())
    }
}

impl TokenReader for EvmBlockchain {
    async fn total_supply(&self, token: Address) -> Result<U256, SupplyError> {
        self.contract(token).totalSupply().call().await
            .map_err(|e| self.remote_error(token, "totalSupply", e))
    }

    async fn balance_of(&self, token: Address, holder: Address) -> Result<U256, SupplyError> {
        self.contract(token).balanceOf(holder).call().await
            .map_err(|e| self.remote_error(token, "balanceOf", e))
    }

    async fn decimals(&self, token: Address) -> Result<u8, SupplyError> {
        self.contract(token).decimals().call().await
            .map_err(|e| self.remote_error(token, "decimals", e))
    }

    async fn symbol(&self, token: Address) -> Result<String, SupplyError> {
        self.contract(token).symbol().call().await
            .map_err(|e| self.remote_error(token, "symbol", e))
    }
}
