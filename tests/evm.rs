use alloy::primitives::{hex, Address, U256};
use necko3_supply::chain::evm::EvmBlockchain;
use necko3_supply::chain::{Backend, TokenReader};
use necko3_supply::registry::{ChainConfig, ChainId, ChainRegistry, TokenConfig, DEAD_ADDRESS, ZERO_ADDRESS};
use necko3_supply::state::cache::SupplyCache;
use necko3_supply::state::resolver::SupplyResolver;
use necko3_supply::SupplyError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const TOKEN: Address = Address::new([0x11; 20]);

const TOTAL_SUPPLY: &str = "18160ddd";
const BALANCE_OF: &str = "70a08231";
const DECIMALS: &str = "313ce567";
const SYMBOL: &str = "95d89b41";

/// A node that only knows one ERC-20 contract and answers `eth_call` for it.
struct Erc20Node {
    total_supply: U256,
    balances: HashMap<Address, U256>,
    decimals: u8,
    symbol: String,
    revert_total_supply: bool,
    delay: Duration,
}

impl Erc20Node {
    fn answer(&self, call: &Value) -> Value {
        let id = call["id"].clone();

        if call["method"] != "eth_call" {
            return json!({ "jsonrpc": "2.0", "id": id, "result": "0x1" });
        }

        let tx = &call["params"][0];
        let input = tx.get("input").or_else(|| tx.get("data"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim_start_matches("0x")
            .to_lowercase();
        let to: Address = tx["to"].as_str().unwrap().parse().unwrap();

        let output = if to != TOKEN {
            None
        } else {
            match &input[..8] {
                TOTAL_SUPPLY if self.revert_total_supply => None,
                TOTAL_SUPPLY => Some(word(self.total_supply)),
                BALANCE_OF => {
                    let holder: Address = input[input.len() - 40..].parse().unwrap();
                    Some(word(self.balances.get(&holder).copied().unwrap_or_default()))
                }
                DECIMALS => Some(word(U256::from(self.decimals))),
                SYMBOL => Some(abi_string(&self.symbol)),
                _ => None,
            }
        };

        match output {
            Some(bytes) => json!({ "jsonrpc": "2.0", "id": id, "result": format!("0x{}", hex::encode(bytes)) }),
            None => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": 3, "message": "execution reverted", "data": "0x" }
            }),
        }
    }
}

impl Respond for Erc20Node {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let reply = match body {
            Value::Array(calls) => Value::Array(calls.iter().map(|c| self.answer(c)).collect()),
            call => self.answer(&call),
        };
        ResponseTemplate::new(200).set_body_json(reply).set_delay(self.delay)
    }
}

fn word(value: U256) -> Vec<u8> {
    value.to_be_bytes::<32>().to_vec()
}

fn abi_string(s: &str) -> Vec<u8> {
    let mut out = word(U256::from(32));
    out.extend(word(U256::from(s.len())));
    let mut data = s.as_bytes().to_vec();
    data.resize(s.len().div_ceil(32) * 32, 0);
    out.extend(data);
    out
}

async fn node(revert_total_supply: bool) -> MockServer {
    slow_node(revert_total_supply, Duration::ZERO).await
}

async fn slow_node(revert_total_supply: bool, delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    let balances = HashMap::from([
        (ZERO_ADDRESS, U256::from(100)),
        (DEAD_ADDRESS, U256::from(50)),
    ]);

    Mock::given(method("POST"))
        .respond_with(Erc20Node {
            total_supply: U256::from(1_000_000),
            balances,
            decimals: 18,
            symbol: "CL8Y".to_owned(),
            revert_total_supply,
            delay,
        })
        .mount(&server)
        .await;

    server
}

fn chain(url: &str) -> ChainConfig {
    ChainConfig {
        id: ChainId::Bsc,
        name: "BNB Smart Chain".to_owned(),
        rpc_urls: vec![url.to_owned()],
        explorer_url: None,
        chain_id_numeric: Some(56),
    }
}

#[tokio::test]
async fn reads_erc20_views() {
    let server = node(false).await;
    let bc = EvmBlockchain::new(&chain(&server.uri())).unwrap();

    assert_eq!(bc.total_supply(TOKEN).await.unwrap(), U256::from(1_000_000));
    assert_eq!(bc.balance_of(TOKEN, ZERO_ADDRESS).await.unwrap(), U256::from(100));
    assert_eq!(bc.balance_of(TOKEN, DEAD_ADDRESS).await.unwrap(), U256::from(50));
    assert_eq!(bc.balance_of(TOKEN, Address::repeat_byte(3)).await.unwrap(), U256::ZERO);
    assert_eq!(bc.decimals(TOKEN).await.unwrap(), 18);
    assert_eq!(bc.symbol(TOKEN).await.unwrap(), "CL8Y");
}

#[tokio::test]
async fn only_read_calls_reach_the_node() {
    let server = node(false).await;
    let bc = EvmBlockchain::new(&chain(&server.uri())).unwrap();

    bc.total_supply(TOKEN).await.unwrap();
    bc.symbol(TOKEN).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests.is_empty());
    for request in requests {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["method"], "eth_call");
    }
}

#[tokio::test]
async fn reverted_call_is_a_remote_error() {
    let server = node(true).await;
    let bc = EvmBlockchain::new(&chain(&server.uri())).unwrap();

    let err = bc.total_supply(TOKEN).await.unwrap_err();

    assert!(matches!(err, SupplyError::RemoteCall(ref m) if m.contains("execution reverted")));
}

#[tokio::test]
async fn resolver_over_rpc() {
    let server = node(false).await;
    let resolver = SupplyResolver::new(
        Arc::new(ChainRegistry::new([chain(&server.uri())])),
        Arc::new(SupplyCache::new()),
        Backend::Rpc,
    );
    let token = TokenConfig::new("CL8Y", TOKEN, ChainId::Bsc);

    let s = resolver.resolve(&token).await.unwrap();

    assert_eq!(s.total_supply_adjusted_raw, U256::from(999_850));
    assert_eq!(s.decimals, 18);

    let served = server.received_requests().await.unwrap().len();
    resolver.resolve(&token).await.unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), served);
}

#[tokio::test]
async fn resolver_does_not_cache_failures() {
    let server = node(true).await;
    let resolver = SupplyResolver::new(
        Arc::new(ChainRegistry::new([chain(&server.uri())])),
        Arc::new(SupplyCache::new()),
        Backend::Rpc,
    );
    let token = TokenConfig::new("CL8Y", TOKEN, ChainId::Bsc);

    assert!(matches!(resolver.resolve(&token).await, Err(SupplyError::RemoteCall(_))));
    assert!(resolver.cache().is_empty());
}

#[tokio::test]
async fn unreachable_node_is_a_remote_error() {
    let bc = EvmBlockchain::new(&chain("http://127.0.0.1:1")).unwrap();

    assert!(matches!(bc.decimals(TOKEN).await, Err(SupplyError::RemoteCall(_))));
}

#[tokio::test]
async fn resolver_reads_run_concurrently() {
    let delay = Duration::from_millis(300);
    let server = slow_node(false, delay).await;
    let resolver = SupplyResolver::new(
        Arc::new(ChainRegistry::new([chain(&server.uri())])),
        Arc::new(SupplyCache::new()),
        Backend::Rpc,
    );
    // no decimals override: totalSupply, two balanceOf and decimals all hit the node
    let token = TokenConfig::new("CL8Y", TOKEN, ChainId::Bsc);

    let started = Instant::now();
    resolver.resolve(&token).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(server.received_requests().await.unwrap().len(), 4);
    assert!(elapsed >= delay, "{elapsed:?}");
    assert!(elapsed < delay * 2, "reads were serialized: {elapsed:?}");
}
