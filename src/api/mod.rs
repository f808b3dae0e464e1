pub mod handlers;

use crate::model::{
    ChainsResponse, ErrorBody, HealthResponse, SupplyBreakdown, SupplyData, SupplyResult, SupplyV1,
    TokensResponse,
};
use crate::registry::{ChainConfig, ChainId, TokenConfig};
use crate::state::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{HeaderName, RETRY_AFTER};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;

use crate::state::limiter::RateLimitStatus;

static RATELIMIT_POLICY: HeaderName = HeaderName::from_static("ratelimit-policy");
static RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
static RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
static RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later.";

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::chains,
        handlers::tokens,
        handlers::supply,
        handlers::supply_v1,
        handlers::circulating_v3,
        handlers::total_v3,
    ),
    components(schemas(
        ChainId, ChainConfig, TokenConfig, SupplyBreakdown, SupplyData, SupplyV1, SupplyResult,
        HealthResponse, ChainsResponse, TokensResponse, ErrorBody,
    )),
    tags(
        (name = "supply", description = "ERC-20 supply figures"),
        (name = "meta", description = "Service and registry information"),
    )
)]
pub struct ApiDoc;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([
            RATELIMIT_POLICY.clone(),
            RATELIMIT_LIMIT.clone(),
            RATELIMIT_REMAINING.clone(),
            RATELIMIT_RESET.clone(),
        ]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/chains", get(handlers::chains))
        .route("/tokens", get(handlers::tokens))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/supply/{symbol}", get(handlers::supply))
        .route("/api/v1/supply/{symbol}", get(handlers::supply_v1))
        .route("/api/v3/supply/{symbol}", get(handlers::circulating_v3))
        .route("/api/v3/supply/total/{symbol}", get(handlers::total_v3))
        .route("/api/v3/supply/circulating/{symbol}", get(handlers::circulating_v3))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "supply api listening");

    axum::serve(listener, router(state).into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn rate_limit(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let client = request.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    let status = state.limiter.check(client);

    let mut response = if status.allowed {
        next.run(request).await
    } else {
        warn!(%client, limit = status.limit, path = %request.uri().path(), "Rate limit exceeded");
        let retry_after = HeaderValue::from(ceil_secs(status.reset));
        (StatusCode::TOO_MANY_REQUESTS, [(RETRY_AFTER, retry_after)], TOO_MANY_REQUESTS)
            .into_response()
    };

    let window = state.limiter.config().window;
    set_rate_limit_headers(response.headers_mut(), &status, window);

    response
}

fn set_rate_limit_headers(headers: &mut HeaderMap, status: &RateLimitStatus, window: Duration) {
    if let Ok(policy) = HeaderValue::from_str(&format!("{};w={}", status.limit, window.as_secs())) {
        headers.insert(RATELIMIT_POLICY.clone(), policy);
    }
    headers.insert(RATELIMIT_LIMIT.clone(), HeaderValue::from(status.limit));
    headers.insert(RATELIMIT_REMAINING.clone(), HeaderValue::from(status.remaining));
    headers.insert(RATELIMIT_RESET.clone(), HeaderValue::from(ceil_secs(status.reset)));
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
