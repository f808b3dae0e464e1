use crate::error::SupplyError;
use crate::model::{
    ChainsResponse, ErrorBody, HealthResponse, SupplyBreakdown, SupplyData, SupplyResult, SupplyV1,
    TokensResponse,
};
use crate::state::AppState;
use crate::units::format_units;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use tracing::debug;

type Symbol = Result<Path<String>, PathRejection>;

/// An undecodable path segment is just a symbol nobody registered.
async fn supply_for(state: &AppState, symbol: Symbol) -> Result<SupplyBreakdown, SupplyError> {
    let Ok(Path(symbol)) = symbol else {
        return Err(SupplyError::TokenNotFound);
    };

    let token = state.tokens.find_by_symbol(&symbol).ok_or_else(|| {
        debug!(%symbol, "unknown token symbol");
        SupplyError::TokenNotFound
    })?;

    state.resolver.resolve(token).await
}

#[utoipa::path(get, path = "/health", tag = "meta",
    responses((status = 200, body = HealthResponse)))]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_owned() })
}

#[utoipa::path(get, path = "/chains", tag = "meta",
    responses((status = 200, body = ChainsResponse)))]
pub async fn chains(State(state): State<Arc<AppState>>) -> Json<ChainsResponse> {
    Json(ChainsResponse { chains: state.chains.all().clone() })
}

#[utoipa::path(get, path = "/tokens", tag = "meta",
    responses((status = 200, body = TokensResponse)))]
pub async fn tokens(State(state): State<Arc<AppState>>) -> Json<TokensResponse> {
    Json(TokensResponse { tokens: state.tokens.list_all().to_vec() })
}

#[utoipa::path(get, path = "/supply/{symbol}", tag = "supply",
    params(("symbol" = String, Path, description = "Token symbol, case-insensitive")),
    responses(
        (status = 200, body = SupplyData),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody),
    ))]
pub async fn supply(
    State(state): State<Arc<AppState>>,
    symbol: Symbol,
) -> Result<Json<SupplyData>, SupplyError> {
    let data = supply_for(&state, symbol).await?;
    Ok(Json(SupplyData { data }))
}

#[utoipa::path(get, path = "/api/v1/supply/{symbol}", tag = "supply",
    params(("symbol" = String, Path, description = "Token symbol, case-insensitive")),
    responses(
        (status = 200, body = SupplyV1),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody),
    ))]
pub async fn supply_v1(
    State(state): State<Arc<AppState>>,
    symbol: Symbol,
) -> Result<Json<SupplyV1>, SupplyError> {
    let breakdown = supply_for(&state, symbol).await?;
    Ok(Json(breakdown.into()))
}

/// Circulating supply in whole tokens. Also served as `/api/v3/supply/circulating/{symbol}`.
#[utoipa::path(get, path = "/api/v3/supply/{symbol}", tag = "supply",
    params(("symbol" = String, Path, description = "Token symbol, case-insensitive")),
    responses(
        (status = 200, body = SupplyResult),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody),
    ))]
pub async fn circulating_v3(
    State(state): State<Arc<AppState>>,
    symbol: Symbol,
) -> Result<Json<SupplyResult>, SupplyError> {
    let s = supply_for(&state, symbol).await?;
    Ok(Json(SupplyResult { result: format_units(s.circulating_supply_raw, s.decimals) }))
}

#[utoipa::path(get, path = "/api/v3/supply/total/{symbol}", tag = "supply",
    params(("symbol" = String, Path, description = "Token symbol, case-insensitive")),
    responses(
        (status = 200, body = SupplyResult),
        (status = 404, body = ErrorBody),
        (status = 500, body = ErrorBody),
    ))]
pub async fn total_v3(
    State(state): State<Arc<AppState>>,
    symbol: Symbol,
) -> Result<Json<SupplyResult>, SupplyError> {
    let s = supply_for(&state, symbol).await?;
    Ok(Json(SupplyResult { result: format_units(s.total_supply_adjusted_raw, s.decimals) }))
}
