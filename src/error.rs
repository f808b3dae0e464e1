use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::model::ErrorBody;

#[derive(Debug, Clone, Error)]
pub enum SupplyError {
    #[error("Token not found")]
    TokenNotFound,

    #[error("Unknown chain: {0}")]
    ChainNotFound(String),

    #[error("invalid rpc endpoint: {0}")]
    Endpoint(String),

    #[error("{0}")]
    RemoteCall(String),
}

impl SupplyError {
    pub fn status(&self) -> StatusCode {
        match self {
            SupplyError::TokenNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SupplyError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let error = if message.trim().is_empty() { "Internal error".to_owned() } else { message };

        (self.status(), Json(ErrorBody { error })).into_response()
    }
}
