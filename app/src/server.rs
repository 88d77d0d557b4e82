//! Lookup route server.
//!
//! `GET /parts/:token` resolves a token through a [`PartLookup`] and answers
//! with the `{ success, data?, error?, code? }` envelope.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use partscan_core::{PartRecord, PartToken};
use partscan_lookup::{LookupError, LookupResponse, PartLookup};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared lookup backend.
pub type LookupState = Arc<dyn PartLookup>;

/// Envelope plus the status it is sent with.
#[derive(Debug)]
pub struct PartReply {
    status: StatusCode,
    body: LookupResponse,
}

impl From<Result<PartRecord, LookupError>> for PartReply {
    fn from(result: Result<PartRecord, LookupError>) -> Self {
        match result {
            Ok(record) => Self {
                status: StatusCode::OK,
                body: LookupResponse::found(record),
            },
            Err(err) => {
                let (status, body) = LookupResponse::failure(&err);
                Self {
                    status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    body,
                }
            }
        }
    }
}

impl IntoResponse for PartReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Create the router.
pub fn create_router(lookup: LookupState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/parts/:token", get(get_part))
        .with_state(lookup)
}

/// Bind `addr` and serve until the process ends.
pub async fn serve(addr: &str, lookup: LookupState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, lookup = lookup.lookup_id(), "Lookup route listening");
    axum::serve(listener, create_router(lookup)).await?;
    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn get_part(State(lookup): State<LookupState>, Path(token): Path<String>) -> PartReply {
    let token = PartToken::new(&token);
    tracing::info!(token = %token, "Fetching data for part number");

    let result = if token.is_empty() {
        Err(LookupError::PartNotFound {
            token: token.to_string(),
        })
    } else {
        lookup.resolve(&token).await
    };

    if let Err(err) = &result {
        if err.is_not_found() {
            tracing::info!(token = %token, "Part number not found");
        } else {
            tracing::error!(token = %token, error = %err, "Error fetching part data");
        }
    }
    PartReply::from(result)
}
