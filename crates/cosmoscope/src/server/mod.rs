mod chain;
mod error;
mod tx;

use std::sync::Arc;

use axum::routing::{any, get};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};

use cosmoscope_core::{LedgerSession, TxSearch};

// ==============================================================================
// Application State
// ==============================================================================

/// Shared by every request. `search` keeps one last-results slot for the
/// whole server, so concurrent searches overwrite each other's cached set.
pub struct AppState {
    pub session: LedgerSession,
    pub search: TxSearch,
}

impl AppState {
    pub fn new(session: LedgerSession) -> Self {
        let search = session.transactions();
        Self { session, search }
    }
}

type SharedState = Arc<AppState>;

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState, origin: &str) -> Router {
    // Only reflect the allowed origin when the request's Origin header
    // actually matches. An unparsable origin allows no cross-origin calls.
    let allowed = origin.parse::<axum::http::HeaderValue>().ok();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |request_origin: &axum::http::HeaderValue, _| {
                allowed.as_ref() == Some(request_origin)
            },
        ))
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let shared = Arc::new(state);

    let chain_api = Router::new()
        .route("/api/v1/chain", get(chain::get_chain))
        .route("/api/v1/block", get(chain::get_latest_block))
        .route("/api/v1/block/{height}", get(chain::get_block))
        .route("/api/v1/balance/{address}", get(chain::get_balance));

    let tx_api = Router::new()
        .route("/api/v1/txs", get(tx::search_txs))
        .route("/api/v1/tx/{hash}", get(tx::get_tx))
        .route("/api/v1/resolve/{identifier}", get(tx::resolve))
        .route("/api/v1/address/{address}", get(tx::by_address))
        .route("/api/v1/last", get(tx::last_results));

    Router::new()
        .route("/api/v1/health", get(health))
        .merge(chain_api)
        .merge(tx_api)
        .route("/api", any(api_not_found))
        .route("/api/{*path}", any(api_not_found))
        .layer(cors)
        .with_state(shared)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn api_not_found() -> error::AppError {
    error::AppError::NotFound("API route not found".to_string())
}
