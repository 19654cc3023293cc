use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use cosmoscope_core::TransactionQuery;

use crate::report::{TxListReport, TxReport};

use super::error::AppError;
use super::SharedState;

// ==============================================================================
// DTOs
// ==============================================================================

#[derive(Deserialize)]
pub(super) struct AddressQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
pub(super) struct DetailQuery {
    #[serde(default)]
    full: bool,
}

const DEFAULT_ADDRESS_LIMIT: usize = 50;

// ==============================================================================
// Handlers
// ==============================================================================

pub(super) async fn search_txs(
    State(state): State<SharedState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TxListReport>, AppError> {
    let txs = state.search.search(&query).await?;
    Ok(Json(TxListReport::new(&txs, false)))
}

pub(super) async fn get_tx(
    State(state): State<SharedState>,
    Path(hash): Path<String>,
) -> Result<Json<TxReport>, AppError> {
    let txs = state.search.find_by_hash(&hash).await?;
    let tx = txs
        .first()
        .ok_or_else(|| AppError::NotFound(format!("transaction not found: {hash}")))?;
    Ok(Json(TxReport::new(tx, true)))
}

pub(super) async fn resolve(
    State(state): State<SharedState>,
    Path(identifier): Path<String>,
    Query(detail): Query<DetailQuery>,
) -> Result<Json<TxListReport>, AppError> {
    let txs = state.search.resolve(&identifier).await?;
    Ok(Json(TxListReport::new(&txs, detail.full)))
}

pub(super) async fn by_address(
    State(state): State<SharedState>,
    Path(address): Path<String>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<TxListReport>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_ADDRESS_LIMIT);
    let txs = state.search.find_by_address(&address, limit).await?;
    Ok(Json(TxListReport::new(&txs, false)))
}

pub(super) async fn last_results(
    State(state): State<SharedState>,
    Query(detail): Query<DetailQuery>,
) -> Json<TxListReport> {
    let txs = state.search.last_results().await;
    Json(TxListReport::new(&txs, detail.full))
}
