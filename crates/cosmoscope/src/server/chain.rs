use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use cosmoscope_core::rpc::{BlockInfo, ChainInfo};
use cosmoscope_core::session::Balances;
use cosmoscope_core::types::BlockHeight;

use super::error::AppError;
use super::SharedState;

#[derive(Deserialize)]
pub(super) struct BalanceQuery {
    denom: Option<String>,
}

pub(super) async fn get_chain(State(state): State<SharedState>) -> Result<Json<ChainInfo>, AppError> {
    Ok(Json(state.session.blockchain_info().await?))
}

pub(super) async fn get_latest_block(
    State(state): State<SharedState>,
) -> Result<Json<BlockInfo>, AppError> {
    Ok(Json(state.session.get_block(None).await?))
}

pub(super) async fn get_block(
    State(state): State<SharedState>,
    Path(height): Path<String>,
) -> Result<Json<BlockInfo>, AppError> {
    let height: u64 = height
        .parse()
        .map_err(|e| AppError::BadRequest(format!("invalid height: {e}")))?;
    Ok(Json(state.session.get_block(Some(BlockHeight(height))).await?))
}

pub(super) async fn get_balance(
    State(state): State<SharedState>,
    Path(address): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<Balances>, AppError> {
    let denom = query.denom.as_deref().filter(|d| !d.is_empty());
    Ok(Json(state.session.get_balance(&address, denom).await?))
}
