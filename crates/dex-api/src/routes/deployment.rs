//! Deployment record, read back by clients to locate the contracts

use axum::{extract::State, Json};
use dex::Deployment;

use crate::AppState;

/// GET /deployment - Chain id and contract addresses
pub async fn get_deployment(State(state): State<AppState>) -> Json<Deployment> {
    Json(state.devnet().await.deployment.clone())
}
