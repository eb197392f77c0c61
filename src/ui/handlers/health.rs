use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::ui::response::{ApiError, JSend};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub postings: u64,
}

pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<HealthResponse>>, ApiError> {
    let postings = state
        .db
        .count()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(JSend::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        postings,
    }))
}
