//! Host and service status routes.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error_handling::ApiError;
use crate::server::AppState;
use crate::store::{read_usage, UsageCounters};
use crate::system::{system_info, SystemInfo};

#[derive(Debug, Serialize)]
pub struct RequestCounts {
    pub total: usize,
    pub failed: usize,
    pub outcomes: HashMap<&'static str, usize>,
}

#[derive(Debug, Serialize)]
pub struct ServiceStats {
    /// Seconds since the server started
    pub uptime: f64,
    pub requests: RequestCounts,
    pub usage: UsageCounters,
}

#[derive(Debug, Serialize)]
pub struct StorageInfo {
    pub backend: &'static str,
    pub keys: usize,
}

/// `GET /system/info`
pub async fn info() -> Result<Json<SystemInfo>, ApiError> {
    tokio::task::spawn_blocking(system_info)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to read system info", e))
}

/// `GET /system/stats`; a store failure only empties the usage counters.
pub async fn stats(State(state): State<AppState>) -> Json<ServiceStats> {
    let usage = read_usage(state.store.as_ref())
        .await
        .unwrap_or_else(|e| {
            log::warn!("Usage counters unavailable: {}", e);
            UsageCounters::default()
        });

    Json(ServiceStats {
        uptime: state.stats.uptime_secs(),
        requests: RequestCounts {
            total: state.stats.total_requests(),
            failed: state.stats.total_failures(),
            outcomes: state.stats.snapshot(),
        },
        usage,
    })
}

/// `GET /system/storage`
pub async fn storage(State(state): State<AppState>) -> Result<Json<StorageInfo>, ApiError> {
    let keys = state
        .store
        .list_keys("*")
        .await
        .map_err(|e| ApiError::internal("Failed to read storage info", e))?;
    Ok(Json(StorageInfo {
        backend: state.store.backend_name(),
        keys: keys.len(),
    }))
}
