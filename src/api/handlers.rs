//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::keys::{CacheKey, Scope};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, ScopeStatsResponse, ScopesResponse, SetRequest,
    SetResponse, StatsResponse,
};
use crate::persistent::{Persistent, StorageEvent};
use crate::storage::FileBackend;

/// Application state shared across all handlers.
///
/// Contains the cache context wrapped in Arc<RwLock<>> for shared access.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RwLock<Persistent>>,
}

impl AppState {
    /// Creates a new AppState around an already hydrated context.
    pub fn new(cache: Persistent) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Each scope gets its own file backend under `storage_dir` and is
    /// hydrated from it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let local = FileBackend::new(config.storage_dir.join(Scope::Local.as_str()))?;
        let session = FileBackend::new(config.storage_dir.join(Scope::Session.as_str()))?;

        Ok(Self::new(Persistent::open(
            config,
            Arc::new(local),
            Arc::new(session),
        )))
    }
}

/// Handler for PUT /cache/:scope/:key
///
/// Stores a value, optionally writing the scope snapshot right away.
pub async fn set_handler(
    State(state): State<AppState>,
    Path((scope, key)): Path<(Scope, CacheKey)>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    let mut cache = state.cache.write().await;
    cache.set_with_ttl(scope, key, req.value, ttl, req.flush)?;

    Ok(Json(SetResponse::new(scope, key, req.flush)))
}

/// Handler for GET /cache/:scope/:key
///
/// Takes the write lock since an expired entry is dropped on read.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((scope, key)): Path<(Scope, CacheKey)>,
) -> Result<Json<GetResponse>> {
    let mut cache = state.cache.write().await;
    let entry = cache
        .get_entry(scope, key)
        .ok_or_else(|| CacheError::NotFound(key.to_string()))?;

    Ok(Json(GetResponse::new(
        scope,
        key,
        entry.value.clone(),
        entry.expiry_at,
    )))
}

/// Handler for DELETE /cache/:scope/:key
///
/// Removing a missing key is not an error.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((scope, key)): Path<(Scope, CacheKey)>,
) -> Json<DeleteResponse> {
    let mut cache = state.cache.write().await;
    cache.remove(scope, key);

    Json(DeleteResponse::new(scope, key))
}

/// Handler for DELETE /cache/:scope
pub async fn clear_scope_handler(
    State(state): State<AppState>,
    Path(scope): Path<Scope>,
) -> Json<ScopesResponse> {
    state.cache.write().await.clear(scope);

    Json(ScopesResponse::new(
        format!("{} scope cleared", scope),
        vec![scope],
    ))
}

/// Handler for DELETE /cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ScopesResponse> {
    state.cache.write().await.clear_all();

    Json(ScopesResponse::new("All scopes cleared", Scope::ALL.to_vec()))
}

/// Handler for POST /flush/:scope
pub async fn flush_scope_handler(
    State(state): State<AppState>,
    Path(scope): Path<Scope>,
) -> Result<Json<ScopesResponse>> {
    state.cache.write().await.flush(scope)?;

    Ok(Json(ScopesResponse::new(
        format!("{} scope flushed", scope),
        vec![scope],
    )))
}

/// Handler for POST /flush
pub async fn flush_all_handler(State(state): State<AppState>) -> Result<Json<ScopesResponse>> {
    state.cache.write().await.flush_all()?;

    Ok(Json(ScopesResponse::new(
        "All scopes flushed",
        Scope::ALL.to_vec(),
    )))
}

/// Handler for POST /storage-event
///
/// Delivers a change another context made to the shared durable backend.
pub async fn storage_event_handler(
    State(state): State<AppState>,
    Json(event): Json<StorageEvent>,
) -> Json<ScopesResponse> {
    let invalidated = state.cache.write().await.on_storage_changed(&event);
    info!(key = ?event.key, scopes = ?invalidated, "Storage event applied");

    Json(ScopesResponse::new("Storage event applied", invalidated))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    let scope_stats = |scope: Scope| {
        ScopeStatsResponse::new(
            cache.snapshot_key(scope),
            &cache.stats(scope),
            cache.is_dirty(scope),
        )
    };

    Json(StatsResponse {
        local: scope_stats(Scope::Local),
        session: scope_stats(Scope::Session),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
