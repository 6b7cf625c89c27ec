//! HTTP surface for the conversion pipeline.
//!
//! CRUD glue around [`crate::convert`]: one upload route that drives the
//! pipeline, a storage listing, a delete route, static serving of the
//! storage directory, and the browser UI. Each submodule handles one
//! domain.

pub mod error;
pub mod files;
pub mod upload;

use crate::config::ConversionConfig;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline configuration, shared with every in-flight upload.
    pub config: Arc<ConversionConfig>,
    /// Directory holding the static browser UI.
    pub assets_dir: PathBuf,
}

/// Create the application router.
///
/// `/uploads` serves the durable storage directory read-only; the
/// fallback serves the drag-and-drop UI from `assets_dir`.
pub fn create_router(state: AppState) -> Router {
    let storage = ServeDir::new(&state.config.storage_dir);
    let assets = ServeDir::new(&state.assets_dir).append_index_html_on_directories(true);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/upload", post(upload::handle_upload))
        .route("/files", get(files::list_files))
        .route("/files/{filename}", delete(files::delete_file))
        .nest_service("/uploads", storage)
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
