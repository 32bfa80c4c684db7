use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::constants::{get_mime_type, SUPPORTED_FILE_EXTENSIONS};
use crate::errors::ApiError;
use crate::extractor::{create_extractor, Extractor};

/// Multipart field that carries the upload
const FILE_FIELD: &str = "file";

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn Extractor>,
    pub max_upload_bytes: usize,
    pub extract_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(extractor: Arc<dyn Extractor>, config: &Config) -> Self {
        AppState {
            extractor,
            max_upload_bytes: config.max_upload_bytes,
            extract_timeout: config.extract_timeout(),
        }
    }
}

/// A file received on `/extract`, alive for one request
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// Successful `/extract` response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionResult {
    pub filename: String,
    pub content: String,
}

/// `/health` response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

/// Create CORS layer from configuration
///
/// A wildcard origin is served by echoing the caller's origin, since browsers
/// refuse a literal `*` on credentialed requests.
pub fn create_cors_layer(config: &Config) -> Result<CorsLayer> {
    let origin = if config.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        let origins = config
            .origins()
            .into_iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Build the application router
pub fn build_router(state: AppState, config: &Config) -> Result<Router> {
    let cors = create_cors_layer(config)?;
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Ok(Router::new()
        .route("/extract", post(extract_text_from_file))
        .route("/health", get(health_check))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Health check endpoint for monitoring
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
    })
}

/// Extract text from an uploaded file
pub async fn extract_text_from_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| ApiError::InvalidForm(rejection.body_text()))?;

    // Skip ahead to the `file` part of the form
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| read_error(e, state.max_upload_bytes, |e| ApiError::InvalidForm(e.body_text())))?
            .ok_or(ApiError::MissingFile)?;
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        info!(filename = %filename, "Processing file");

        return match handle_upload(&state, field, filename.clone()).await {
            Ok(result) => {
                info!(filename = %filename, "Successfully processed file");
                Ok(Json(result))
            }
            Err(e) => {
                match &e {
                    ApiError::Processing(_) => error!(filename = %filename, error = %e, "Error processing file"),
                    ApiError::PayloadTooLarge { .. } => warn!(filename = %filename, error = %e, "Rejected upload"),
                    _ => {}
                }
                Err(e)
            }
        };
    }
}

/// Read, resolve and extract; every failure is reported through `ApiError`
async fn handle_upload(state: &AppState, field: Field<'_>, filename: String) -> Result<ExtractionResult, ApiError> {
    let upload = read_upload(field, filename, state.max_upload_bytes).await?;
    let mime_type = get_mime_type(&upload.filename).ok_or(ApiError::UnsupportedFileType)?;
    process_upload(state, upload, mime_type).await
}

async fn read_upload(field: Field<'_>, filename: String, limit: usize) -> Result<UploadedFile, ApiError> {
    let bytes = field
        .bytes()
        .await
        .map_err(|e| read_error(e, limit, |e| ApiError::Processing(anyhow::Error::new(e))))?;

    Ok(UploadedFile { filename, bytes })
}

async fn process_upload(
    state: &AppState,
    upload: UploadedFile,
    mime_type: &'static str,
) -> Result<ExtractionResult, ApiError> {
    let extraction = state.extractor.extract(upload.bytes, mime_type);

    // Elapsing drops this future only; work already handed to spawn_blocking runs to completion
    let output = match state.extract_timeout {
        Some(timeout) => tokio::time::timeout(timeout, extraction)
            .await
            .map_err(|_| anyhow::anyhow!("extraction timed out after {}s", timeout.as_secs()))
            .and_then(|output| output),
        None => extraction.await,
    }
    .map_err(ApiError::Processing)?;

    Ok(ExtractionResult {
        filename: upload.filename,
        content: output.content,
    })
}

/// Body-limit failures surface as 413, anything else goes through `otherwise`
fn read_error(e: MultipartError, limit: usize, otherwise: impl FnOnce(MultipartError) -> ApiError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        otherwise(e)
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(config: Config) -> Result<()> {
    let extractor = create_extractor(&config);
    let state = AppState::new(extractor.clone(), &config);
    let router = build_router(state, &config)?;

    let addr = config.bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        address = %addr,
        workers = config.workers,
        extractor = extractor.extractor_type(),
        extensions = ?SUPPORTED_FILE_EXTENSIONS,
        "Document extraction server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}
