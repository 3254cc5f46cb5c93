//! # HTTP API
//!
//! ```text
//! POST /encode      multipart: image + (secret_file | secret_text)  -> image/png
//! POST /decode      multipart: image  -> octet-stream + X-Filename
//! POST /extract/raw multipart: image  -> octet-stream (unframed bytes)
//! GET  /health      -> JSON status and counters
//! OPTIONS *         -> CORS preflight
//! ```
//!
//! Everything is processed in memory; nothing is written to disk.

use anyhow::Result;
use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::common::config::ServiceConfig;
use crate::processing::codec::PngCodec;
use crate::processing::framing::Payload;
use crate::processing::StegoError;
use crate::server::metrics::ServiceMetrics;
use crate::server::server::StegoCore;

/// Recovered payload name on `/decode` responses.
pub const X_FILENAME: HeaderName = HeaderName::from_static("x-filename");

/// Set on `/encode` responses when part of the payload did not fit.
pub const X_CAPACITY_TRUNCATED: HeaderName = HeaderName::from_static("x-capacity-truncated");

/// Payload name for `secret_file` uploads that carry no file name.
const FALLBACK_FILE_NAME: &str = "secret.bin";

type ApiError = (StatusCode, String);

/// State shared by all handlers.
pub struct AppState {
    pub core: StegoCore,
    pub metrics: ServiceMetrics,
    pub default_secret_name: String,
}

impl AppState {
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self {
            core: StegoCore::new(Arc::new(PngCodec), config.stego.embed_options()),
            metrics: ServiceMetrics::new(),
            default_secret_name: config.stego.default_secret_name.clone(),
        }
    }
}

/// Build the router for `config`.
pub fn app(config: &ServiceConfig) -> Router {
    router(Arc::new(AppState::from_config(config)), config)
}

/// Build the router around existing state.
pub fn router(state: Arc<AppState>, config: &ServiceConfig) -> Router {
    let mut app = Router::new()
        .route("/encode", post(encode_handler))
        .route("/decode", post(decode_handler))
        .route("/extract/raw", post(extract_raw_handler))
        .route("/health", get(health_check));

    if let Some(dir) = &config.server.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let app = app(&config);
    let addr = config.server.address.clone();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🌐 Stego-vault running on http://{}", addr);
    info!(
        "📡 Endpoints: POST /encode, POST /decode, POST /extract/raw, GET /health (capacity policy: {:?})",
        config.stego.capacity_policy
    );

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "stego-vault",
        "capacity_policy": state.core.options().capacity_policy,
        "metrics": state.metrics.snapshot(),
    }))
}

/// A secret uploaded as a file.
struct SecretFile {
    name: Option<String>,
    data: Vec<u8>,
}

/// The multipart fields this API understands.
#[derive(Default)]
struct Upload {
    image: Option<Vec<u8>>,
    secret_file: Option<SecretFile>,
    secret_text: Option<Vec<u8>>,
}

impl Upload {
    /// Pick the payload to hide. A file wins over text; an empty file field
    /// (what browsers send when nothing was chosen) counts as absent.
    fn into_payload(self, default_secret_name: &str) -> Option<Payload> {
        let file = self
            .secret_file
            .filter(|f| !(f.data.is_empty() && f.name.as_deref().unwrap_or("").is_empty()));

        match (file, self.secret_text) {
            (Some(file), _) => {
                let name = file
                    .name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
                Some(Payload::new(name, file.data))
            }
            (None, Some(text)) => Some(Payload::new(default_secret_name, text)),
            (None, None) => None,
        }
    }
}

fn bad_multipart(e: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        format!("Failed to read multipart data: {}", e),
    )
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(str::to_string);

        match name.as_str() {
            "image" => {
                let data = field.bytes().await.map_err(bad_multipart)?;
                upload.image = Some(data.to_vec());
            }
            "secret_file" => {
                let data = field.bytes().await.map_err(bad_multipart)?;
                upload.secret_file = Some(SecretFile {
                    name: file_name,
                    data: data.to_vec(),
                });
            }
            // `secret` is the field name used by the older web form.
            "secret_text" | "secret" => {
                let data = field.bytes().await.map_err(bad_multipart)?;
                upload.secret_text = Some(data.to_vec());
            }
            other => debug!("Ignoring multipart field '{}'", other),
        }
    }

    Ok(upload)
}

fn missing_image() -> ApiError {
    (StatusCode::BAD_REQUEST, "No image provided".to_string())
}

/// Map a failed pipeline call onto a status code.
fn pipeline_error(state: &AppState, request_id: u64, err: anyhow::Error) -> ApiError {
    state.metrics.increment_failed_requests();

    match err.downcast_ref::<StegoError>() {
        Some(StegoError::FramingMismatch) => {
            warn!("Request #{}: {}", request_id, err);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "No hidden payload found".to_string(),
            )
        }
        Some(StegoError::CapacityExceeded { .. }) => {
            warn!("Request #{}: {}", request_id, err);
            (StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
        }
        _ => {
            error!("❌ Request #{} failed: {:#}", request_id, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing image: {}", err),
            )
        }
    }
}

/// Turn a payload name into something that can travel in a header.
/// Control characters become `_`; everything else is kept as-is.
fn file_name_header(name: &[u8]) -> HeaderValue {
    let cleaned: Vec<u8> = name
        .iter()
        .map(|&b| if (b < 0x20 && b != b'\t') || b == 0x7f { b'_' } else { b })
        .collect();

    HeaderValue::from_bytes(&cleaned).unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_FILE_NAME))
}

async fn encode_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = rand::random::<u64>();
    state.metrics.increment_encode_requests();

    let mut upload = read_upload(multipart).await?;
    let image = upload.image.take().ok_or_else(missing_image)?;
    let payload = upload
        .into_payload(&state.default_secret_name)
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "No secret provided (expected secret_file or secret_text)".to_string(),
            )
        })?;

    let payload_len = payload.framed_len();
    let output = state
        .core
        .encode_image(request_id, image, payload)
        .await
        .map_err(|e| pipeline_error(&state, request_id, e))?;

    let truncated = output.report.truncated();
    state.metrics.record_embed(payload_len, truncated);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(state.core.media_type()));
    if truncated {
        headers.insert(X_CAPACITY_TRUNCATED, HeaderValue::from_static("true"));
    }

    Ok((headers, output.image))
}

async fn decode_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = rand::random::<u64>();
    state.metrics.increment_decode_requests();

    let image = read_upload(multipart).await?.image.ok_or_else(missing_image)?;
    let payload = state
        .core
        .decode_image(request_id, image)
        .await
        .map_err(|e| pipeline_error(&state, request_id, e))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static("attachment"));
    headers.insert(X_FILENAME, file_name_header(&payload.name));

    Ok((headers, payload.content))
}

async fn extract_raw_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = rand::random::<u64>();
    state.metrics.increment_decode_requests();

    let image = read_upload(multipart).await?.image.ok_or_else(missing_image)?;
    let raw = state
        .core
        .extract_raw(request_id, image)
        .await
        .map_err(|e| pipeline_error(&state, request_id, e))?;

    Ok((
        [(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"))],
        raw,
    ))
}
