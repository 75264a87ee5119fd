//! Local stand-ins for the asset host and the predictor.
//!
//! Lets the frontend (`trunk serve`) and the native client run without the
//! real services, and gives the tests a server whose failures are scripted.
//!
//! # API Endpoints
//!
//! | Method | Path                               | Description                        |
//! |--------|------------------------------------|------------------------------------|
//! | GET    | `/health`                          | Health check                       |
//! | POST   | `/v1_1/{cloud_name}/image/upload`  | Multipart upload, returns `secure_url` |
//! | GET    | `/assets/{id}/{file_name}`         | Serves an uploaded file back       |
//! | POST   | `/predict_from_url`                | `{"url"}` → `{"predicted_digit"}`  |

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use boltzmann_core::{config::UPLOAD_PRESET, Endpoints, PredictRequest};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// =============================================================================
// Behaviour
// =============================================================================

/// How the upload endpoint answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadBehavior {
    /// Store the file and return its URL.
    Host,
    /// Reply with this status and a JSON error body.
    Status(u16),
    /// Reply 200 with a body that is not JSON.
    Malformed,
}

/// How the prediction endpoint answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictBehavior {
    /// Always this digit.
    Digit(u8),
    /// First digit found in the file name of the URL (`digit7.png` → 7).
    Infer { fallback: u8 },
    /// Reply with this status.
    Status(u16),
    /// Reply 200 with a body that is not JSON.
    Malformed,
}

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub upload: UploadBehavior,
    pub predict: PredictBehavior,
    /// Applied before every prediction answer.
    pub predict_delay: Duration,
    /// Uploads with any other preset are rejected with 400.
    pub upload_preset: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            upload: UploadBehavior::Host,
            predict: PredictBehavior::Infer { fallback: 0 },
            predict_delay: Duration::ZERO,
            upload_preset: UPLOAD_PRESET.to_string(),
        }
    }
}

// =============================================================================
// State
// =============================================================================

struct HostedAsset {
    content_type: String,
    bytes: Bytes,
}

struct MockState {
    config: MockConfig,
    base_url: String,
    uploads: AtomicUsize,
    predictions: AtomicUsize,
    assets: Mutex<HashMap<(usize, String), HostedAsset>>,
}

impl MockState {
    fn new(config: MockConfig, base_url: String) -> Self {
        Self {
            config,
            base_url,
            uploads: AtomicUsize::new(0),
            predictions: AtomicUsize::new(0),
            assets: Mutex::new(HashMap::new()),
        }
    }
}

/// Digit guessed from the last path segment of `url`.
pub fn infer_digit(url: &str) -> Option<u8> {
    let file_name = url.rsplit('/').next().unwrap_or(url);
    let stem = file_name.split('.').next().unwrap_or(file_name);
    stem.chars()
        .find(char::is_ascii_digit)
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
}

/// `file_name` reduced to a single URL-safe path segment.
pub fn hosted_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let name: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if name.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        name
    }
}

fn error_body(message: &str) -> Value {
    json!({ "error": { "message": message } })
}

fn status_code(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

// =============================================================================
// Router
// =============================================================================

fn router(state: Arc<MockState>) -> Router {
    // Permissive CORS so the WASM app can call it from trunk's dev server
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/v1_1/{cloud_name}/image/upload", post(upload))
        .route("/assets/{id}/{file_name}", get(asset))
        .route("/predict_from_url", post(predict))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<Arc<MockState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "boltzmann-mock",
        "version": env!("CARGO_PKG_VERSION"),
        "uploads": state.uploads.load(Ordering::SeqCst),
        "predictions": state.predictions.load(Ordering::SeqCst),
    }))
}

async fn upload(
    State(state): State<Arc<MockState>>,
    Path(cloud_name): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let id = state.uploads.fetch_add(1, Ordering::SeqCst) + 1;

    let mut file: Option<(String, String, Bytes)> = None;
    let mut preset: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(error_body(&format!("Multipart error: {}", e))),
                )
                    .into_response();
            }
        };
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((file_name, content_type, bytes)),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(error_body(&format!("Read error: {}", e))),
                        )
                            .into_response();
                    }
                }
            }
            "upload_preset" => preset = field.text().await.ok(),
            _ => {}
        }
    }

    // drain the body before answering, even for scripted failures
    match state.config.upload {
        UploadBehavior::Host => {}
        UploadBehavior::Status(code) => {
            log::warn!("Mock upload #{} rejected with {}", id, code);
            return (status_code(code), Json(error_body("Upload rejected by mock"))).into_response();
        }
        UploadBehavior::Malformed => {
            return (StatusCode::OK, "<html>not json</html>").into_response();
        }
    }

    let Some((file_name, content_type, bytes)) = file else {
        return (
            StatusCode::BAD_REQUEST,
            Json(error_body("Missing required parameter - file")),
        )
            .into_response();
    };
    if preset.as_deref() != Some(state.config.upload_preset.as_str()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(error_body("Upload preset must be whitelisted for unsigned uploads")),
        )
            .into_response();
    }

    let file_name = hosted_name(&file_name);
    let size = bytes.len();
    let secure_url = format!("{}/assets/{}/{}", state.base_url, id, file_name);
    state
        .assets
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert((id, file_name.clone()), HostedAsset { content_type, bytes });

    log::info!("Mock hosted {} ({} bytes) for cloud {}", file_name, size, cloud_name);

    Json(json!({
        "asset_id": format!("mock-{}", id),
        "public_id": format!("{}/{}", cloud_name, file_name),
        "bytes": size,
        "url": secure_url,
        "secure_url": secure_url,
    }))
    .into_response()
}

async fn asset(
    State(state): State<Arc<MockState>>,
    Path((id, file_name)): Path<(usize, String)>,
) -> Response {
    let assets = state.assets.lock().unwrap_or_else(PoisonError::into_inner);
    match assets.get(&(id, file_name)) {
        Some(asset) => (
            [(header::CONTENT_TYPE, asset.content_type.clone())],
            asset.bytes.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, Json(error_body("Resource not found"))).into_response(),
    }
}

async fn predict(State(state): State<Arc<MockState>>, Json(request): Json<PredictRequest>) -> Response {
    state.predictions.fetch_add(1, Ordering::SeqCst);

    if !state.config.predict_delay.is_zero() {
        tokio::time::sleep(state.config.predict_delay).await;
    }

    let digit = match state.config.predict {
        PredictBehavior::Digit(d) => d,
        PredictBehavior::Infer { fallback } => infer_digit(&request.url).unwrap_or(fallback),
        PredictBehavior::Status(code) => {
            return (status_code(code), Json(error_body("Prediction failed"))).into_response();
        }
        PredictBehavior::Malformed => {
            return (StatusCode::OK, "Internal error").into_response();
        }
    };

    log::info!("Mock predicted {} for {}", digit, request.url);
    Json(json!({ "predicted_digit": digit })).into_response()
}

// =============================================================================
// Server
// =============================================================================

/// A mock running on a background task; stopped on drop.
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        self.state.base_url.clone()
    }

    /// Endpoints a client should use to talk to this mock.
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::local(&self.state.base_url)
    }

    pub fn uploads(&self) -> usize {
        self.state.uploads.load(Ordering::SeqCst)
    }

    pub fn predictions(&self) -> usize {
        self.state.predictions.load(Ordering::SeqCst)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a mock on an ephemeral localhost port.
pub async fn spawn(config: MockConfig) -> std::io::Result<MockServer> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let state = Arc::new(MockState::new(config, format!("http://{}", addr)));
    let app = router(Arc::clone(&state));

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("Mock server stopped: {}", e);
        }
    });

    Ok(MockServer { addr, state, handle })
}

/// Run a mock in the foreground until the process is stopped.
pub async fn serve(port: u16, config: MockConfig) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let base_url = format!("http://localhost:{}", port);
    let endpoints = Endpoints::local(&base_url);
    let state = Arc::new(MockState::new(config, base_url.clone()));

    println!("🚀 Boltzmann mock services running on {}", base_url);
    println!("   POST {} - Asset host upload", endpoints.upload_url());
    println!("   POST {} - Digit prediction", endpoints.predict_url);
    println!("   GET  {}/health - Health check", base_url);
    println!();

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_digit() {
        assert_eq!(infer_digit("http://localhost:8787/assets/3/digit7.png"), Some(7));
        assert_eq!(infer_digit("https://host/x.png"), None);
        // upload id in the path is ignored
        assert_eq!(infer_digit("http://h/assets/12/five.png"), None);
    }

    #[tokio::test]
    async fn test_health_and_asset_roundtrip() {
        let server = spawn(MockConfig::default()).await.unwrap();
        let client = reqwest::Client::new();

        let health: Value = client
            .get(format!("{}/health", server.base_url()))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(b"pixels".to_vec()).file_name("digit4.png"),
            )
            .text("upload_preset", UPLOAD_PRESET)
            .text("cloud_name", "de1yfnzdz");
        let body: Value = client
            .post(server.endpoints().upload_url())
            .multipart(form)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let secure_url = body["secure_url"].as_str().unwrap().to_string();
        let hosted = client.get(&secure_url).send().await.unwrap().bytes().await.unwrap();
        assert_eq!(&hosted[..], b"pixels");
    }

    #[test]
    fn test_hosted_name() {
        assert_eq!(hosted_name("digit7.png"), "digit7.png");
        assert_eq!(hosted_name("my digit#7?.png"), "my_digit_7_.png");
        assert_eq!(hosted_name("../../etc/digit3.png"), "digit3.png");
        assert_eq!(hosted_name(".."), "upload");
    }

    #[tokio::test]
    async fn test_awkward_file_name_is_served_back() {
        let server = spawn(MockConfig::default()).await.unwrap();
        let client = reqwest::Client::new();
        // browsers send the file name as-is
        let form = reqwest::multipart::Form::new()
            .percent_encode_noop()
            .part(
                "file",
                reqwest::multipart::Part::bytes(b"pixels".to_vec()).file_name("scan #2?.png"),
            )
            .text("upload_preset", UPLOAD_PRESET);
        let body: Value = client
            .post(server.endpoints().upload_url())
            .multipart(form)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let secure_url = body["secure_url"].as_str().unwrap().to_string();
        assert!(secure_url.ends_with("/scan__2_.png"));
        assert_eq!(infer_digit(&secure_url), Some(2));

        let response = client.get(&secure_url).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(&response.bytes().await.unwrap()[..], b"pixels");
    }

    #[tokio::test]
    async fn test_wrong_preset_is_rejected() {
        let server = spawn(MockConfig::default()).await.unwrap();
        let form = reqwest::multipart::Form::new()
            .part("file", reqwest::multipart::Part::bytes(vec![1, 2, 3]).file_name("a.png"))
            .text("upload_preset", "someone_else");

        let response = reqwest::Client::new()
            .post(server.endpoints().upload_url())
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(server.uploads(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected() {
        let server = spawn(MockConfig::default()).await.unwrap();
        let form = reqwest::multipart::Form::new().text("upload_preset", UPLOAD_PRESET);

        let response = reqwest::Client::new()
            .post(server.endpoints().upload_url())
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
