//! Native HTTP client for the asset host and the predictor.
//!
//! [`HttpService`] implements [`DigitService`] with reqwest;
//! [`NativeClient`] owns a workflow session and exposes the three user
//! actions (select/upload, predict, reset) as plain async methods.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use boltzmann_core::{
    parse_prediction_response, parse_upload_response, request_prediction, select_and_upload,
    Digit, DigitService, PredictRequest, PreviewRef, ServiceConfig, SessionSnapshot, SessionStore,
    UploadSession, Workflow, WorkflowError, WorkflowResult,
};
use reqwest::multipart::{Form, Part};

use crate::error::{CliError, CliResult};

// =============================================================================
// Local image + preview
// =============================================================================

/// A file read from disk, ready to be sent as multipart data.
#[derive(Debug, Clone)]
pub struct LocalImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<&'static str>,
}

impl LocalImage {
    /// Read any file; no type or size validation is applied.
    pub async fn from_path(path: &Path) -> WorkflowResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = guess_mime(&file_name);
        Ok(Self {
            file_name,
            bytes,
            mime,
        })
    }
}

/// Content type from the file extension, if it is a common image format.
pub fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Terminal-side preview: a `file://` reference to the selected image.
#[derive(Debug)]
pub struct LocalPreview {
    src: String,
}

impl LocalPreview {
    pub fn for_path(path: &Path) -> Self {
        let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));
        Self {
            src: format!("file://{}", absolute.display()),
        }
    }
}

impl PreviewRef for LocalPreview {
    fn src(&self) -> &str {
        &self.src
    }
}

impl Drop for LocalPreview {
    fn drop(&mut self) {
        log::debug!("Released preview {}", self.src);
    }
}

// =============================================================================
// HTTP service
// =============================================================================

/// reqwest-backed implementation of both external services.
#[derive(Clone)]
pub struct HttpService {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpService {
    pub fn new(config: ServiceConfig) -> CliResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("boltzmann/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

fn transport_error(err: reqwest::Error) -> WorkflowError {
    if err.is_timeout() {
        WorkflowError::Timeout
    } else {
        WorkflowError::Transport(err.to_string())
    }
}

/// Read the body, turning non-2xx statuses into [`WorkflowError::Status`].
async fn read_body(response: reqwest::Response) -> WorkflowResult<String> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    if !status.is_success() {
        return Err(WorkflowError::Status {
            code: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

impl DigitService for HttpService {
    type Image = LocalImage;

    async fn upload_image(&self, image: LocalImage) -> WorkflowResult<String> {
        let endpoints = &self.config.endpoints;
        let url = endpoints.upload_url();
        log::info!("Uploading {} ({} bytes) to {}", image.file_name, image.bytes.len(), url);

        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(mime) = image.mime {
            part = part
                .mime_str(mime)
                .map_err(|e| WorkflowError::Transport(e.to_string()))?;
        }
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", endpoints.upload_preset.clone())
            .text("cloud_name", endpoints.cloud_name.clone());

        let response = self
            .client
            .post(&url)
            .timeout(self.config.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let body = read_body(response).await?;
        parse_upload_response(&body)
    }

    async fn predict_digit(&self, asset_url: &str) -> WorkflowResult<Digit> {
        let url = &self.config.endpoints.predict_url;
        log::info!("Requesting prediction for {}", asset_url);

        let response = self
            .client
            .post(url)
            .timeout(self.config.predict_timeout)
            .json(&PredictRequest::new(asset_url))
            .send()
            .await
            .map_err(transport_error)?;

        let body = read_body(response).await?;
        parse_prediction_response(&body)
    }
}

// =============================================================================
// Native client
// =============================================================================

type NativeStore = Arc<Mutex<Workflow<LocalPreview>>>;

/// One upload/predict session driven from the command line.
pub struct NativeClient {
    service: HttpService,
    store: NativeStore,
}

impl NativeClient {
    pub fn new(config: ServiceConfig) -> CliResult<Self> {
        Ok(Self {
            service: HttpService::new(config)?,
            store: Arc::new(Mutex::new(Workflow::new())),
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.store
            .with_workflow(|wf| wf.snapshot())
            .unwrap_or_default()
    }

    /// Select the image at `path` and upload it; returns the durable URL.
    pub async fn upload(&self, path: &Path) -> CliResult<String> {
        let image = LocalImage::from_path(path).await?;
        select_and_upload(&self.store, &self.service, LocalPreview::for_path(path), image).await;
        self.outcome(|s| s.remote_asset_url().map(str::to_string))
    }

    /// Predict the digit for the currently hosted image.
    pub async fn predict(&self) -> CliResult<Digit> {
        if request_prediction(&self.store, &self.service).await.is_none() {
            return Err(CliError::Incomplete("no hosted image to classify".to_string()));
        }
        self.outcome(|s| s.predicted_label())
    }

    /// Full workflow for one file.
    pub async fn upload_and_predict(&self, path: &Path) -> CliResult<(String, Digit)> {
        let url = self.upload(path).await?;
        let digit = self.predict().await?;
        Ok((url, digit))
    }

    /// Predict for an image that is already hosted, bypassing the session.
    pub async fn classify(&self, asset_url: &str) -> CliResult<Digit> {
        Ok(self.service.predict_digit(asset_url).await?)
    }

    pub fn reset(&self) {
        self.store.with_workflow(|wf| wf.reset());
    }

    fn outcome<T>(&self, pick: impl FnOnce(&UploadSession<LocalPreview>) -> Option<T>) -> CliResult<T> {
        self.store
            .with_workflow(|wf| {
                let session = wf.session();
                if let Some(value) = pick(session) {
                    return Ok(value);
                }
                match session.failure() {
                    Some(failure) => Err(CliError::Session(failure.clone())),
                    None => Err(CliError::Incomplete(format!("{:?}", session.phase()))),
                }
            })
            .unwrap_or_else(|| Err(CliError::Incomplete("session dropped".to_string())))
    }
}
