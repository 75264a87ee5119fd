//! HTTP services for the asset host and the predictor, over `fetch`.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use boltzmann_core::{
    parse_prediction_response, parse_upload_response, Digit, DigitService, Endpoints,
    PredictRequest, ServiceConfig, WorkflowError, WorkflowResult,
};
use futures::future::{select, Either};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

/// gloo-net implementation of [`DigitService`].
#[derive(Debug, Clone)]
pub struct BrowserService {
    config: ServiceConfig,
}

impl BrowserService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }
}

impl DigitService for BrowserService {
    type Image = File;

    async fn upload_image(&self, file: File) -> WorkflowResult<String> {
        with_timeout(
            self.config.upload_timeout,
            upload_to_asset_host(&self.config.endpoints, file),
        )
        .await
    }

    async fn predict_digit(&self, asset_url: &str) -> WorkflowResult<Digit> {
        with_timeout(
            self.config.predict_timeout,
            predict_from_url(&self.config.endpoints, asset_url),
        )
        .await
    }
}

/// Post `file` as multipart form data; returns the durable URL.
pub async fn upload_to_asset_host(endpoints: &Endpoints, file: File) -> WorkflowResult<String> {
    let browser = |e: JsValue| WorkflowError::Browser(format!("{:?}", e));

    let form_data = FormData::new().map_err(browser)?;
    form_data
        .append_with_blob_and_filename("file", &file, &file.name())
        .map_err(browser)?;
    form_data
        .append_with_str("upload_preset", &endpoints.upload_preset)
        .map_err(browser)?;
    form_data
        .append_with_str("cloud_name", &endpoints.cloud_name)
        .map_err(browser)?;

    log::info!("📤 Uploading {} ({} bytes)", file.name(), file.size());

    let response = Request::post(&endpoints.upload_url())
        .body(form_data)
        .map_err(|e| WorkflowError::Transport(format!("Failed to build request: {}", e)))?
        .send()
        .await
        .map_err(|e| WorkflowError::Transport(e.to_string()))?;

    let body = read_body(response).await?;
    parse_upload_response(&body)
}

/// Post `{"url": asset_url}` to the predictor.
pub async fn predict_from_url(endpoints: &Endpoints, asset_url: &str) -> WorkflowResult<Digit> {
    log::info!("🔍 Requesting prediction for {}", asset_url);

    let response = Request::post(&endpoints.predict_url)
        .json(&PredictRequest::new(asset_url))
        .map_err(|e| WorkflowError::Transport(format!("Failed to build request: {}", e)))?
        .send()
        .await
        .map_err(|e| WorkflowError::Transport(e.to_string()))?;

    let body = read_body(response).await?;
    parse_prediction_response(&body)
}

async fn read_body(response: Response) -> WorkflowResult<String> {
    let status = response.status();
    let ok = response.ok();
    let body = response
        .text()
        .await
        .map_err(|e| WorkflowError::Transport(e.to_string()))?;
    if !ok {
        return Err(WorkflowError::Status { code: status, body });
    }
    Ok(body)
}

/// Milliseconds for a browser timer, saturating at `u32::MAX`.
pub fn timer_millis(budget: Duration) -> u32 {
    u32::try_from(budget.as_millis()).unwrap_or(u32::MAX)
}

/// Race `fut` against a timer; the request is abandoned, not aborted.
async fn with_timeout<T>(
    budget: Duration,
    fut: impl Future<Output = WorkflowResult<T>>,
) -> WorkflowResult<T> {
    let fut = pin!(fut);
    let timer = pin!(TimeoutFuture::new(timer_millis(budget)));
    match select(fut, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(WorkflowError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_millis() {
        assert_eq!(timer_millis(Duration::from_secs(30)), 30_000);
        assert_eq!(timer_millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }
}
