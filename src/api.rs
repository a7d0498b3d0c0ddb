//! HTTP client for the analysis backend.
//!
//! Every request goes through [`decode`], so status handling and error
//! classification happen in exactly one place. Callers only ever see
//! [`ApiError`].

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use web_sys::{File, FormData};

use crate::models::{
    AnalysisReport, DatasetId, HistoryEntry, HistoryResponse, ModelsResponse, SystemMetrics,
    TrainedModel, TrainingResult, UploadResponse,
};

pub const API_ROOT: &str = "/api/v1";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// 4xx carrying a structured `detail` message from the backend.
    #[error("{0}")]
    Validation(String),
    /// 5xx, with or without a body.
    #[error("server error: {0}")]
    Server(String),
    /// Everything else: undecodable bodies, statuses outside the contract.
    #[error("unexpected response: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Text to put in front of the user: the backend's `detail` when this is
    /// a validation failure, otherwise the caller's generic message.
    pub fn message_or(&self, generic: &str) -> String {
        match self {
            ApiError::Validation(detail) => detail.clone(),
            _ => generic.to_string(),
        }
    }
}

/// FastAPI error envelope.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

fn classify_status(status: u16, detail: Option<String>) -> ApiError {
    match (status, detail) {
        (400..=499, Some(detail)) => ApiError::Validation(detail),
        (500..=599, detail) => {
            ApiError::Server(detail.unwrap_or_else(|| format!("HTTP {status}")))
        }
        _ => ApiError::Unknown(format!("HTTP {status}")),
    }
}

fn network_error(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        let status = response.status();
        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail);
        return Err(classify_status(status, detail));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Unknown(err.to_string()))
}

fn empty_form() -> Result<FormData, ApiError> {
    FormData::new().map_err(|_| ApiError::Unknown("form data unavailable".to_string()))
}

/// `POST /upload`, multipart with the file under the `file` field. The
/// browser picks the boundary.
pub async fn upload_dataset(file: &File) -> Result<UploadResponse, ApiError> {
    let form = empty_form()?;
    form.append_with_blob("file", file)
        .map_err(|_| ApiError::Unknown("form data unavailable".to_string()))?;
    let response = Request::post(&format!("{API_ROOT}/upload"))
        .body(form)
        .map_err(|err| ApiError::Unknown(err.to_string()))?
        .send()
        .await
        .map_err(network_error)?;
    decode(response).await
}

/// `GET /analyze/{dataset_id}`.
pub async fn fetch_analysis(dataset_id: DatasetId) -> Result<AnalysisReport, ApiError> {
    let response = Request::get(&format!("{API_ROOT}/analyze/{dataset_id}"))
        .send()
        .await
        .map_err(network_error)?;
    decode(response).await
}

/// `POST /train?dataset_id=&target_column=`. The backend insists on a
/// multipart body even though it carries nothing.
pub async fn train_model(
    dataset_id: DatasetId,
    target_column: &str,
) -> Result<TrainingResult, ApiError> {
    let form = empty_form()?;
    let response = Request::post(&format!("{API_ROOT}/train"))
        .query([
            ("dataset_id", dataset_id.to_string()),
            ("target_column", target_column.to_string()),
        ])
        .body(form)
        .map_err(|err| ApiError::Unknown(err.to_string()))?
        .send()
        .await
        .map_err(network_error)?;
    decode(response).await
}

/// `GET /models`, unwrapped from its envelope.
pub async fn fetch_models() -> Result<Vec<TrainedModel>, ApiError> {
    let response = Request::get(&format!("{API_ROOT}/models"))
        .send()
        .await
        .map_err(network_error)?;
    let body: ModelsResponse = decode(response).await?;
    Ok(body.models)
}

/// `GET /history`, unwrapped from its envelope.
pub async fn fetch_history() -> Result<Vec<HistoryEntry>, ApiError> {
    let response = Request::get(&format!("{API_ROOT}/history"))
        .send()
        .await
        .map_err(network_error)?;
    let body: HistoryResponse = decode(response).await?;
    Ok(body.history)
}

/// `GET /metrics`.
pub async fn fetch_metrics() -> Result<SystemMetrics, ApiError> {
    let response = Request::get(&format!("{API_ROOT}/metrics"))
        .send()
        .await
        .map_err(network_error)?;
    decode(response).await
}
