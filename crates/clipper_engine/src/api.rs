use std::path::PathBuf;
use std::time::Duration;

use clipper_logging::{clipper_debug, clipper_info};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use url::Url;

use crate::filename::safe_filename;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{ApiError, FailureKind, JobRequest, StatusReport};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Root of the job server, e.g. `http://127.0.0.1:5000/`.
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Per-request timeout. `None` lets a hung request simply delay the next poll.
    pub request_timeout: Option<Duration>,
}

impl ApiSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The three endpoints of the job server.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    /// `POST /process_video`; returns the process id.
    async fn submit(&self, request: &JobRequest) -> Result<String, ApiError>;

    /// `GET /status/{process_id}`.
    async fn status(&self, process_id: &str) -> Result<StatusReport, ApiError>;

    /// `GET /download/{process_id}`, streamed into `writer` as `filename`.
    async fn download(
        &self,
        process_id: &str,
        filename: &str,
        writer: &AtomicFileWriter,
    ) -> Result<PathBuf, ApiError>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    process_id: Option<ProcessIdRepr>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProcessIdRepr {
    Text(String),
    Number(serde_json::Number),
}

impl ProcessIdRepr {
    fn into_string(self) -> String {
        match self {
            ProcessIdRepr::Text(text) => text,
            ProcessIdRepr::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        if settings.base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a server root", settings.base_url),
            ));
        }
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// Joins path segments onto the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::new(
                    FailureKind::InvalidUrl,
                    format!("{} cannot be used as a server root", self.settings.base_url),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn submit(&self, request: &JobRequest) -> Result<String, ApiError> {
        let url = self.endpoint(&["process_video"])?;
        let body = serde_json::to_vec(request)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        clipper_debug!("POST {} source_len={}", url, request.video_source.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        // Error bodies arrive with 4xx/5xx; anything unparsable falls back to the status code.
        let parsed: SubmitResponse = match serde_json::from_slice(&bytes) {
            Ok(parsed) => parsed,
            Err(err) if status.is_success() => {
                return Err(ApiError::new(FailureKind::Decode, err.to_string()));
            }
            Err(_) => {
                return Err(ApiError::new(
                    FailureKind::HttpStatus(status.as_u16()),
                    status.to_string(),
                ));
            }
        };

        if let Some(error) = parsed.error.filter(|error| !error.is_empty()) {
            return Err(ApiError::new(FailureKind::Server, error));
        }
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        match parsed.process_id {
            Some(id) => {
                let id = id.into_string();
                clipper_info!("Job accepted process_id={}", id);
                Ok(id)
            }
            None => Err(ApiError::new(
                FailureKind::Decode,
                "response carried neither process_id nor error",
            )),
        }
    }

    async fn status(&self, process_id: &str) -> Result<StatusReport, ApiError> {
        let url = self.endpoint(&["status", process_id])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        serde_json::from_slice::<StatusReport>(&bytes).map_err(|err| {
            if status.is_success() {
                ApiError::new(FailureKind::Decode, err.to_string())
            } else {
                ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
            }
        })
    }

    async fn download(
        &self,
        process_id: &str,
        filename: &str,
        writer: &AtomicFileWriter,
    ) -> Result<PathBuf, ApiError> {
        let url = self.endpoint(&["download", process_id])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let mut pending = writer.begin(&safe_filename(filename)).map_err(map_persist_error)?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            pending.write_chunk(&chunk).map_err(map_persist_error)?;
        }
        let written = pending.bytes_written();
        let path = pending.commit().map_err(map_persist_error)?;
        clipper_info!("Downloaded {} bytes to {:?}", written, path);
        Ok(path)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

fn map_persist_error(err: PersistError) -> ApiError {
    ApiError::new(FailureKind::Io, err.to_string())
}
