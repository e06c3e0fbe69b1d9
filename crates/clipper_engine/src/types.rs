use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Request id echoed back with the submission result.
pub type RequestId = u64;

/// Body of `POST /process_video`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRequest {
    pub video_source: String,
    pub query: String,
}

/// Body of `GET /status/{process_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReport {
    pub status: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub found_scene: Option<bool>,
}

impl StatusReport {
    /// Progress clamped to a whole percentage.
    pub fn progress_percent(&self) -> Option<u8> {
        self.progress
            .filter(|value| value.is_finite())
            .map(|value| value.clamp(0.0, 100.0).round() as u8)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "error")
    }
}

/// One-shot timers the engine can run on behalf of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKey {
    DownloadCooldown,
    NoticeDismiss(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Submitted {
        request: RequestId,
        result: Result<String, ApiError>,
    },
    Status {
        process_id: String,
        result: Result<StatusReport, ApiError>,
    },
    Downloaded {
        process_id: String,
        result: Result<PathBuf, ApiError>,
    },
    TimerFired(TimerKey),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Text suitable for the user: server-reported errors verbatim, the rest with their kind.
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Server => self.message.clone(),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    /// The server answered with an `{"error": ...}` body.
    Server,
    Decode,
    Timeout,
    Network,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Server => write!(f, "server error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
