use std::fmt;

use url::Url;

use crate::ProcessId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptySource,
    InvalidUrl,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptySource => {
                write!(f, "Please enter a video source (YouTube URL or file path)")
            }
            ValidationError::InvalidUrl => write!(f, "Please enter a valid URL"),
        }
    }
}

/// Anything starting with `http` is treated as a URL and must parse as one.
pub fn looks_like_url(source: &str) -> bool {
    source.starts_with("http")
}

/// Trims the raw input and checks it is worth sending to the server.
pub fn validate_source(raw: &str) -> Result<String, ValidationError> {
    let source = raw.trim();
    if source.is_empty() {
        return Err(ValidationError::EmptySource);
    }
    if looks_like_url(source) && Url::parse(source).is_err() {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(source.to_string())
}

/// Suggested name for the downloaded clip.
pub fn download_filename(process_id: &ProcessId) -> String {
    format!("vertical_clip_{process_id}.mp4")
}
