use crate::JobStatus;

/// Progress line shown for a status; unknown statuses fall back to `Processing: <status>`.
pub fn status_message(status: &JobStatus) -> String {
    match status {
        JobStatus::Uploading => "Uploading video to VideoDB...".to_string(),
        JobStatus::Indexing => "Indexing video scenes...".to_string(),
        JobStatus::Searching => "Searching for matching scenes...".to_string(),
        JobStatus::Generating => "Generating video stream...".to_string(),
        JobStatus::Converting => "Converting to vertical format...".to_string(),
        other => format!("Processing: {}", other.as_str()),
    }
}

/// Text under the progress bar. A full bar always reads as complete.
pub fn progress_text(percent: u8, message: &str) -> String {
    if percent >= 100 {
        "Processing complete! 🎉".to_string()
    } else {
        message.to_string()
    }
}
