use std::time::Duration;

use crate::{Phase, ProcessId};

/// Interval between two status polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);
/// How long the download button stays disabled after a click.
pub const DOWNLOAD_COOLDOWN: Duration = Duration::from_millis(3000);
pub const ERROR_NOTICE_TTL: Duration = Duration::from_millis(5000);
pub const SUCCESS_NOTICE_TTL: Duration = Duration::from_millis(3000);

pub const SUBMIT_IDLE_LABEL: &str = "🎬 Generate Vertical Clip";
pub const SUBMIT_BUSY_LABEL: &str = "⏳ Processing...";
pub const DOWNLOAD_IDLE_LABEL: &str = "📥 Download Vertical Clip";
pub const DOWNLOAD_PREPARING_LABEL: &str = "⏳ Preparing Download...";

pub type NoticeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

impl NoticeKind {
    pub fn time_to_live(self) -> Duration {
        match self {
            NoticeKind::Error => ERROR_NOTICE_TTL,
            NoticeKind::Success => SUCCESS_NOTICE_TTL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFact {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub found_scene: Option<bool>,
    pub facts: Vec<ResultFact>,
}

impl ResultView {
    pub fn from_found_scene(found_scene: Option<bool>) -> Self {
        let scene_text = if found_scene == Some(true) {
            "✅ Yes - Found matching scene"
        } else {
            "⚠️ No - Using default first 30 seconds"
        };
        let fact = |label, value: &str| ResultFact {
            label,
            value: value.to_string(),
        };
        Self {
            found_scene,
            facts: vec![
                fact("Processing Status", "✅ Completed Successfully"),
                fact("Scene Query Result", scene_text),
                fact("Video Format", "📱 Converted to Vertical (9:16)"),
                fact("Ready for Download", "📥 Your vertical clip is ready!"),
            ],
        }
    }

    pub fn scene_text(&self) -> &str {
        self.facts
            .iter()
            .find(|fact| fact.label == "Scene Query Result")
            .map(|fact| fact.value.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadButtonView {
    pub enabled: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub phase: Phase,
    pub source: String,
    pub query: String,
    pub source_invalid: bool,
    pub inputs_enabled: bool,
    pub submit_label: &'static str,
    /// `None` while the progress panel is hidden.
    pub progress: Option<ProgressView>,
    /// `None` while the result panel is hidden.
    pub result: Option<ResultView>,
    pub download: DownloadButtonView,
    pub notice: Option<Notice>,
    pub process_id: Option<ProcessId>,
}
