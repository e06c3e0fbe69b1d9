use std::fmt;

use crate::status::progress_text;
use crate::view_model::{
    AppViewModel, DownloadButtonView, Notice, NoticeId, NoticeKind, ProgressView, ResultView,
    DOWNLOAD_IDLE_LABEL, DOWNLOAD_PREPARING_LABEL, SUBMIT_BUSY_LABEL, SUBMIT_IDLE_LABEL,
};

/// Sequence number of a submission; lets late submit results be told apart.
pub type RequestId = u64;

/// Opaque job handle returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessId(String);

impl ProcessId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

/// Job status as reported by `GET /status/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Uploading,
    Indexing,
    Searching,
    Generating,
    Converting,
    Completed,
    Error,
    /// Anything else the server reports, e.g. `not_found`.
    Other(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "uploading" => Self::Uploading,
            "indexing" => Self::Indexing,
            "searching" => Self::Searching,
            "generating" => Self::Generating,
            "converting" => Self::Converting,
            "completed" => Self::Completed,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Uploading => "uploading",
            Self::Indexing => "indexing",
            Self::Searching => "searching",
            Self::Generating => "generating",
            Self::Converting => "converting",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Other(raw) => raw,
        }
    }

    /// Polling stops after a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub status: JobStatus,
    /// Percentage 0..=100; `None` when the server omitted it.
    pub progress: Option<u8>,
    pub message: Option<String>,
    pub found_scene: Option<bool>,
}

impl StatusSnapshot {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            progress: None,
            message: None,
            found_scene: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: Phase,
    source_input: String,
    query_input: String,
    source_invalid: bool,
    process_id: Option<ProcessId>,
    last_request: RequestId,
    polling: bool,
    progress: Option<ProgressView>,
    result: Option<ResultView>,
    download_cooling: bool,
    notice: Option<Notice>,
    last_notice_id: NoticeId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let inputs_enabled = self.inputs_enabled();
        let download_enabled = self.result.is_some() && !self.download_cooling;
        AppViewModel {
            phase: self.phase,
            source: self.source_input.clone(),
            query: self.query_input.clone(),
            source_invalid: self.source_invalid,
            inputs_enabled,
            submit_label: if inputs_enabled {
                SUBMIT_IDLE_LABEL
            } else {
                SUBMIT_BUSY_LABEL
            },
            progress: self.progress.clone(),
            result: self.result.clone(),
            download: DownloadButtonView {
                enabled: download_enabled,
                label: if self.download_cooling {
                    DOWNLOAD_PREPARING_LABEL
                } else {
                    DOWNLOAD_IDLE_LABEL
                },
            },
            notice: self.notice.clone(),
            process_id: self.process_id.clone(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn process_id(&self) -> Option<&ProcessId> {
        self.process_id.as_ref()
    }

    /// Whether a poll timer is live according to the effects emitted so far.
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn inputs_enabled(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Failed)
    }

    pub(crate) fn source_input(&self) -> &str {
        &self.source_input
    }

    pub(crate) fn query_input(&self) -> &str {
        &self.query_input
    }

    pub(crate) fn set_source(&mut self, text: String) {
        if self.source_input != text {
            self.source_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_query(&mut self, text: String) {
        if self.query_input != text {
            self.query_input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_source_invalid(&mut self, invalid: bool) {
        if self.source_invalid != invalid {
            self.source_invalid = invalid;
            self.mark_dirty();
        }
    }

    pub(crate) fn is_current_request(&self, request: RequestId) -> bool {
        self.phase == Phase::Submitting && self.last_request == request
    }

    pub(crate) fn is_current_job(&self, process_id: &ProcessId) -> bool {
        self.polling && self.process_id.as_ref() == Some(process_id)
    }

    pub(crate) fn result_visible(&self) -> bool {
        self.result.is_some()
    }

    pub(crate) fn download_cooling(&self) -> bool {
        self.download_cooling
    }

    /// Idle/Failed -> Submitting. Returns the id the submit result must carry.
    pub(crate) fn begin_submission(&mut self) -> RequestId {
        self.last_request += 1;
        self.phase = Phase::Submitting;
        self.process_id = None;
        self.source_invalid = false;
        self.result = None;
        self.set_progress(0, "Starting video processing...");
        self.mark_dirty();
        self.last_request
    }

    /// Submitting -> Polling. Returns whether a previous timer was still live.
    pub(crate) fn begin_polling(&mut self, process_id: ProcessId) -> bool {
        let had_timer = self.polling;
        self.process_id = Some(process_id);
        self.phase = Phase::Polling;
        self.polling = true;
        self.mark_dirty();
        had_timer
    }

    /// Returns whether a timer was live and must be stopped.
    pub(crate) fn stop_polling(&mut self) -> bool {
        std::mem::take(&mut self.polling)
    }

    pub(crate) fn set_progress(&mut self, percent: u8, message: &str) {
        let percent = percent.min(100);
        self.progress = Some(ProgressView {
            percent,
            text: progress_text(percent, message),
        });
        self.mark_dirty();
    }

    pub(crate) fn complete(&mut self, result: ResultView) {
        self.phase = Phase::Completed;
        self.progress = None;
        self.result = Some(result);
        self.mark_dirty();
    }

    /// Any failure: form back to editable, progress hidden, handle dropped.
    pub(crate) fn fail(&mut self) {
        self.phase = Phase::Failed;
        self.progress = None;
        self.process_id = None;
        self.mark_dirty();
    }

    pub(crate) fn set_download_cooling(&mut self, cooling: bool) {
        if self.download_cooling != cooling {
            self.download_cooling = cooling;
            self.mark_dirty();
        }
    }

    /// Clears everything the form owns. Notices and the download cooldown run out on their own.
    pub(crate) fn reset(&mut self) {
        let before = self.clone();
        self.phase = Phase::Idle;
        self.source_input.clear();
        self.query_input.clear();
        self.source_invalid = false;
        self.process_id = None;
        self.polling = false;
        self.progress = None;
        self.result = None;
        if *self != before {
            self.mark_dirty();
        }
    }

    /// Replaces the current notice and returns the id to schedule its dismissal with.
    pub(crate) fn show_notice(&mut self, kind: NoticeKind, text: String) -> NoticeId {
        self.last_notice_id += 1;
        self.notice = Some(Notice {
            id: self.last_notice_id,
            kind,
            text,
        });
        self.mark_dirty();
        self.last_notice_id
    }

    pub(crate) fn dismiss_notice(&mut self, notice_id: NoticeId) {
        if self.notice.as_ref().is_some_and(|notice| notice.id == notice_id) {
            self.notice = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn dismiss_error_notice(&mut self) {
        if self
            .notice
            .as_ref()
            .is_some_and(|notice| notice.kind == NoticeKind::Error)
        {
            self.notice = None;
            self.mark_dirty();
        }
    }
}
