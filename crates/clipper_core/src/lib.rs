//! Clipper core: pure job controller state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod status;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, JobStatus, Phase, ProcessId, RequestId, StatusSnapshot};
pub use status::{progress_text, status_message};
pub use update::update;
pub use validate::{download_filename, looks_like_url, validate_source, ValidationError};
pub use view_model::{
    AppViewModel, DownloadButtonView, Notice, NoticeId, NoticeKind, ProgressView, ResultFact,
    ResultView, DOWNLOAD_COOLDOWN, DOWNLOAD_IDLE_LABEL, DOWNLOAD_PREPARING_LABEL,
    ERROR_NOTICE_TTL, POLL_INTERVAL, SUBMIT_BUSY_LABEL, SUBMIT_IDLE_LABEL, SUCCESS_NOTICE_TTL,
};
