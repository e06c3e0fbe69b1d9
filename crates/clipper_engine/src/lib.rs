//! Clipper engine: job server IO and effect execution.
mod api;
mod engine;
mod filename;
mod persist;
mod poll;
mod types;

pub use api::{ApiSettings, JobApi, ReqwestJobApi};
pub use engine::{spawn_status_poll, ChannelEventSink, EngineHandle, EventSink};
pub use filename::safe_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PendingFile, PersistError};
pub use poll::{PollSlot, PollTimer};
pub use types::{
    ApiError, EngineEvent, FailureKind, JobRequest, RequestId, StatusReport, TimerKey,
};
