use std::time::Duration;

use crate::{NoticeId, ProcessId, RequestId};

/// Side effects requested by [`crate::update`]. The app's effect runner executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue `POST /process_video`. The result comes back tagged with `request`.
    SubmitJob {
        request: RequestId,
        video_source: String,
        query: String,
    },
    /// Install the poll timer for `process_id`, replacing any live one.
    StartPolling { process_id: ProcessId },
    StopPolling,
    DownloadClip {
        process_id: ProcessId,
        filename: String,
    },
    ScheduleDownloadCooldown { after: Duration },
    ScheduleNoticeDismiss { notice_id: NoticeId, after: Duration },
    ScrollToTop,
}
