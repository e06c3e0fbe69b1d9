#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the video source input.
    SourceEdited(String),
    /// User edited the scene query input.
    QueryEdited(String),
    /// Video source input gained focus.
    SourceFocused,
    /// Video source input lost focus; triggers URL feedback.
    SourceBlurred,
    /// User submitted the form.
    SubmitClicked,
    /// Server accepted the job.
    SubmitSucceeded {
        request: crate::RequestId,
        process_id: crate::ProcessId,
    },
    /// Submission failed on the wire or the server reported an error.
    SubmitFailed {
        request: crate::RequestId,
        message: String,
    },
    /// A poll tick produced a status snapshot.
    StatusReceived {
        process_id: crate::ProcessId,
        snapshot: crate::StatusSnapshot,
    },
    /// A poll tick failed to reach the server or to decode its answer.
    StatusFailed {
        process_id: crate::ProcessId,
        message: String,
    },
    /// User asked for the finished clip.
    DownloadClicked,
    /// The download button cooldown ran out.
    DownloadCooldownElapsed,
    /// The engine finished writing (or failed to write) the clip.
    DownloadFinished {
        process_id: crate::ProcessId,
        result: Result<String, String>,
    },
    /// User asked for a fresh form.
    ResetClicked,
    /// A notice's display time ran out.
    NoticeExpired { notice_id: crate::NoticeId },
}
