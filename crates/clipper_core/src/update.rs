use crate::{
    download_filename, looks_like_url, status_message, validate_source, AppState, Effect,
    JobStatus, Msg, NoticeKind, ResultView, StatusSnapshot, DOWNLOAD_COOLDOWN,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SourceEdited(text) => {
            if state.inputs_enabled() {
                state.set_source(text);
            }
            Vec::new()
        }
        Msg::QueryEdited(text) => {
            if state.inputs_enabled() {
                state.set_query(text);
            }
            Vec::new()
        }
        Msg::SourceFocused => {
            state.dismiss_error_notice();
            state.set_source_invalid(false);
            Vec::new()
        }
        Msg::SourceBlurred => {
            let source = state.source_input().trim().to_string();
            let invalid = looks_like_url(&source) && validate_source(&source).is_err();
            state.set_source_invalid(invalid);
            if invalid {
                vec![notify(&mut state, NoticeKind::Error, "Please enter a valid URL")]
            } else {
                Vec::new()
            }
        }
        Msg::SubmitClicked => {
            if !state.inputs_enabled() {
                return (state, Vec::new());
            }
            match validate_source(state.source_input()) {
                Err(err) => vec![notify(&mut state, NoticeKind::Error, err.to_string())],
                Ok(video_source) => {
                    let query = state.query_input().trim().to_string();
                    let mut effects = Vec::with_capacity(2);
                    // Stale timer from an earlier job.
                    if state.stop_polling() {
                        effects.push(Effect::StopPolling);
                    }
                    let request = state.begin_submission();
                    effects.push(Effect::SubmitJob {
                        request,
                        video_source,
                        query,
                    });
                    effects
                }
            }
        }
        Msg::SubmitSucceeded {
            request,
            process_id,
        } => {
            if !state.is_current_request(request) {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(2);
            if state.begin_polling(process_id.clone()) {
                effects.push(Effect::StopPolling);
            }
            effects.push(Effect::StartPolling { process_id });
            effects
        }
        Msg::SubmitFailed { request, message } => {
            if !state.is_current_request(request) {
                return (state, Vec::new());
            }
            state.fail();
            vec![notify(
                &mut state,
                NoticeKind::Error,
                format!("Failed to start processing: {message}"),
            )]
        }
        Msg::StatusReceived {
            process_id,
            snapshot,
        } => {
            if !state.is_current_job(&process_id) {
                return (state, Vec::new());
            }
            apply_status(&mut state, snapshot)
        }
        Msg::StatusFailed { process_id, .. } => {
            if !state.is_current_job(&process_id) {
                return (state, Vec::new());
            }
            state.stop_polling();
            state.fail();
            vec![
                Effect::StopPolling,
                notify(
                    &mut state,
                    NoticeKind::Error,
                    "Failed to check processing status",
                ),
            ]
        }
        Msg::DownloadClicked => {
            if state.download_cooling() {
                return (state, Vec::new());
            }
            match state.process_id().cloned() {
                Some(process_id) if state.result_visible() => {
                    state.set_download_cooling(true);
                    let filename = download_filename(&process_id);
                    vec![
                        Effect::DownloadClip {
                            process_id,
                            filename,
                        },
                        Effect::ScheduleDownloadCooldown {
                            after: DOWNLOAD_COOLDOWN,
                        },
                    ]
                }
                _ => vec![notify(
                    &mut state,
                    NoticeKind::Error,
                    "No video available for download",
                )],
            }
        }
        Msg::DownloadCooldownElapsed => {
            state.set_download_cooling(false);
            Vec::new()
        }
        Msg::DownloadFinished { result, .. } => match result {
            Ok(path) => vec![notify(&mut state, NoticeKind::Success, format!("Saved {path}"))],
            Err(message) => vec![notify(
                &mut state,
                NoticeKind::Error,
                format!("Download failed: {message}"),
            )],
        },
        Msg::ResetClicked => {
            let mut effects = Vec::with_capacity(2);
            if state.stop_polling() {
                effects.push(Effect::StopPolling);
            }
            state.reset();
            effects.push(Effect::ScrollToTop);
            effects
        }
        Msg::NoticeExpired { notice_id } => {
            state.dismiss_notice(notice_id);
            Vec::new()
        }
    };

    (state, effects)
}

fn apply_status(state: &mut AppState, snapshot: StatusSnapshot) -> Vec<Effect> {
    let percent = snapshot.progress.unwrap_or(0);
    state.set_progress(percent, &status_message(&snapshot.status));

    if !snapshot.status.is_terminal() {
        return Vec::new();
    }
    state.stop_polling();
    if snapshot.status == JobStatus::Completed {
        state.complete(ResultView::from_found_scene(snapshot.found_scene));
        return vec![Effect::StopPolling];
    }
    state.fail();
    let message = snapshot
        .message
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| "Processing failed".to_string());
    vec![
        Effect::StopPolling,
        notify(state, NoticeKind::Error, message),
    ]
}

fn notify(state: &mut AppState, kind: NoticeKind, text: impl Into<String>) -> Effect {
    let notice_id = state.show_notice(kind, text.into());
    Effect::ScheduleNoticeDismiss {
        notice_id,
        after: kind.time_to_live(),
    }
}
