use clipper_core::{
    update, AppState, Effect, JobStatus, Msg, NoticeKind, Phase, ProcessId, StatusSnapshot,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    clipper_logging::initialize_for_tests();
}

fn polling_job(id: &str) -> AppState {
    let (state, _) = update(AppState::new(), Msg::SourceEdited("https://youtu.be/abc".into()));
    let (state, _) = update(state, Msg::QueryEdited("dog".into()));
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            request: 1,
            process_id: ProcessId::new(id),
        },
    );
    state
}

fn status(id: &str, status: &str, progress: Option<u8>) -> Msg {
    Msg::StatusReceived {
        process_id: ProcessId::new(id),
        snapshot: StatusSnapshot {
            progress,
            ..StatusSnapshot::new(JobStatus::parse(status))
        },
    }
}

/// Replays effects against a counter of live poll timers.
fn live_timers(effects: &[Effect], mut live: usize) -> usize {
    for effect in effects {
        match effect {
            Effect::StartPolling { .. } => live += 1,
            Effect::StopPolling => live = live.saturating_sub(1),
            _ => {}
        }
    }
    live
}

#[test]
fn progress_follows_status_table() {
    init_logging();
    let state = polling_job("42");
    let (state, effects) = update(state, status("42", "indexing", Some(40)));
    assert!(effects.is_empty());
    let progress = state.view().progress.expect("progress visible");
    assert_eq!(progress.percent, 40);
    assert_eq!(progress.text, "Indexing video scenes...");

    let (state, _) = update(state, status("42", "rendering", None));
    let progress = state.view().progress.expect("progress visible");
    assert_eq!(progress.percent, 0);
    assert_eq!(progress.text, "Processing: rendering");
    assert_eq!(state.phase(), Phase::Polling);
    assert!(state.is_polling());
}

#[test]
fn only_completed_and_error_end_polling() {
    init_logging();
    for raw in ["uploading", "converting", "not_found", "completed", "error"] {
        let terminal = JobStatus::parse(raw).is_terminal();
        assert_eq!(terminal, matches!(raw, "completed" | "error"), "{raw}");

        let (state, effects) = update(polling_job("42"), status("42", raw, Some(50)));
        assert_eq!(state.is_polling(), !terminal, "{raw}");
        assert_eq!(effects.contains(&Effect::StopPolling), terminal, "{raw}");
    }
}

#[test]
fn full_progress_reads_complete() {
    init_logging();
    let (state, _) = update(polling_job("1"), status("1", "converting", Some(100)));
    assert_eq!(
        state.view().progress.map(|p| p.text),
        Some("Processing complete! 🎉".to_string())
    );
}

#[test]
fn completion_with_scene_stops_polling_and_shows_match() {
    init_logging();
    let state = polling_job("9");
    let (state, _) = update(state, status("9", "uploading", Some(20)));
    let (state, _) = update(state, status("9", "searching", Some(60)));
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            process_id: ProcessId::new("9"),
            snapshot: StatusSnapshot {
                progress: Some(100),
                found_scene: Some(true),
                ..StatusSnapshot::new(JobStatus::Completed)
            },
        },
    );

    assert_eq!(effects, vec![Effect::StopPolling]);
    assert!(!state.is_polling());
    let view = state.view();
    assert_eq!(view.phase, Phase::Completed);
    assert!(view.progress.is_none());
    let result = view.result.expect("result panel");
    assert_eq!(result.scene_text(), "✅ Yes - Found matching scene");
    assert!(view.download.enabled);

    // Ticks already in flight when the timer stopped change nothing.
    let (next, effects) = update(state.clone(), status("9", "converting", Some(90)));
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn server_error_stops_polling_with_message() {
    init_logging();
    let state = polling_job("5");
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            process_id: ProcessId::new("5"),
            snapshot: StatusSnapshot {
                message: Some("Failed to upload video".to_string()),
                ..StatusSnapshot::new(JobStatus::Error)
            },
        },
    );

    assert_eq!(effects[0], Effect::StopPolling);
    assert_eq!(live_timers(&effects, 1), 0);
    let view = state.view();
    assert_eq!(view.phase, Phase::Failed);
    assert!(view.inputs_enabled);
    assert!(view.progress.is_none());
    assert!(view.process_id.is_none());
    let notice = view.notice.expect("error notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.text.contains("Failed to upload video"));
}

#[test]
fn server_error_without_message_uses_default() {
    init_logging();
    let (state, _) = update(polling_job("5"), status("5", "error", None));
    assert_eq!(
        state.view().notice.map(|n| n.text),
        Some("Processing failed".to_string())
    );
}

#[test]
fn transport_failure_is_final() {
    init_logging();
    let state = polling_job("3");
    let (state, effects) = update(
        state,
        Msg::StatusFailed {
            process_id: ProcessId::new("3"),
            message: "connection refused".to_string(),
        },
    );

    assert_eq!(live_timers(&effects, 1), 0);
    let view = state.view();
    assert_eq!(view.phase, Phase::Failed);
    assert!(view.inputs_enabled);
    assert!(view.progress.is_none());
    assert_eq!(
        view.notice.map(|n| n.text),
        Some("Failed to check processing status".to_string())
    );

    // A second failure from the same, now dead, timer is ignored.
    let (_state, effects) = update(
        state,
        Msg::StatusFailed {
            process_id: ProcessId::new("3"),
            message: "again".to_string(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn responses_for_other_handles_are_discarded() {
    init_logging();
    let state = polling_job("new");
    let (next, effects) = update(state.clone(), status("old", "completed", Some(100)));
    assert!(effects.is_empty());
    assert_eq!(next, state);

    let (next, effects) = update(
        state.clone(),
        Msg::StatusFailed {
            process_id: ProcessId::new("old"),
            message: "x".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn late_poll_after_reset_is_ignored() {
    init_logging();
    let state = polling_job("42");
    let (state, _) = update(state, Msg::ResetClicked);
    let (next, effects) = update(state.clone(), status("42", "completed", Some(100)));
    assert!(effects.is_empty());
    assert_eq!(next, state);
    assert!(next.view().result.is_none());
}

#[test]
fn second_job_after_reset_runs_a_single_timer() {
    init_logging();
    let state = polling_job("first");
    let mut live = 1;

    let (state, effects) = update(state, Msg::ResetClicked);
    live = live_timers(&effects, live);
    let (state, effects) = update(state, Msg::SourceEdited("b.mp4".into()));
    live = live_timers(&effects, live);
    let (state, effects) = update(state, Msg::SubmitClicked);
    live = live_timers(&effects, live);
    let (state, effects) = update(
        state,
        Msg::SubmitSucceeded {
            request: 2,
            process_id: ProcessId::new("second"),
        },
    );
    live = live_timers(&effects, live);

    assert_eq!(live, 1);
    assert_eq!(state.process_id(), Some(&ProcessId::new("second")));

    // The first job's ticks no longer reach the state.
    let (next, effects) = update(state.clone(), status("first", "indexing", Some(40)));
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn example_session_falls_back_to_default_clip() {
    init_logging();
    let state = polling_job("42");
    let (state, _) = update(state, status("42", "indexing", Some(40)));
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            process_id: ProcessId::new("42"),
            snapshot: StatusSnapshot {
                progress: Some(100),
                found_scene: Some(false),
                ..StatusSnapshot::new(JobStatus::Completed)
            },
        },
    );
    assert_eq!(effects, vec![Effect::StopPolling]);

    let view = state.view();
    let result = view.result.expect("result panel");
    assert!(result.scene_text().contains("default first 30 seconds"));
    assert_eq!(view.process_id, Some(ProcessId::new("42")));
    assert!(view.download.enabled);

    let (_state, effects) = update(state, Msg::DownloadClicked);
    assert_eq!(
        effects[0],
        Effect::DownloadClip {
            process_id: ProcessId::new("42"),
            filename: "vertical_clip_42.mp4".to_string(),
        }
    );
}

#[test]
fn unknown_found_scene_uses_fallback() {
    init_logging();
    let (state, _) = update(polling_job("1"), status("1", "completed", Some(100)));
    let result = state.view().result.expect("result panel");
    assert_eq!(result.found_scene, None);
    assert_eq!(result.scene_text(), "⚠️ No - Using default first 30 seconds");
    assert_eq!(result.facts.len(), 4);
}
