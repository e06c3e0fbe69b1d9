use std::sync::mpsc;
use std::time::Duration;

use clipper_core::{Effect, JobStatus, Msg, ProcessId, StatusSnapshot};
use clipper_engine::{EngineEvent, EngineHandle, EventSink, JobRequest, StatusReport, TimerKey};
use clipper_logging::{clipper_debug, clipper_info};

use crate::session::Input;

/// Executes effects produced by `clipper_core::update`.
pub trait EffectSink {
    fn run(&mut self, effects: Vec<Effect>);
}

pub struct EffectRunner {
    engine: EngineHandle,
    poll_interval: Duration,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, poll_interval: Duration) -> Self {
        Self {
            engine,
            poll_interval,
        }
    }
}

impl EffectSink for EffectRunner {
    fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob {
                    request,
                    video_source,
                    query,
                } => {
                    clipper_info!(
                        "SubmitJob request={} source_len={} query_len={}",
                        request,
                        video_source.len(),
                        query.len()
                    );
                    self.engine.submit(
                        request,
                        JobRequest {
                            video_source,
                            query,
                        },
                    );
                }
                Effect::StartPolling { process_id } => {
                    self.engine
                        .start_polling(process_id.as_str(), self.poll_interval);
                }
                Effect::StopPolling => self.engine.stop_polling(),
                Effect::DownloadClip {
                    process_id,
                    filename,
                } => {
                    clipper_info!("DownloadClip process_id={} filename={}", process_id, filename);
                    self.engine.download(process_id.as_str(), filename);
                }
                Effect::ScheduleDownloadCooldown { after } => {
                    self.engine.schedule(TimerKey::DownloadCooldown, after);
                }
                Effect::ScheduleNoticeDismiss { notice_id, after } => {
                    self.engine.schedule(TimerKey::NoticeDismiss(notice_id), after);
                }
                Effect::ScrollToTop => {
                    // The renderer owns the terminal; the session handles this one.
                    clipper_debug!("ScrollToTop reached the effect runner");
                }
            }
        }
    }
}

/// Feeds engine events back into the session inbox as messages.
pub struct MsgSink {
    tx: mpsc::Sender<Input>,
}

impl MsgSink {
    pub fn new(tx: mpsc::Sender<Input>) -> Self {
        Self { tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Input::Msg(map_event(event)));
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { request, result } => match result {
            Ok(process_id) => Msg::SubmitSucceeded {
                request,
                process_id: ProcessId::new(process_id),
            },
            Err(err) => Msg::SubmitFailed {
                request,
                message: err.user_message(),
            },
        },
        EngineEvent::Status { process_id, result } => {
            let process_id = ProcessId::new(process_id);
            match result {
                Ok(report) => Msg::StatusReceived {
                    process_id,
                    snapshot: map_report(report),
                },
                Err(err) => Msg::StatusFailed {
                    process_id,
                    message: err.user_message(),
                },
            }
        }
        EngineEvent::Downloaded { process_id, result } => Msg::DownloadFinished {
            process_id: ProcessId::new(process_id),
            result: result
                .map(|path| path.display().to_string())
                .map_err(|err| err.user_message()),
        },
        EngineEvent::TimerFired(TimerKey::DownloadCooldown) => Msg::DownloadCooldownElapsed,
        EngineEvent::TimerFired(TimerKey::NoticeDismiss(notice_id)) => {
            Msg::NoticeExpired { notice_id }
        }
    }
}

fn map_report(report: StatusReport) -> StatusSnapshot {
    StatusSnapshot {
        progress: report.progress_percent(),
        status: JobStatus::parse(&report.status),
        message: report.message,
        found_scene: report.found_scene,
    }
}
