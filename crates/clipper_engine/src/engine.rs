use std::io;
use std::ops::ControlFlow;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use clipper_logging::{clipper_debug, clipper_info, clipper_warn};
use tokio::runtime::{Handle, Runtime};

use crate::persist::AtomicFileWriter;
use crate::poll::{PollSlot, PollTimer};
use crate::{EngineEvent, JobApi, JobRequest, RequestId, TimerKey};

/// Receives engine events on the engine's runtime threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Submit {
        request: RequestId,
        job: JobRequest,
    },
    StartPolling {
        process_id: String,
        interval: Duration,
    },
    StopPolling,
    Download {
        process_id: String,
        filename: String,
    },
    Schedule {
        key: TimerKey,
        after: Duration,
    },
}

/// Runs all job IO on a dedicated thread that owns a tokio runtime.
///
/// Commands are handled in order on that thread, which is also the only owner
/// of the poll slot, so two poll timers can never be live at once.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        api: Arc<dyn JobApi>,
        writer: AtomicFileWriter,
        sink: Arc<dyn EventSink>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::Builder::new()
            .name("clipper-engine".to_string())
            .spawn(move || {
                let mut worker = Worker {
                    runtime,
                    api,
                    writer,
                    sink,
                    polls: PollSlot::new(),
                };
                while let Ok(command) = cmd_rx.recv() {
                    worker.handle(command);
                }
                worker.polls.stop();
                clipper_debug!("Engine command loop finished");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn submit(&self, request: RequestId, job: JobRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { request, job });
    }

    pub fn start_polling(&self, process_id: impl Into<String>, interval: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            process_id: process_id.into(),
            interval,
        });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn download(&self, process_id: impl Into<String>, filename: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Download {
            process_id: process_id.into(),
            filename: filename.into(),
        });
    }

    pub fn schedule(&self, key: TimerKey, after: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::Schedule { key, after });
    }
}

struct Worker {
    runtime: Runtime,
    api: Arc<dyn JobApi>,
    writer: AtomicFileWriter,
    sink: Arc<dyn EventSink>,
    polls: PollSlot,
}

impl Worker {
    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Submit { request, job } => {
                let api = self.api.clone();
                let sink = self.sink.clone();
                self.runtime.spawn(async move {
                    let result = api.submit(&job).await;
                    if let Err(err) = &result {
                        clipper_warn!("Submit #{} failed: {}", request, err);
                    }
                    sink.emit(EngineEvent::Submitted { request, result });
                });
            }
            EngineCommand::StartPolling {
                process_id,
                interval,
            } => {
                clipper_info!("Polling process_id={} every {:?}", process_id, interval);
                let timer = spawn_status_poll(
                    self.runtime.handle(),
                    self.api.clone(),
                    self.sink.clone(),
                    process_id,
                    interval,
                );
                self.polls.replace(timer);
            }
            EngineCommand::StopPolling => {
                self.polls.stop();
            }
            EngineCommand::Download {
                process_id,
                filename,
            } => {
                let api = self.api.clone();
                let sink = self.sink.clone();
                let writer = self.writer.clone();
                self.runtime.spawn(async move {
                    let result = api.download(&process_id, &filename, &writer).await;
                    if let Err(err) = &result {
                        clipper_warn!("Download of {} failed: {}", process_id, err);
                    }
                    sink.emit(EngineEvent::Downloaded { process_id, result });
                });
            }
            EngineCommand::Schedule { key, after } => {
                let sink = self.sink.clone();
                self.runtime.spawn(async move {
                    tokio::time::sleep(after).await;
                    sink.emit(EngineEvent::TimerFired(key));
                });
            }
        }
    }
}

/// Polls `GET /status/{id}` until the job reaches a terminal status or a request fails.
pub fn spawn_status_poll(
    runtime: &Handle,
    api: Arc<dyn JobApi>,
    sink: Arc<dyn EventSink>,
    process_id: String,
    interval: Duration,
) -> PollTimer {
    PollTimer::start(runtime, interval, move || {
        let api = api.clone();
        let sink = sink.clone();
        let process_id = process_id.clone();
        async move {
            let result = api.status(&process_id).await;
            let flow = match &result {
                Ok(report) if report.is_terminal() => ControlFlow::Break(()),
                Ok(_) => ControlFlow::Continue(()),
                Err(err) => {
                    clipper_warn!("Status check for {} failed: {}", process_id, err);
                    ControlFlow::Break(())
                }
            };
            sink.emit(EngineEvent::Status { process_id, result });
            flow
        }
    })
}
