use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// A cancellable repeating task.
///
/// The first tick fires one `period` after start. Ticks never overlap: a slow
/// tick delays the next one instead of piling up. The task ends when a tick
/// returns [`ControlFlow::Break`] or when [`PollTimer::stop`] is called; a tick
/// that is in flight at `stop` is abandoned.
#[derive(Debug)]
pub struct PollTimer {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollTimer {
    pub fn start<F, Fut>(runtime: &Handle, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let flow = tokio::select! {
                    _ = token.cancelled() => break,
                    flow = on_tick() => flow,
                };
                if flow.is_break() {
                    break;
                }
            }
        });
        Self { cancel, task }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.task.is_finished()
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Holds at most one live [`PollTimer`].
#[derive(Debug, Default)]
pub struct PollSlot {
    current: Option<PollTimer>,
}

impl PollSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the current timer, if any, before installing `timer`.
    pub fn replace(&mut self, timer: PollTimer) {
        self.stop();
        self.current = Some(timer);
    }

    pub fn stop(&mut self) {
        if let Some(timer) = self.current.take() {
            timer.stop();
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(PollTimer::is_running)
    }
}
