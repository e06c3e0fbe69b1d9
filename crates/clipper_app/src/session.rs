use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::mpsc;

use clipper_core::{update, AppState, Effect, Msg, Phase};
use clipper_logging::{clipper_debug, clipper_info};

use crate::effects::EffectSink;
use crate::render::TerminalRenderer;

/// Everything the session loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Msg(Msg),
    Say(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    /// One job from the command line; the session ends with it.
    Run { auto_download: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    Success,
    Failure,
}

impl From<SessionExit> for ExitCode {
    fn from(exit: SessionExit) -> Self {
        match exit {
            SessionExit::Success => ExitCode::SUCCESS,
            SessionExit::Failure => ExitCode::FAILURE,
        }
    }
}

pub struct Session<R: EffectSink, W: Write> {
    state: AppState,
    runner: R,
    renderer: TerminalRenderer<W>,
    mode: Mode,
    download_requested: bool,
    exit: Option<SessionExit>,
}

impl<R: EffectSink, W: Write> Session<R, W> {
    pub fn new(runner: R, renderer: TerminalRenderer<W>, mode: Mode) -> Self {
        Self {
            state: AppState::new(),
            runner,
            renderer,
            mode,
            download_requested: false,
            exit: None,
        }
    }

    /// Applies one message, redraws if anything visible changed and hands
    /// the remaining effects to the runner.
    pub fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let download_outcome = match &msg {
            Msg::DownloadFinished { result, .. } => Some(result.is_ok()),
            _ => None,
        };

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        let mut scrolled = false;
        let mut pending = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::ScrollToTop => {
                    self.renderer.scroll_to_top()?;
                    scrolled = true;
                }
                other => pending.push(other),
            }
        }
        if was_dirty || scrolled {
            self.renderer.render(&self.state.view())?;
        }
        if !pending.is_empty() {
            clipper_debug!("Running {} effect(s)", pending.len());
            self.runner.run(pending);
        }

        if let Mode::Run { auto_download } = self.mode {
            self.advance_run(auto_download, download_outcome)?;
        }
        Ok(())
    }

    fn advance_run(&mut self, auto_download: bool, download_outcome: Option<bool>) -> io::Result<()> {
        if self.exit.is_some() {
            return Ok(());
        }
        if let (true, Some(saved)) = (self.download_requested, download_outcome) {
            self.exit = Some(if saved {
                SessionExit::Success
            } else {
                SessionExit::Failure
            });
            return Ok(());
        }
        match self.state.phase() {
            Phase::Failed => self.exit = Some(SessionExit::Failure),
            Phase::Completed if !self.download_requested => {
                if auto_download {
                    self.download_requested = true;
                    self.dispatch(Msg::DownloadClicked)?;
                } else {
                    self.exit = Some(SessionExit::Success);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Fills the form and submits it. Validation failures end the session.
    pub fn start_run(&mut self, source: &str, query: &str) -> io::Result<()> {
        self.renderer.render(&self.state.view())?;
        self.dispatch(Msg::SourceEdited(source.to_string()))?;
        self.dispatch(Msg::QueryEdited(query.to_string()))?;
        self.dispatch(Msg::SubmitClicked)?;
        if self.state.phase() != Phase::Submitting {
            self.exit = Some(SessionExit::Failure);
        }
        Ok(())
    }

    pub fn say(&mut self, line: &str) -> io::Result<()> {
        self.renderer.say(line)
    }

    /// Processes inputs until the session is over.
    pub fn run(&mut self, inbox: mpsc::Receiver<Input>) -> io::Result<SessionExit> {
        if self.mode == Mode::Interactive {
            self.renderer.render(&self.state.view())?;
        }
        loop {
            if let Some(exit) = self.exit {
                clipper_info!("Session finished: {:?}", exit);
                return Ok(exit);
            }
            match inbox.recv() {
                Ok(Input::Msg(msg)) => self.dispatch(msg)?,
                Ok(Input::Say(line)) => self.renderer.say(&line)?,
                Ok(Input::Quit) | Err(_) => {
                    self.exit = Some(match self.mode {
                        Mode::Interactive => SessionExit::Success,
                        Mode::Run { .. } => SessionExit::Failure,
                    });
                }
            }
        }
    }
}
