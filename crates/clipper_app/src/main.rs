mod cli;
mod config;
mod effects;
mod input;
mod render;
mod session;

use std::io::{self, BufRead};
use std::path::Path;
use std::process::ExitCode;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use clap::Parser;
use clipper_engine::{AtomicFileWriter, EngineHandle, ReqwestJobApi};
use clipper_logging::{clipper_error, clipper_info, DEFAULT_LOG_FILE};
use log::LevelFilter;

use crate::cli::{Args, Command};
use crate::config::ClientConfig;
use crate::effects::{EffectRunner, MsgSink};
use crate::input::{parse_line, HELP};
use crate::render::TerminalRenderer;
use crate::session::{Input, Mode, Session, SessionExit};

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    clipper_logging::initialize(args.log, level, Path::new(DEFAULT_LOG_FILE));

    match run(args) {
        Ok(exit) => exit.into(),
        Err(err) => {
            clipper_error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<SessionExit> {
    let command = args.command.unwrap_or(Command::Interactive);
    if let Command::InitConfig { path } = &command {
        ClientConfig::default().save(path)?;
        println!("Wrote {}", path.display());
        return Ok(SessionExit::Success);
    }

    let config =
        ClientConfig::load(args.config.as_deref())?.with_overrides(args.server, args.output_dir);
    let poll_interval = config.poll_interval()?;
    let api = ReqwestJobApi::new(config.api_settings()?)
        .context("could not set up the HTTP client")?;
    clipper_info!(
        "Using server {} and output directory {:?}",
        config.server_url,
        config.output_dir
    );

    let (tx, inbox) = mpsc::channel::<Input>();
    let engine = EngineHandle::new(
        Arc::new(api),
        AtomicFileWriter::new(config.output_dir.clone()),
        Arc::new(MsgSink::new(tx.clone())),
    )
    .context("could not start the engine")?;
    let runner = EffectRunner::new(engine, poll_interval);
    let renderer = TerminalRenderer::new(io::stdout());

    let exit = match command {
        Command::Run {
            source,
            query,
            no_download,
        } => {
            let mut session = Session::new(
                runner,
                renderer,
                Mode::Run {
                    auto_download: !no_download,
                },
            );
            session.start_run(&source, &query)?;
            session.run(inbox)?
        }
        Command::Interactive | Command::InitConfig { .. } => {
            spawn_stdin_reader(tx).context("could not read from stdin")?;
            let mut session = Session::new(runner, renderer, Mode::Interactive);
            session.say(HELP)?;
            session.run(inbox)?
        }
    };
    Ok(exit)
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) -> io::Result<()> {
    thread::Builder::new()
        .name("clipper-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let inputs = match parse_line(&line) {
                    None => continue,
                    Some(input::Command::Msgs(msgs)) => msgs.into_iter().map(Input::Msg).collect(),
                    Some(input::Command::Help) => vec![Input::Say(HELP.to_string())],
                    Some(input::Command::Quit) => vec![Input::Quit],
                    Some(input::Command::Unknown(word)) => vec![Input::Say(format!(
                        "Unknown command '{}'. Type 'help' for the list.",
                        word
                    ))],
                };
                for input in inputs {
                    if tx.send(input).is_err() {
                        return;
                    }
                }
            }
            let _ = tx.send(Input::Quit);
        })?;
    Ok(())
}
