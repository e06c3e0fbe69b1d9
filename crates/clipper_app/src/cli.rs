use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clipper_logging::LogDestination;

/// Turn a video into a vertical clip through a clip server.
#[derive(Parser, Debug)]
#[command(name = "clipper", author, version, about, long_about = None)]
pub struct Args {
    /// Clip server root URL (overrides the config file)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Directory downloaded clips are written to (overrides the config file)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file (RON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log lines go: file, terminal or both
    #[arg(long, global = true, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit one video, wait for the clip and download it
    Run {
        /// YouTube URL or local file path
        source: String,
        /// Scene to look for; the first 30 seconds are used when empty or not found
        #[arg(short, long, default_value = "")]
        query: String,
        /// Stop once the clip is ready instead of downloading it
        #[arg(long)]
        no_download: bool,
    },
    /// Line-based session (the default)
    Interactive,
    /// Write a configuration file with default values
    InitConfig {
        #[arg(default_value = crate::config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_subcommand_parses_query_and_globals() {
        let args = Args::try_parse_from([
            "clipper",
            "run",
            "https://youtu.be/abc",
            "--query",
            "dog",
            "--server",
            "http://10.0.0.2:5000",
            "--log",
            "both",
        ])
        .unwrap();
        assert_eq!(args.server.as_deref(), Some("http://10.0.0.2:5000"));
        assert_eq!(args.log, LogDestination::Both);
        assert_eq!(
            args.command,
            Some(Command::Run {
                source: "https://youtu.be/abc".into(),
                query: "dog".into(),
                no_download: false,
            })
        );
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let args = Args::try_parse_from(["clipper"]).unwrap();
        assert_eq!(args.command, None);
        assert_eq!(args.log, LogDestination::File);
    }

    #[test]
    fn unknown_log_destination_is_rejected() {
        assert!(Args::try_parse_from(["clipper", "--log", "syslog"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
