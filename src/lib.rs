//! Story playback and overlay composition core.
//!
//! The viewer side turns an author's story catalog into a timed, auto-advancing
//! slideshow driven by taps, swipes and long-presses. The composition side keeps
//! the draggable text and sticker overlays placed on a captured photo or video until
//! it is shared. Rendering, capture and upload stay with the embedding shell and
//! are reached through [`events::ViewerEventSink`] and
//! [`compose::UploadCollaborator`].

pub mod compose;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod playback;
pub mod replay;
pub mod settings;
pub mod timeline;
pub mod viewer;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use settings::SettingsStore;

#[derive(Parser, Debug)]
#[command(name = "vibes")]
#[command(about = "Story playback and overlay composition core")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive a viewer or composition session from a timestamped script
    Replay {
        /// Script file (JSON)
        script: PathBuf,

        /// Settings file used when the script carries none
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("vibes starting up...");

    match cli.command {
        Commands::Replay {
            script,
            settings: settings_path,
        } => {
            let fallback = match settings_path {
                Some(path) => SettingsStore::new(path)?.settings(),
                None => settings::ViewerSettings::default(),
            };
            let script = replay::load_script(&script)?;

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(replay::run_script(script, fallback))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay_args(args: &[&str]) -> (PathBuf, Option<PathBuf>) {
        let cli = Cli::try_parse_from(std::iter::once("vibes").chain(args.iter().copied())).unwrap();
        match cli.command {
            Commands::Replay { script, settings } => (script, settings),
        }
    }

    #[test]
    fn replay_accepts_settings_in_any_position() {
        let expected = (PathBuf::from("x.json"), Some(PathBuf::from("s.json")));
        assert_eq!(replay_args(&["replay", "x.json", "--settings", "s.json"]), expected);
        assert_eq!(replay_args(&["replay", "--settings", "s.json", "x.json"]), expected);
        assert_eq!(replay_args(&["replay", "x.json", "--settings=s.json"]), expected);
        assert_eq!(replay_args(&["replay", "x.json"]), (PathBuf::from("x.json"), None));
    }

    #[test]
    fn missing_script_is_rejected() {
        assert!(Cli::try_parse_from(["vibes", "replay"]).is_err());
        assert!(Cli::try_parse_from(["vibes"]).is_err());
    }
}
