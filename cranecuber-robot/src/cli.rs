//! Command line

use std::path::PathBuf;

use clap::Parser;

use cranecuber_core::config::{MAX_CUBE_SIZE, MIN_CUBE_SIZE};

use crate::controller::SessionOptions;

#[derive(Parser, Debug)]
#[command(author, version, about = "Solve NxNxN cubes on a CraneCuber robot", long_about = None)]
pub struct Cli {
    /// Run with emulated motors and camera and a canned solution
    #[arg(long)]
    pub emulate: bool,

    /// Configuration file (defaults to the built-in robot.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run this move list instead of scanning, e.g. "Rw2 3Uw' F"
    #[arg(long, value_name = "MOVES")]
    pub moves: Option<String>,

    /// Cube size for --moves
    #[arg(
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u8).range(MIN_CUBE_SIZE as i64..=MAX_CUBE_SIZE as i64)
    )]
    pub size: u8,

    /// Exit after one cube
    #[arg(long)]
    pub once: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Session behaviour implied by the flags
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            moves: self.moves.clone(),
            size: self.size,
            auto_start: self.emulate,
            once: self.once || self.emulate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cranecuber"]).unwrap();
        assert!(!cli.emulate);
        assert_eq!(cli.size, 3);
        let options = cli.session_options();
        assert!(!options.auto_start);
        assert!(!options.once);
        assert!(options.moves.is_none());
    }

    #[test]
    fn test_emulate_runs_once_without_waiting() {
        let cli = Cli::try_parse_from(["cranecuber", "--emulate", "-v"]).unwrap();
        assert!(cli.verbose);
        let options = cli.session_options();
        assert!(options.auto_start);
        assert!(options.once);
    }

    #[test]
    fn test_moves_and_size() {
        let cli =
            Cli::try_parse_from(["cranecuber", "--moves", "Rw2 3Uw'", "--size", "5", "--once"])
                .unwrap();
        let options = cli.session_options();
        assert_eq!(options.moves.as_deref(), Some("Rw2 3Uw'"));
        assert_eq!(options.size, 5);
        assert!(options.once);
    }

    #[test]
    fn test_size_out_of_range() {
        assert!(Cli::try_parse_from(["cranecuber", "--size", "8"]).is_err());
        assert!(Cli::try_parse_from(["cranecuber", "--size", "1"]).is_err());
    }
}
