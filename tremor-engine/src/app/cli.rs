//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tremor Engine - Capture and score hand tremor from VR session logs
#[derive(Parser, Debug)]
#[command(name = "tremor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode session logs and score their tremor severity
    Analyze {
        /// Session log files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the power sweep spectrum of a log's velocity series as CSV
    Spectrum {
        /// Session log file
        file: PathBuf,

        /// Frequency resolution (Hz, defaults to the configured display step)
        #[arg(short, long)]
        step: Option<f64>,
    },

    /// Run a synthetic session and store its logs
    Simulate {
        /// Session duration in seconds (defaults to the configured duration)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Tremor frequency of the synthetic hands (Hz)
        #[arg(long, default_value = "5.0")]
        tremor_hz: f64,

        /// Peak pitch excursion of the tremor (degrees)
        #[arg(long, default_value = "2.0")]
        amplitude: f64,

        /// Patient ID
        #[arg(short, long, default_value = "demo-patient")]
        patient: String,

        /// Game name
        #[arg(short, long, default_value = "AppleGame")]
        game: String,

        /// Store root (defaults to the configured storage root)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List stored sessions
    List {
        /// Store root (defaults to the configured storage root)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "session.duration_secs", "frequency.axis")
        key: String,
    },

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_analyze_multiple_files() {
        let args = vec!["tremor", "analyze", "left.txt", "right.txt", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Analyze { files, json } => {
                assert_eq!(files, vec![PathBuf::from("left.txt"), PathBuf::from("right.txt")]);
                assert!(json);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_analyze_requires_files() {
        let result = Cli::try_parse_from(vec!["tremor", "analyze"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_spectrum() {
        let cli = Cli::try_parse_from(vec!["tremor", "spectrum", "right.txt", "--step", "0.1"]).unwrap();
        match cli.command {
            Commands::Spectrum { file, step } => {
                assert_eq!(file, PathBuf::from("right.txt"));
                assert_eq!(step, Some(0.1));
            }
            _ => panic!("Expected Spectrum command"),
        }
    }

    #[test]
    fn test_cli_parse_simulate_with_defaults() {
        let cli = Cli::try_parse_from(vec!["tremor", "simulate"]).unwrap();
        match cli.command {
            Commands::Simulate {
                duration,
                tremor_hz,
                amplitude,
                patient,
                game,
                output,
            } => {
                assert!(duration.is_none());
                assert_eq!(tremor_hz, 5.0);
                assert_eq!(amplitude, 2.0);
                assert_eq!(patient, "demo-patient");
                assert_eq!(game, "AppleGame");
                assert!(output.is_none());
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_parse_simulate_with_all_options() {
        let args = vec![
            "tremor",
            "simulate",
            "--duration", "10",
            "--tremor-hz", "6.5",
            "--amplitude", "4",
            "--patient", "p-42",
            "--game", "Orchard",
            "--output", "/tmp/sessions",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Simulate { duration, tremor_hz, patient, output, .. } => {
                assert_eq!(duration, Some(10.0));
                assert_eq!(tremor_hz, 6.5);
                assert_eq!(patient, "p-42");
                assert_eq!(output, Some(PathBuf::from("/tmp/sessions")));
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_parse_config_actions() {
        let cli = Cli::try_parse_from(vec!["tremor", "config", "get", "session.duration_secs"]).unwrap();
        match cli.command {
            Commands::Config { action: ConfigAction::Get { key } } => {
                assert_eq!(key, "session.duration_secs");
            }
            _ => panic!("Expected Config Get command"),
        }

        let cli = Cli::try_parse_from(vec!["tremor", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { action: ConfigAction::Path }));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(vec!["tremor", "list", "--verbose", "--config", "custom.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
