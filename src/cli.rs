//! CLI definitions for Orchestra.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use orchestra_config::DEFAULT_CONFIG_PATH;

/// Orchestra CLI.
#[derive(Parser)]
#[command(name = "orchestra")]
#[command(about = "Multi-agent workflow orchestration service")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the HTTP server in foreground (default)
    Run {
        /// Server host, overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run one workflow definition (JSON) to completion and print the record
    Execute {
        /// Path to the workflow definition
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::try_parse_from(["orchestra"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from(["orchestra", "run", "--port", "9000"]).unwrap();
        match cli.command {
            Some(Commands::Run { host, port }) => {
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_execute_with_config() {
        let cli =
            Cli::try_parse_from(["orchestra", "execute", "wf.json", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert!(matches!(cli.command, Some(Commands::Execute { file }) if file == PathBuf::from("wf.json")));
    }
}
