use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// QR part label scanner and part lookup service
#[derive(Parser)]
#[command(name = "partscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the part token extracted from a decoded text
    Extract {
        /// Decoded QR text
        text: String,
    },

    /// Resolve a part token and print the record as JSON
    Lookup {
        /// Part token
        token: String,

        /// Read the spreadsheet directly instead of the lookup route
        #[arg(long)]
        direct: bool,
    },

    /// Serve the `GET /parts/:token` lookup route
    Serve {
        /// Listen address (overrides server.bind_addr)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Interactive scan session fed from stdin
    ///
    /// Plain lines are decoded QR texts. `:start`, `:stop`, `:switch`,
    /// `:retry [TOKEN]`, `:copy [N]`, `:open [N]` and `:quit` are actions;
    /// `!denied`, `!nodevice`, `!overconstrained` and `!other` simulate
    /// camera failures.
    Scan {
        /// Read the spreadsheet directly instead of the lookup route
        #[arg(long)]
        direct: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup() {
        let cli = Cli::try_parse_from(["partscan", "lookup", "HL-012A", "--direct"])
            .expect("parse args");
        assert!(matches!(
            cli.command,
            Commands::Lookup { ref token, direct: true } if token == "HL-012A"
        ));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["partscan", "serve", "--config", "/tmp/p.toml", "-b", "0.0.0.0:9000"])
            .expect("parse args");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.toml")));
        assert!(matches!(cli.command, Commands::Serve { bind: Some(ref b) } if b == "0.0.0.0:9000"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
