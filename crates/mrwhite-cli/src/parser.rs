//! Main CLI parser and global options.

use clap::Parser;

use crate::commands::Commands;

/// Terminal client for the Mr. White pet-care assistant.
#[derive(Parser)]
#[command(name = "mrwhite")]
#[command(about = "Chat with Mr. White, your pet-care assistant")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// API base URL (overrides the api_base_url setting)
    #[arg(long = "api-url", env = "MRWHITE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// API bearer token
    #[arg(long, env = "MRWHITE_API_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_args_after_subcommand() {
        let cli = Cli::parse_from([
            "mrwhite",
            "credits",
            "--verbose",
            "--api-url",
            "http://localhost:8000",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8000"));
        assert!(matches!(cli.command, Some(Commands::Credits)));
    }
}
