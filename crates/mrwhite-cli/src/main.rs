//! CLI entry point.
//!
//! Parses arguments, sets up logging and hands the composed context to the
//! command handlers. `config` commands run without bootstrapping so a broken
//! settings file can always be repaired.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use mrwhite_cli::error::exit_code_for;
use mrwhite_cli::handlers::chat::ChatArgs;
use mrwhite_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise only warnings, or debug output
/// from our own crates with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,mrwhite_cli=debug,mrwhite_chat=debug,mrwhite_client=debug,mrwhite_voice=debug,mrwhite_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Config { command } = command {
        return handlers::config::execute(command);
    }

    let ctx = bootstrap(CliConfig {
        api_url: cli.api_url,
        token: cli.token,
    })?;

    match command {
        Commands::Chat {
            voice,
            mode,
            dog,
            docs,
        } => {
            let args = ChatArgs {
                voice,
                mode,
                dog,
                docs,
            };
            handlers::chat::execute(&ctx, args).await
        }
        Commands::History { limit } => handlers::history::execute(&ctx, limit).await,
        Commands::Clear { memory, force } => handlers::clear::execute(&ctx, memory, force).await,
        Commands::Credits => handlers::account::credits(&ctx).await,
        Commands::Dogs => handlers::account::dogs(&ctx).await,
        Commands::Documents => handlers::account::documents(&ctx).await,
        Commands::Upload { path } => handlers::account::upload(&ctx, &path).await,
        Commands::Say { text } => handlers::say::execute(&ctx, &text).await,
        // Handled before bootstrap
        Commands::Config { .. } => Ok(()),
    }
}
