//! Top-level subcommands.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config_commands::ConfigCommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with Mr. White interactively
    Chat {
        /// Narrate replies aloud
        #[arg(long)]
        voice: bool,
        /// Assistant mode for this session (e.g. "health")
        #[arg(long)]
        mode: Option<String>,
        /// Dog profile ID to talk about
        #[arg(long = "dog")]
        dog: Option<i64>,
        /// Document ID to attach to the first message (repeatable)
        #[arg(long = "doc")]
        docs: Vec<i64>,
    },
    /// Print the current conversation
    History {
        /// Number of messages to fetch (defaults to the history_page_size setting)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Clear the current conversation
    Clear {
        /// Also wipe what Mr. White remembers about you
        #[arg(long)]
        memory: bool,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show the remaining chat credits
    Credits,
    /// List your dog profiles
    Dogs,
    /// List uploaded documents
    Documents,
    /// Upload a document (vet record, lab result, ...)
    Upload {
        /// File to upload
        path: PathBuf,
    },
    /// Narrate a piece of text aloud
    Say {
        /// Text to speak
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// View or change client settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::parser::Cli;

    #[test]
    fn chat_collects_repeated_docs() {
        let cli = Cli::parse_from([
            "mrwhite", "chat", "--voice", "--dog", "3", "--doc", "10", "--doc", "11",
        ]);
        let Some(Commands::Chat {
            voice, dog, docs, ..
        }) = cli.command
        else {
            panic!("expected chat command");
        };
        assert!(voice);
        assert_eq!(dog, Some(3));
        assert_eq!(docs, vec![10, 11]);
    }

    #[test]
    fn say_joins_words() {
        let cli = Cli::parse_from(["mrwhite", "say", "Good", "dog."]);
        let Some(Commands::Say { text }) = cli.command else {
            panic!("expected say command");
        };
        assert_eq!(text.join(" "), "Good dog.");
    }
}
