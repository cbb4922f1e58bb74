//! Command-line argument parsing for supportdesk
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::Topic;

/// supportdesk - Classify support tickets and answer them from documentation
#[derive(Parser, Debug)]
#[command(name = "supportdesk")]
#[command(version)]
#[command(about = "Classify support tickets and answer documentation questions", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Rule-based models only; no downloads, chat calls or scraping
    #[arg(long, global = true)]
    pub offline: bool,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a single ticket
    Classify {
        #[arg(short, long)]
        subject: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Classify every ticket in a JSON array file and print JSON
    Batch {
        /// Path to the tickets file
        #[arg(value_name = "TICKETS")]
        path: PathBuf,
    },

    /// Answer a question, or route it when its topic is not documentation-backed
    Ask {
        #[arg(value_name = "QUERY")]
        query: String,

        /// Topic tags to use instead of classifying the query
        #[arg(short, long = "topic", value_parser = parse_topic)]
        topics: Vec<Topic>,
    },

    /// Classify a ticket, then answer or route it
    Triage {
        #[arg(short, long)]
        subject: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Display the effective configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

fn parse_topic(value: &str) -> Result<Topic, String> {
    value.parse()
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Default `tracing` filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "supportdesk=info",
            Verbosity::Verbose => "supportdesk=debug",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if should show progress bars
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify() {
        let args = Args::try_parse_from([
            "supportdesk",
            "classify",
            "--subject",
            "Snowflake",
            "--description",
            "connection fails",
        ])
        .unwrap();
        assert!(matches!(args.command, Commands::Classify { .. }));
        assert_eq!(args.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_parse_ask_with_topics() {
        let args = Args::try_parse_from([
            "supportdesk",
            "--offline",
            "ask",
            "How do I set up SSO?",
            "--topic",
            "SSO",
            "--topic",
            "how-to",
        ])
        .unwrap();
        assert!(args.offline);
        match args.command {
            Commands::Ask { topics, .. } => assert_eq!(topics, vec![Topic::Sso, Topic::HowTo]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_topic_rejected() {
        let result = Args::try_parse_from(["supportdesk", "ask", "q", "--topic", "Billing"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        let args = Args::try_parse_from(["supportdesk", "-vv", "config"]).unwrap();
        assert_eq!(args.verbosity(), Verbosity::VeryVerbose);
        assert_eq!(args.verbosity().filter_directive(), "debug");

        let args = Args::try_parse_from(["supportdesk", "config", "-q"]).unwrap();
        assert_eq!(args.verbosity(), Verbosity::Quiet);
        assert!(!args.verbosity().show_progress());
    }
}
