use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tuidict_core::types::Language;

#[derive(Debug, Parser)]
#[command(name = "tuidict", version, about = "Look up words across several dictionaries and save the ones you pick")]
pub struct Cli {
    /// Config file; defaults to <data dir>/config.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Namespace for the cache and output file
    #[arg(long, global = true)]
    pub target: Option<String>,

    #[arg(long, global = true, value_parser = parse_language)]
    pub language: Option<Language>,

    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Keep results in memory only
    #[arg(long, global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive session (default)
    Run,
    /// Search once and print the definitions
    Lookup { word: String },
    /// Write every cached word of the target, one per line
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_language(value: &str) -> Result<Language, String> {
    value
        .parse()
        .map_err(|_| format!("unsupported language '{value}', expected en or ru"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive_run() {
        let cli = Cli::try_parse_from(["tuidict"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.no_cache);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["tuidict", "lookup", "cats", "--language", "en", "--no-cache"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Lookup { ref word }) if word == "cats"));
        assert_eq!(cli.language, Some(Language::English));
        assert!(cli.no_cache);
    }

    #[test]
    fn rejects_unknown_language() {
        assert!(Cli::try_parse_from(["tuidict", "--language", "de"]).is_err());
    }
}
