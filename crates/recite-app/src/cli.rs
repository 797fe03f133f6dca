use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "recite", about = "Vocabulary units, word lookup and interval review", version)]
pub struct Cli {
    /// JSON config file (defaults plus RECITE_* environment variables otherwise)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print the response envelope
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a word, fetching it on first use
    Query { word: String },

    /// Manage units
    #[command(subcommand)]
    Units(UnitsCommand),

    /// Words inside a unit
    #[command(subcommand)]
    UnitWords(UnitWordsCommand),

    /// Units and words due for review
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Words marked as forgotten
    #[command(subcommand)]
    Forgotten(ForgottenCommand),

    /// Pronunciation audio files
    #[command(subcommand)]
    Audio(AudioCommand),

    /// Show the settings clients need
    Config,
}

#[derive(Debug, Subcommand)]
pub enum UnitsCommand {
    List,
    Create {
        name: String,
        /// Recite date, YYYY-MM-DD
        #[arg(long, default_value = "")]
        date: String,
    },
    Rename {
        unit_id: i64,
        name: String,
        /// Recite date, YYYY-MM-DD; omitted clears it
        #[arg(long, default_value = "")]
        date: String,
    },
    /// Put units in the given order, first id in front
    Reorder {
        #[arg(required = true, num_args = 1..)]
        unit_ids: Vec<i64>,
    },
    Delete { unit_id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum UnitWordsCommand {
    Add { unit_id: i64, word: String },
    List { unit_id: i64 },
    /// Unit words in random order
    Dictation { unit_id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum ReviewCommand {
    /// Recent dates to browse
    Dates {
        #[arg(long, allow_negative_numbers = true)]
        recent_days: Option<i64>,
    },
    Words {
        /// YYYY-MM-DD, today when omitted
        #[arg(long, default_value = "")]
        date: String,
    },
    Dictation {
        #[arg(long, default_value = "")]
        date: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ForgottenCommand {
    Add { word: String },
    List,
    Remember { word: String },
    Dictation,
}

#[derive(Debug, Subcommand)]
pub enum AudioCommand {
    /// Download whichever accent files are missing
    Ensure { word: String },
}
