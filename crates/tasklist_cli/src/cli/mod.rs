use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the store file
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// On-disk encoding of the store
    #[arg(long, global = true, value_enum, default_value = "json")]
    pub format: Format,

    /// Field delimiter for the records format (comma or semicolon)
    #[arg(long, global = true, value_name = "CHAR", default_value = ",")]
    pub delimiter: String,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Whole-document JSON array
    Json,
    /// One delimited record per line
    Records,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasklist add "Buy milk"
    Add {
        message: Option<String>,
    },
    /// Toggle a task between done and not done
    ///
    /// Example: tasklist toggle 1
    Toggle {
        id: u64,
    },
    /// Delete a task
    ///
    /// Example: tasklist delete 1
    Delete {
        id: u64,
    },
    /// List all tasks
    ///
    /// Example: tasklist list
    List,
}
