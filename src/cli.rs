use crate::prefs::SortOrder;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Clone)]
#[command(name = "todo-engine")]
#[command(about = "Personal task list - searchable, sortable, undo-friendly")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output (-q)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output logs in JSON format
    #[arg(long)]
    pub json: bool,

    /// Database file (default: platform data dir, or TODO_ENGINE_DATA_DIR)
    #[arg(long)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Add a new task
    ///
    /// Examples:
    ///   td add "Buy milk"
    ///   td add "Pay rent" --important
    Add {
        /// Task name (must not be blank)
        name: String,

        /// Sort the task ahead of ordinary ones
        #[arg(long)]
        important: bool,
    },

    /// List tasks using the persisted sort order and visibility
    List {
        /// Only show tasks whose name contains this text (case-sensitive)
        #[arg(long, default_value = "")]
        search: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Mark a task completed
    Done {
        /// Task id, as shown by `td list`
        id: i64,
    },

    /// Mark a completed task open again
    Undone {
        /// Task id, as shown by `td list`
        id: i64,
    },

    /// Delete a task
    Rm {
        /// Task id, as shown by `td list`
        id: i64,
    },

    /// Delete every completed task
    ClearCompleted,

    /// Persist the list sort order
    Sort {
        #[arg(value_enum)]
        order: SortOrderArg,
    },

    /// Persist whether completed tasks are hidden from the list
    HideCompleted {
        /// true to hide completed tasks, false to show them
        #[arg(action = clap::ArgAction::Set)]
        hidden: bool,
    },

    /// Insert the starter task set (first run only)
    Seed,

    /// Follow the live list, reprinting it on every change (Ctrl-C to stop)
    Watch {
        /// Initial search text
        #[arg(long, default_value = "")]
        search: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SortOrderArg {
    /// Important first, then alphabetical
    Name,
    /// Important first, then oldest first
    Date,
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Name => SortOrder::ByName,
            SortOrderArg::Date => SortOrder::ByDate,
        }
    }
}
