//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use entities::{
    schedule::{parse_date, NaiveDate},
    TaskStatus,
};
use task_store::BackendKind;

/// Tracker - inspect and edit a day-by-day learning plan.
#[derive(Parser, Debug)]
#[command(name = "tracker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend, overriding configuration (file, sqlite, mongodb)
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every task with its index
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replace all tasks with the plan in a JSON file
    Init(PlanArgs),

    /// Store the plan only if no tasks are stored yet
    Seed(PlanArgs),

    /// Set the status of one task
    Status {
        /// Zero-based task index
        index: usize,
        /// New status (NotStarted, InProgress, Completed)
        #[arg(value_parser = parse_status)]
        status: TaskStatus,
    },

    /// Update some fields of one task from a JSON object
    Update {
        /// Zero-based task index
        index: usize,
        /// Fields to set, e.g. '{"remarks": "done early"}'
        fields: String,
    },
}

/// Arguments for commands that load a plan file.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// JSON array of tasks
    pub file: PathBuf,

    /// Assign consecutive dates starting from this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_start_date)]
    pub start_date: Option<NaiveDate>,
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(s).ok_or_else(|| format!("unknown status: {s}"))
}

fn parse_start_date(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("expected YYYY-MM-DD, got {s}"))
}
