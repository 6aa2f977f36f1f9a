//! Command implementations.

use std::{io::Write, path::Path};

use anyhow::{bail, Context, Result};
use entities::{schedule::assign_dates, TaskPatch, TaskRecord};
use task_store::{TaskStore, TaskTracker};

use crate::cli::{Command, PlanArgs};

/// Runs one command against the opened store, writing results to `out`.
pub async fn run(tracker: &TaskTracker, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::List { json } => list(tracker, json, out).await,
        Command::Init(args) => {
            let tasks = read_plan(&args)?;
            tracker.replace(&tasks).await?;
            writeln!(out, "Initialized {} tasks", tasks.len())?;
            Ok(())
        }
        Command::Seed(args) => {
            let tasks = read_plan(&args)?;
            let stored = tracker.get_or_init(&tasks).await?;
            writeln!(out, "Store holds {} tasks", stored.len())?;
            Ok(())
        }
        Command::Status { index, status } => {
            let Some(task) = tracker.update_status(index, status).await? else {
                bail!("Task not found: {index}");
            };
            print_task(out, index, &task)?;
            Ok(())
        }
        Command::Update { index, fields } => {
            let value = serde_json::from_str(&fields).context("Fields must be valid JSON")?;
            let patch = TaskPatch::from_json(value)?;
            if patch.is_empty() {
                bail!("No fields to update");
            }
            let Some(task) = tracker.update_task(index, &patch).await? else {
                bail!("Task not found: {index}");
            };
            print_task(out, index, &task)?;
            Ok(())
        }
    }
}

async fn list(tracker: &TaskTracker, json: bool, out: &mut impl Write) -> Result<()> {
    let tasks = tracker.get_all().await?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?;
        return Ok(());
    }

    for (index, task) in tasks.iter().enumerate() {
        print_task(out, index, task)?;
    }
    Ok(())
}

fn print_task(out: &mut impl Write, index: usize, task: &TaskRecord) -> Result<()> {
    write!(
        out,
        "{index:>3}  W{} D{:<3} {:<10}  [{}] {}",
        task.week, task.day, task.date, task.status, task.topic
    )?;
    if !task.remarks.is_empty() {
        write!(out, " ({})", task.remarks)?;
    }
    writeln!(out)?;
    Ok(())
}

fn read_plan(args: &PlanArgs) -> Result<Vec<TaskRecord>> {
    let mut tasks = load_plan_file(&args.file)?;
    if let Some(start) = args.start_date {
        assign_dates(&mut tasks, start);
    }
    Ok(tasks)
}

fn load_plan_file(path: &Path) -> Result<Vec<TaskRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Plan file {} is not a JSON array of tasks", path.display()))
}
