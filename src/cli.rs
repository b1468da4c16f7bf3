//! Command-line definition and one-shot subcommands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::task::Task;
use crate::task_list::TaskList;

#[derive(Parser)]
#[command(name = "todo", version, about = "Keep a simple to-do list in a JSON file")]
pub struct Cli {
    /// Task file (defaults to the configured path, then ./tasks.json)
    #[arg(short, long, global = true, env = "TODOLIST_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// Remove the task at INDEX
    Remove { index: usize },
    /// Mark the task at INDEX as completed
    Done { index: usize },
    /// List all tasks
    List {
        /// Print the stored records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open the full-screen task view
    Tui,
}

#[derive(Args)]
pub struct AddArgs {
    /// What needs doing
    pub description: String,

    /// Priority tag, e.g. low, medium or high
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Due date as YYYY-MM-DD
    #[arg(short, long = "due")]
    pub due_date: Option<String>,
}

pub fn run_add(list: &mut TaskList, args: AddArgs, default_priority: &str) -> Result<()> {
    let priority = args
        .priority
        .unwrap_or_else(|| default_priority.to_string());
    let task = Task::new(args.description)
        .with_priority(priority)
        .with_due_date(args.due_date);
    list.add_task(task).context("Failed to save tasks")?;
    println!("Added task {}", list.len() - 1);
    Ok(())
}

pub fn run_remove(list: &mut TaskList, index: usize) -> Result<()> {
    match list.remove_task(index).context("Failed to save tasks")? {
        Some(task) => println!("Removed: {}", task.description),
        None => println!("No task at index {index}."),
    }
    Ok(())
}

pub fn run_done(list: &mut TaskList, index: usize) -> Result<()> {
    if list
        .mark_task_completed(index)
        .context("Failed to save tasks")?
    {
        println!("Marked task {index} as completed.");
    } else {
        println!("No task at index {index}.");
    }
    Ok(())
}

pub fn run_list(list: &TaskList, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(list.tasks())?);
        return Ok(());
    }

    if list.is_empty() {
        println!("No tasks in {}.", list.path().display());
        return Ok(());
    }
    for line in list.list_tasks() {
        println!("{line}");
    }
    Ok(())
}
