//! Numbered text menu over a `TaskList`

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::task::Task;
use crate::task_list::TaskList;

const MENU: &str = "\nTo-Do List Application
1. Add Task
2. Remove Task
3. Mark Task as Completed
4. List Tasks
5. Exit";

/// Drives the menu loop until the user exits or input runs out.
pub struct Menu<'a, R, W> {
    list: &'a mut TaskList,
    default_priority: String,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(list: &'a mut TaskList, default_priority: &str, input: R, output: W) -> Self {
        Self {
            list,
            default_priority: default_priority.to_string(),
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };

            match choice.trim() {
                "1" => {
                    if !self.add()? {
                        return Ok(());
                    }
                }
                "2" => {
                    let Some(index) = self.prompt_index("Task index to remove: ")? else {
                        return Ok(());
                    };
                    let removed = self
                        .list
                        .remove_task(index)
                        .context("Failed to save tasks")?;
                    match removed {
                        Some(task) => writeln!(self.output, "Removed: {}", task.description)?,
                        None => writeln!(self.output, "No task at index {index}.")?,
                    }
                }
                "3" => {
                    let Some(index) = self.prompt_index("Task index to mark as completed: ")?
                    else {
                        return Ok(());
                    };
                    let done = self
                        .list
                        .mark_task_completed(index)
                        .context("Failed to save tasks")?;
                    if !done {
                        writeln!(self.output, "No task at index {index}.")?;
                    }
                }
                "4" => self.print_tasks()?,
                "5" => return Ok(()),
                _ => writeln!(self.output, "Invalid option. Please try again.")?,
            }
        }
    }

    /// Returns `false` if input ended part way through.
    fn add(&mut self) -> Result<bool> {
        let Some(description) = self.prompt("Task description: ")? else {
            return Ok(false);
        };
        let Some(priority) = self.prompt("Task priority (low/medium/high): ")? else {
            return Ok(false);
        };
        let Some(due_date) = self.prompt("Due date (YYYY-MM-DD) or leave blank: ")? else {
            return Ok(false);
        };

        let priority = if priority.trim().is_empty() {
            self.default_priority.clone()
        } else {
            priority
        };
        let due_date = (!due_date.trim().is_empty()).then_some(due_date);

        let task = Task::new(description)
            .with_priority(priority)
            .with_due_date(due_date);
        self.list.add_task(task).context("Failed to save tasks")?;
        Ok(true)
    }

    fn print_tasks(&mut self) -> Result<()> {
        if self.list.is_empty() {
            writeln!(self.output, "No tasks.")?;
        }
        for line in self.list.list_tasks() {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Reprompts until a non-negative integer is entered.
    fn prompt_index(&mut self, message: &str) -> Result<Option<usize>> {
        loop {
            let Some(raw) = self.prompt(message)? else {
                return Ok(None);
            };
            match raw.trim().parse::<usize>() {
                Ok(index) => return Ok(Some(index)),
                Err(_) => writeln!(self.output, "Please enter a task number, e.g. 0.")?,
            }
        }
    }
}
