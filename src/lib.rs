//! todolist - a single-user task list kept in a JSON file

pub mod cli;
pub mod config;
pub mod error;
pub mod menu;
pub mod task;
pub mod task_list;
pub mod ui;

pub use error::{Result, TaskError};
pub use task::Task;
pub use task_list::TaskList;
