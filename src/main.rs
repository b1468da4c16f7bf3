use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use todolist::cli::{self, Cli, Commands};
use todolist::config::Config;
use todolist::menu::Menu;
use todolist::task_list::TaskList;
use todolist::ui;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    if std::env::var("TODOLIST_DEBUG").is_ok() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("todolist=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let config = Config::load()?;
    let path = config.storage_file(cli.file.as_deref());

    let mut list = TaskList::open(&path)
        .with_context(|| format!("Failed to load tasks from {}", path.display()))?;

    match cli.command {
        Some(Commands::Add(args)) => cli::run_add(&mut list, args, &config.default_priority),
        Some(Commands::Remove { index }) => cli::run_remove(&mut list, index),
        Some(Commands::Done { index }) => cli::run_done(&mut list, index),
        Some(Commands::List { json }) => cli::run_list(&list, json),
        Some(Commands::Tui) => ui::run(&mut list, &config.default_priority),
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Menu::new(
                &mut list,
                &config.default_priority,
                stdin.lock(),
                stdout.lock(),
            )
            .run()
        }
    }
}
