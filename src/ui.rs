//! Full-screen terminal view of the task list

use std::io;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

use crate::task::Task;
use crate::task_list::{format_task_line, TaskList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddStep {
    Description,
    Priority,
    DueDate,
}

impl AddStep {
    fn label(self) -> &'static str {
        match self {
            AddStep::Description => "Task description",
            AddStep::Priority => "Task priority (low/medium/high)",
            AddStep::DueDate => "Due date (YYYY-MM-DD) or leave blank",
        }
    }
}

#[derive(Debug, Default)]
struct Draft {
    description: String,
    priority: String,
}

enum Mode {
    Browse,
    Adding {
        step: AddStep,
        input: String,
        draft: Draft,
    },
}

pub struct App<'a> {
    list: &'a mut TaskList,
    default_priority: String,
    selected: usize,
    mode: Mode,
    status: Option<String>,
    today: NaiveDate,
}

impl<'a> App<'a> {
    pub fn new(list: &'a mut TaskList, default_priority: &str, today: NaiveDate) -> Self {
        Self {
            list,
            default_priority: default_priority.to_string(),
            selected: 0,
            mode: Mode::Browse,
            status: None,
            today,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_adding(&self) -> bool {
        matches!(self.mode, Mode::Adding { .. })
    }

    /// Applies one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }
        match self.mode {
            Mode::Browse => self.handle_browse_key(key.code),
            Mode::Adding { .. } => {
                self.handle_input_key(key.code)?;
                Ok(false)
            }
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.list.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('a') => {
                self.status = None;
                self.mode = Mode::Adding {
                    step: AddStep::Description,
                    input: String::new(),
                    draft: Draft::default(),
                };
            }
            KeyCode::Char('c') | KeyCode::Enter => {
                if self
                    .list
                    .mark_task_completed(self.selected)
                    .context("Failed to save tasks")?
                {
                    self.status = Some(format!("Task {} marked as completed", self.selected));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(task) = self
                    .list
                    .remove_task(self.selected)
                    .context("Failed to save tasks")?
                {
                    self.status = Some(format!("Removed: {}", task.description));
                    if self.selected >= self.list.len() {
                        self.selected = self.list.len().saturating_sub(1);
                    }
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_input_key(&mut self, code: KeyCode) -> Result<()> {
        let Mode::Adding { step, input, draft } = &mut self.mode else {
            return Ok(());
        };
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.status = Some("Add cancelled".to_string());
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Enter => {
                let value = std::mem::take(input);
                match *step {
                    AddStep::Description => {
                        draft.description = value;
                        *step = AddStep::Priority;
                    }
                    AddStep::Priority => {
                        draft.priority = if value.trim().is_empty() {
                            self.default_priority.clone()
                        } else {
                            value
                        };
                        *step = AddStep::DueDate;
                    }
                    AddStep::DueDate => {
                        let due_date = (!value.trim().is_empty()).then_some(value);
                        let draft = std::mem::take(draft);
                        self.mode = Mode::Browse;
                        self.submit(draft, due_date)?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit(&mut self, draft: Draft, due_date: Option<String>) -> Result<()> {
        let task = Task::new(draft.description)
            .with_priority(draft.priority)
            .with_due_date(due_date);
        self.list.add_task(task).context("Failed to save tasks")?;
        self.selected = self.list.len() - 1;
        self.status = Some("Task added".to_string());
        Ok(())
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        let items: Vec<ListItem> = self
            .list
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, t)| ListItem::new(format_task_line(i, t)).style(self.task_style(t)))
            .collect();

        let title = format!("Tasks ({})", self.list.path().display());
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.list.is_empty() {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(list, chunks[0], &mut state);

        let bar = match &self.mode {
            Mode::Adding { step, input, .. } => Paragraph::new(input.as_str()).block(
                Block::default()
                    .title(step.label())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            ),
            Mode::Browse => {
                let text = match &self.status {
                    Some(status) => status.clone(),
                    None if self.list.is_empty() => "No tasks. Press 'a' to add one.".to_string(),
                    None => String::new(),
                };
                Paragraph::new(text).block(Block::default().borders(Borders::ALL))
            }
        };
        f.render_widget(bar, chunks[1]);

        let hints = match self.mode {
            Mode::Browse => "a add  c complete  d remove  ↑/↓ move  q quit",
            Mode::Adding { .. } => "Enter confirm  Esc cancel",
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                hints,
                Style::default().fg(Color::DarkGray),
            ))),
            chunks[2],
        );
    }

    fn task_style(&self, task: &Task) -> Style {
        if task.completed {
            Style::default().fg(Color::DarkGray)
        } else if task.is_overdue(self.today) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        }
    }
}

/// Takes over the terminal until the user quits.
pub fn run(list: &mut TaskList, default_priority: &str) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(list, default_priority, Local::now().date_naive());
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if let Event::Key(key) = event::read()? {
            if app.handle_key(key)? {
                debug!("Leaving task view");
                return Ok(());
            }
        }
    }
}
