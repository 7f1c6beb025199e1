use crate::input::Action;
use crate::model::{ContainerRecord, StateCounts};
use chrono::{DateTime, Local};
use std::fmt::{Display, Formatter};

/// Work the event loop hands to a background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    None,
    Enumerate,
    Start { id: String },
    Stop { id: String },
}

impl AppCommand {
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::None => None,
            Self::Enumerate => Some(Operation::Enumerate),
            Self::Start { .. } => Some(Operation::Start),
            Self::Stop { .. } => Some(Operation::Stop),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Enumerate,
    Start,
    Stop,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enumerate => write!(f, "list"),
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// Result message sent back to the event loop by a finished background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Enumerated(Vec<ContainerRecord>),
    Failed { operation: Operation, error: String },
}

pub struct App {
    running: bool,
    engine: String,
    records: Vec<ContainerRecord>,
    cursor: usize,
    in_flight: usize,
    last_error: Option<String>,
    status: String,
}

impl App {
    pub fn new(engine: String) -> Self {
        Self {
            running: true,
            engine,
            records: Vec::new(),
            cursor: 0,
            // the startup fetch is issued before the first frame
            in_flight: 1,
            last_error: None,
            status: String::new(),
        }
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn records(&self) -> &[ContainerRecord] {
        &self.records
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&ContainerRecord> {
        self.records.get(self.cursor)
    }

    pub fn pending(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn counts(&self) -> StateCounts {
        StateCounts::tally(&self.records)
    }

    pub fn apply_action(&mut self, action: Action) -> AppCommand {
        match action {
            Action::Quit => {
                self.running = false;
                AppCommand::None
            }
            Action::Up => {
                self.move_up();
                AppCommand::None
            }
            Action::Down => {
                self.move_down();
                AppCommand::None
            }
            Action::Top => {
                self.cursor = 0;
                AppCommand::None
            }
            Action::Bottom => {
                self.cursor = self.records.len().saturating_sub(1);
                AppCommand::None
            }
            Action::Refresh => {
                self.status = "Refreshing...".to_string();
                self.issue(AppCommand::Enumerate)
            }
            Action::Start => match self.selected_id() {
                Some(id) => {
                    self.status = format!("Starting {id}...");
                    self.issue(AppCommand::Start { id })
                }
                None => AppCommand::None,
            },
            Action::Stop => match self.selected_id() {
                Some(id) => {
                    self.status = format!("Stopping {id}...");
                    self.issue(AppCommand::Stop { id })
                }
                None => AppCommand::None,
            },
        }
    }

    pub fn apply_outcome(&mut self, outcome: TaskOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            TaskOutcome::Enumerated(records) => {
                self.set_records(records, Local::now());
            }
            TaskOutcome::Failed { error, .. } => {
                self.status = normalize_status_text(format!(
                    "Error: {}",
                    summarize_error_line(&error)
                ));
                self.last_error = Some(error);
            }
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = normalize_status_text(status.into());
    }

    fn set_records(&mut self, records: Vec<ContainerRecord>, refreshed_at: DateTime<Local>) {
        self.records = records;
        self.cursor = self.cursor.min(self.records.len().saturating_sub(1));
        self.last_error = None;
        self.status = format!("Updated at {}", refreshed_at.format("%H:%M:%S"));
    }

    fn issue(&mut self, command: AppCommand) -> AppCommand {
        if command.operation().is_some() {
            self.in_flight += 1;
        }
        command
    }

    fn selected_id(&self) -> Option<String> {
        self.selected().map(|record| record.id.clone())
    }

    fn move_up(&mut self) {
        if self.records.is_empty() {
            return;
        }
        self.cursor = if self.cursor > 0 {
            self.cursor - 1
        } else {
            self.records.len() - 1
        };
    }

    fn move_down(&mut self) {
        if self.records.is_empty() {
            return;
        }
        self.cursor = if self.cursor < self.records.len() - 1 {
            self.cursor + 1
        } else {
            0
        };
    }
}

fn summarize_error_line(error: &str) -> String {
    error
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

fn normalize_status_text(status: String) -> String {
    const MAX_STATUS_LEN: usize = 180;
    if status.chars().count() <= MAX_STATUS_LEN {
        return status;
    }

    let mut shortened = status
        .chars()
        .take(MAX_STATUS_LEN.saturating_sub(1))
        .collect::<String>();
    shortened.push('…');
    shortened
}
