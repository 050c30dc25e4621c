//! Task form: the adapter between typed input and the task store.
//!
//! The form works in one of two modes. `Create` appends a new task on submit;
//! `Edit(position)` replaces the task at that position. Both the TUI and the
//! `add`/`edit` commands go through `TaskForm::submit`, so validation is the
//! same everywhere.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    due::parse_due_input_at,
    fields::Priority,
    task::{Task, DEADLINE_FORMAT},
    tui::input::InputField,
};

/// Field order for form navigation.
pub const TITLE_FIELD: usize = 0;
pub const DEADLINE_FIELD: usize = 1;
pub const PRIORITY_FIELD: usize = 2;
pub const PROGRESS_FIELD: usize = 3;
pub const NOTES_FIELD: usize = 4;
pub const FIELD_COUNT: usize = 5;

/// Whether a submit creates a task or replaces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(usize),
}

/// Input rejected at submit time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title must not be empty")]
    EmptyTitle,
    #[error("Progress must be a whole number from 0 to 100, got '{0}'")]
    InvalidProgress(String),
    #[error("Unrecognised deadline '{0}' (try YYYY-MM-DD, 'tomorrow' or 'in 3d')")]
    InvalidDeadline(String),
}

/// A validated form, ready to apply to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub mode: FormMode,
    pub task: Task,
}

/// Editable task fields.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub mode: FormMode,
    pub title: InputField,
    pub deadline: InputField,
    pub priority: usize,
    pub priorities: Vec<Priority>,
    pub progress: InputField,
    pub notes: InputField,
    pub current_field: usize,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// Empty form in create mode: priority High, progress 0.
    pub fn new() -> Self {
        let mut form = Self {
            mode: FormMode::Create,
            title: InputField::new(),
            deadline: InputField::new(),
            priority: 0,
            priorities: Priority::CHOICES.to_vec(),
            progress: InputField::with_value("0"),
            notes: InputField::new(),
            current_field: TITLE_FIELD,
        };
        form.update_active_field();
        form
    }

    /// Form in edit mode, populated from the task at `position`.
    pub fn from_task(position: usize, task: &Task) -> Self {
        let mut form = Self::new();
        form.mode = FormMode::Edit(position);
        form.title = InputField::with_value(task.title());
        form.deadline = InputField::with_value(task.deadline());
        form.set_priority(task.priority().clone());
        form.progress = InputField::with_value(&task.progress().to_string());
        form.notes = InputField::with_value(task.notes());
        form.update_active_field();
        form
    }

    /// Select `priority`, adding it to the choices if it is not a known level.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = match self.priorities.iter().position(|p| *p == priority) {
            Some(i) => i,
            None => {
                self.priorities.push(priority);
                self.priorities.len() - 1
            }
        };
    }

    pub fn selected_priority(&self) -> Priority {
        self.priorities.get(self.priority).cloned().unwrap_or_default()
    }

    /// Back to an empty create-mode form.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Validate the fields and build the task.
    pub fn submit(&self, today: NaiveDate) -> Result<Submission, ValidationError> {
        let title = self.title.value.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let raw_progress = self.progress.value.trim();
        let progress = match raw_progress.parse::<i64>() {
            Ok(p) if (0..=100).contains(&p) => p,
            _ => return Err(ValidationError::InvalidProgress(raw_progress.to_string())),
        };

        let raw_deadline = self.deadline.value.trim();
        let deadline = if raw_deadline.is_empty() {
            String::new()
        } else {
            parse_due_input_at(raw_deadline, today)
                .map(|d| d.format(DEADLINE_FORMAT).to_string())
                .ok_or_else(|| ValidationError::InvalidDeadline(raw_deadline.to_string()))?
        };

        Ok(Submission {
            mode: self.mode,
            task: Task::new(
                title,
                deadline,
                self.selected_priority(),
                progress,
                self.notes.value.trim(),
            ),
        })
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn update_active_field(&mut self) {
        let current = self.current_field;
        self.title.active = current == TITLE_FIELD;
        self.deadline.active = current == DEADLINE_FIELD;
        self.progress.active = current == PROGRESS_FIELD;
        self.notes.active = current == NOTES_FIELD;
    }

    /// Text input under focus, `None` on the priority selector.
    fn current_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DEADLINE_FIELD => Some(&mut self.deadline),
            PROGRESS_FIELD => Some(&mut self.progress),
            NOTES_FIELD => Some(&mut self.notes),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.current_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.current_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.current_input() {
            field.handle_delete();
        }
    }

    /// Move the cursor, or cycle the priority selector.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == PRIORITY_FIELD {
            let n = self.priorities.len();
            self.priority = if right {
                (self.priority + 1) % n
            } else {
                (self.priority + n - 1) % n
            };
            return;
        }
        if let Some(field) = self.current_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }
}
