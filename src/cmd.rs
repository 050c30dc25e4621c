//! Command implementations for the CLI interface.
//!
//! Each handler works on an open `TaskStore`, applies at most one mutation,
//! and prints the result. Mutations go through the same form validation as
//! the TUI.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::calendar::MonthCalendar;
use crate::cli::Cli;
use crate::due::truncate;
use crate::fields::PriorityArg;
use crate::quote;
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::summary::{summarize, Summary};
use crate::tui::input::InputField;
use crate::tui::run::run_tui;
use crate::tui::task_form::{FormMode, Submission, TaskForm};
use crate::view::{render, TaskList, TaskView};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive terminal UI.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Deadline: YYYY-MM-DD, "today", "tomorrow", "in 3d", "next fri".
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long, value_enum, default_value_t = PriorityArg::High)]
        priority: PriorityArg,
        /// Completion percentage, 0-100.
        #[arg(long, default_value_t = 0)]
        progress: i64,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Replace the task at a position; unspecified fields keep their value.
    Edit {
        /// Position shown by `list`.
        position: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        #[arg(long)]
        progress: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete the task at a position.
    Delete {
        /// Position shown by `list`.
        position: usize,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// List tasks with the summary.
    List,

    /// Show task count and average progress.
    Summary,

    /// Show this month's calendar.
    Calendar,

    /// Print a motivational quote.
    Quote,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui<S: Storage>(store: TaskStore<S>) -> Result<()> {
    run_tui(store).context("UI error")
}

/// Validate a filled form and apply it to the store.
fn apply<S: Storage>(store: &mut TaskStore<S>, form: &TaskForm, today: NaiveDate) -> Result<usize> {
    let Submission { mode, task } = form.submit(today)?;
    let position = match mode {
        FormMode::Create => store.append(task)?,
        FormMode::Edit(position) => {
            store.replace_at(position, task)?;
            position
        }
    };
    Ok(position)
}

/// Add a new task at the end of the list.
pub fn cmd_add<S: Storage>(
    store: &mut TaskStore<S>,
    today: NaiveDate,
    title: String,
    deadline: Option<String>,
    priority: PriorityArg,
    progress: i64,
    notes: Option<String>,
) -> Result<()> {
    let mut form = TaskForm::new();
    form.title = InputField::with_value(&title);
    form.deadline = InputField::with_value(deadline.as_deref().unwrap_or_default());
    form.set_priority(priority.into());
    form.progress = InputField::with_value(&progress.to_string());
    form.notes = InputField::with_value(notes.as_deref().unwrap_or_default());

    let position = apply(store, &form, today)?;
    println!("Added task {position}");
    Ok(())
}

/// Replace the task at `position`, keeping fields that were not given.
pub fn cmd_edit<S: Storage>(
    store: &mut TaskStore<S>,
    today: NaiveDate,
    position: usize,
    title: Option<String>,
    deadline: Option<String>,
    priority: Option<PriorityArg>,
    progress: Option<i64>,
    notes: Option<String>,
) -> Result<()> {
    let Some(task) = store.get(position) else {
        bail!("No task at position {position} (there are {})", store.len());
    };
    let mut form = TaskForm::from_task(position, task);
    if let Some(title) = title {
        form.title = InputField::with_value(&title);
    }
    if let Some(deadline) = deadline {
        form.deadline = InputField::with_value(&deadline);
    }
    if let Some(priority) = priority {
        form.set_priority(priority.into());
    }
    if let Some(progress) = progress {
        form.progress = InputField::with_value(&progress.to_string());
    }
    if let Some(notes) = notes {
        form.notes = InputField::with_value(&notes);
    }

    apply(store, &form, today)?;
    println!("Updated task {position}");
    Ok(())
}

/// Delete the task at `position` once confirmed.
pub fn cmd_delete<S: Storage>(
    store: &mut TaskStore<S>,
    position: usize,
    yes: bool,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<()> {
    let Some(task) = store.get(position) else {
        bail!("No task at position {position} (there are {})", store.len());
    };
    let prompt = format!("Delete task {position} \"{}\"?", task.title());
    if !yes && !confirm(&prompt)? {
        println!("Cancelled");
        return Ok(());
    }
    let removed = store.remove_at(position)?;
    println!("Deleted \"{}\"", removed.title());
    Ok(())
}

/// Ask a yes/no question on the terminal. Refuses when stdin is not a terminal.
pub fn confirm_on_terminal(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        bail!("Refusing to delete without confirmation; pass --yes");
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

/// Text bar for a percentage, e.g. `[######----]`.
pub fn progress_bar(percent: u16, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Plain text rendering of the task view.
pub fn format_view(view: &TaskView) -> String {
    let mut out = String::new();
    match &view.list {
        TaskList::Placeholder(text) => {
            out.push_str(text);
            out.push('\n');
        }
        TaskList::Rows(rows) => {
            out.push_str(&format!(
                "{:<4} {:<30} {:<10} {:<11} {:<9} {:>8}  {}\n",
                "#", "Title", "Priority", "Deadline", "Due", "Progress", "Notes"
            ));
            for row in rows {
                let deadline = if row.deadline.is_empty() { "-" } else { row.deadline.as_str() };
                out.push_str(&format!(
                    "{:<4} {:<30} {:<10} {:<11} {:<9} {:>8}  {}\n",
                    row.position,
                    truncate(&row.title, 30),
                    row.badge,
                    deadline,
                    row.due_label,
                    row.progress,
                    row.notes
                ));
            }
        }
    }
    out.push_str(&format!(
        "\nTasks: {}  Average: {}  {}\n",
        view.summary_count,
        view.summary_average,
        progress_bar(view.progress_fill, 20)
    ));
    out
}

/// Print the task list and summary.
pub fn cmd_list<S: Storage>(store: &TaskStore<S>, today: NaiveDate) {
    let view = render(store.tasks(), &summarize(store.tasks()), today);
    print!("{}", format_view(&view));
}

pub fn format_summary(summary: &Summary) -> String {
    format!("Tasks: {}\nAverage: {}%", summary.count, summary.average_percent)
}

pub fn cmd_summary<S: Storage>(store: &TaskStore<S>) {
    println!("{}", format_summary(&summarize(store.tasks())));
}

pub fn cmd_calendar(today: NaiveDate) {
    print!("{}", MonthCalendar::for_date(today).to_text());
}

pub fn cmd_quote() {
    println!("{}", quote::pick(&mut rand::thread_rng()));
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "sdr", &mut io::stdout());
}

/// Today's local date.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
