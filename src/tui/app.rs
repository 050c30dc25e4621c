//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the task store, turns key
//! presses into form and store operations, and draws the current `TaskView`
//! together with the summary panel, the month calendar and the daily quote.

use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::{info, warn};

use crate::{
    calendar::{MonthCalendar, WEEKDAYS},
    quote,
    storage::Storage,
    store::{StoreError, TaskStore},
    summary::summarize,
    view::{render, RowAction, TaskList, TaskRow, TaskView},
    tui::{
        colors::{priority_color, DARK_GREEN, DARK_PURPLE, DARK_RED, GOLD},
        enums::AppState,
        input::InputField,
        task_form::{
            FormMode, TaskForm, DEADLINE_FIELD, NOTES_FIELD, PRIORITY_FIELD, PROGRESS_FIELD,
            TITLE_FIELD,
        },
        utils::centered_rect,
    },
};

pub const APP_TITLE: &str = "Smart Deadline Reminder";

/// Main application state for the terminal user interface.
pub struct App<S: Storage> {
    state: AppState,
    store: TaskStore<S>,
    view: TaskView,
    task_list_state: TableState,
    task_form: TaskForm,
    status_message: String,
    pending_delete: Option<usize>,
    today: NaiveDate,
    calendar: MonthCalendar,
    quote: &'static str,
    activity: String,
}

impl<S: Storage> App<S> {
    /// Create the app for a loaded store, using the local clock and a random quote.
    pub fn new(store: TaskStore<S>) -> Self {
        let now = Local::now();
        let quote = quote::pick(&mut rand::thread_rng());
        let activity = format!("Active: {}", now.format("%Y-%m-%d %H:%M:%S"));
        Self::with_context(store, now.date_naive(), quote, activity)
    }

    /// Create the app with a fixed date, quote and activity line.
    pub fn with_context(
        store: TaskStore<S>,
        today: NaiveDate,
        quote: &'static str,
        activity: String,
    ) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            view: render(store.tasks(), &summarize(store.tasks()), today),
            store,
            task_list_state: TableState::default(),
            task_form: TaskForm::new(),
            status_message: String::new(),
            pending_delete: None,
            today,
            calendar: MonthCalendar::for_date(today),
            quote,
            activity,
        };
        app.refresh_view();
        app
    }

    /// Rebuild the view from the store and keep the selection in range.
    fn refresh_view(&mut self) {
        let summary = summarize(self.store.tasks());
        self.view = render(self.store.tasks(), &summary, self.today);

        let len = self.store.len();
        let selected = match self.task_list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.task_list_state.select(selected);
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Action of the selected row, resolved against the current view.
    fn selected_action(&self, pick: fn(&TaskRow) -> RowAction) -> Option<RowAction> {
        let TaskList::Rows(rows) = &self.view.list else {
            return None;
        };
        self.task_list_state
            .selected()
            .and_then(|i| rows.get(i))
            .map(pick)
    }

    /// Report a store error; a failed save keeps the change in memory.
    fn report_store_error(&mut self, e: StoreError) {
        match &e {
            StoreError::Persist(_) => {
                warn!(error = %e, "save failed");
                self.set_status_message(format!("{e} (press 'w' to retry)"));
            }
            StoreError::OutOfBounds { .. } => {
                warn!(error = %e, "stale position");
                self.set_status_message(format!("Error: {e}"));
            }
        }
    }

    /// Copy the task at `position` into the form and switch to edit mode.
    fn request_edit(&mut self, position: usize) {
        match self.store.get(position) {
            Some(task) => {
                self.task_form = TaskForm::from_task(position, task);
                self.state = AppState::EditTask;
            }
            None => self.set_status_message(format!("No task at position {position}")),
        }
    }

    fn request_delete(&mut self, position: usize) {
        if self.store.get(position).is_some() {
            self.pending_delete = Some(position);
            self.state = AppState::Confirm;
        }
    }

    fn confirm_delete(&mut self) {
        let Some(position) = self.pending_delete.take() else {
            return;
        };
        match self.store.remove_at(position) {
            Ok(task) => {
                info!(position, "task deleted");
                self.set_status_message(format!("Deleted \"{}\"", task.title()));
            }
            Err(e) => self.report_store_error(e),
        }
        self.task_form.reset();
        self.refresh_view();
    }

    /// Validate the form and apply it. On a validation error nothing changes
    /// and the form stays open.
    fn submit_form(&mut self) {
        let submission = match self.task_form.submit(self.today) {
            Ok(s) => s,
            Err(e) => {
                self.set_status_message(e.to_string());
                return;
            }
        };

        let result = match submission.mode {
            FormMode::Create => self.store.append(submission.task).map(|i| {
                self.task_list_state.select(Some(i));
                "Task created"
            }),
            FormMode::Edit(position) => self
                .store
                .replace_at(position, submission.task)
                .map(|_| "Task updated"),
        };
        match result {
            Ok(msg) => self.set_status_message(msg),
            Err(e) => self.report_store_error(e),
        }

        self.task_form.reset();
        self.state = AppState::TaskList;
        self.refresh_view();
    }

    fn retry_save(&mut self) {
        match self.store.persist() {
            Ok(()) => self.set_status_message("Saved"),
            Err(e) => self.report_store_error(e),
        }
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.task_list_state.selected() {
                    self.task_list_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.store.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                }
            }
            KeyCode::Char('a') => {
                self.task_form.reset();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(RowAction::Edit(position)) = self.selected_action(|r| r.edit) {
                    self.request_edit(position);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(RowAction::Delete(position)) = self.selected_action(|r| r.delete) {
                    self.request_delete(position);
                }
            }
            KeyCode::Char('w') => self.retry_save(),
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Handle keyboard input in the add/edit form.
    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.task_form.reset();
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    /// Handle keyboard input in the confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.confirm_delete();
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    fn handle_help_input(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')) {
            self.state = AppState::TaskList;
        }
    }

    /// Dispatch one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.status_message.clear();

        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key),
            AppState::AddTask | AppState::EditTask => self.handle_form_input(key),
            AppState::Confirm => self.handle_confirm_input(key),
            AppState::Help => self.handle_help_input(key),
        }
        false
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    /// Render the header with the app title, activity line and average.
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(vec![
            Span::styled(APP_TITLE, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("Average progress: {}", self.view.average_percent),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("  "),
            Span::styled(
                self.activity.as_str(),
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Render the task list region from the current view.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(format!(
            "Tasks ({}) - Press 'h' for help",
            self.view.total_count
        ));

        let rows = match &self.view.list {
            TaskList::Placeholder(text) => {
                let placeholder = Paragraph::new(*text)
                    .block(block)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray));
                f.render_widget(placeholder, area);
                return;
            }
            TaskList::Rows(rows) => rows,
        };

        let header_cells = ["#", "Title", "Priority", "Deadline", "Due", "Progress", "Notes"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
            .height(1);

        let table_rows: Vec<Row> = rows
            .iter()
            .map(|row| {
                let badge_color = self
                    .store
                    .get(row.position)
                    .map(|t| priority_color(t.priority()))
                    .unwrap_or(Color::Gray);
                let deadline = if row.deadline.is_empty() { "-" } else { row.deadline.as_str() };
                Row::new(vec![
                    Cell::from(row.position.to_string()),
                    Cell::from(row.title.as_str()),
                    Cell::from(row.badge.as_str()).style(Style::default().fg(badge_color)),
                    Cell::from(deadline),
                    Cell::from(row.due_label.as_str()),
                    Cell::from(row.progress.as_str()),
                    Cell::from(row.notes.as_str()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(3),  // #
            Constraint::Min(20),    // Title
            Constraint::Length(11), // Priority
            Constraint::Length(11), // Deadline
            Constraint::Length(9),  // Due
            Constraint::Length(9),  // Progress
            Constraint::Min(15),    // Notes
        ];

        let table = Table::new(table_rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    /// Render the side panel: summary, progress gauge, calendar and quote.
    fn render_side_panel(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),  // Summary
                Constraint::Length(3),  // Gauge
                Constraint::Length(10), // Calendar
                Constraint::Min(3),     // Quote
            ])
            .split(area);

        let summary = Paragraph::new(vec![
            Line::from(format!("Tasks:    {}", self.view.summary_count)),
            Line::from(format!("Average:  {}", self.view.summary_average)),
        ])
        .block(Block::default().borders(Borders::ALL).title("Summary"));
        f.render_widget(summary, chunks[0]);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(DARK_GREEN))
            .percent(self.view.progress_fill);
        f.render_widget(gauge, chunks[1]);

        let mut lines = vec![Line::from(
            WEEKDAYS.iter().map(|d| format!("{d:>3}")).collect::<String>(),
        )];
        for week in self.calendar.weeks() {
            let spans: Vec<Span> = week
                .iter()
                .map(|cell| match cell {
                    Some(d) if *d == self.calendar.today => Span::styled(
                        format!("{d:>3}"),
                        Style::default().fg(Color::Black).bg(GOLD).add_modifier(Modifier::BOLD),
                    ),
                    Some(d) => Span::raw(format!("{d:>3}")),
                    None => Span::raw("   "),
                })
                .collect();
            lines.push(Line::from(spans));
        }
        let calendar = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.calendar.label.as_str()),
        );
        f.render_widget(calendar, chunks[2]);

        let quote = Paragraph::new(self.quote)
            .block(Block::default().borders(Borders::ALL).title("Quote of the day"))
            .style(Style::default().add_modifier(Modifier::ITALIC))
            .wrap(Wrap { trim: true });
        f.render_widget(quote, chunks[3]);
    }

    fn render_input(f: &mut Frame, area: Rect, title: &str, field: &InputField, focused: bool) {
        let style = if focused { Style::default().fg(GOLD) } else { Style::default() };
        let input = Paragraph::new(field.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(style),
        );
        f.render_widget(input, area);
    }

    /// Render the add/edit form.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let title = match self.task_form.mode {
            FormMode::Create => "New Task".to_string(),
            FormMode::Edit(position) => format!("Edit Task #{position}"),
        };
        let outer = Block::default().borders(Borders::ALL).title(title);
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Deadline
                Constraint::Length(3), // Priority
                Constraint::Length(3), // Progress
                Constraint::Length(3), // Notes
                Constraint::Min(1),    // Instructions
            ])
            .split(inner);

        let form = &self.task_form;
        let current = form.current_field;
        Self::render_input(f, chunks[0], "Title *", &form.title, current == TITLE_FIELD);
        Self::render_input(
            f,
            chunks[1],
            "Deadline (YYYY-MM-DD, tomorrow, in 3d, next fri)",
            &form.deadline,
            current == DEADLINE_FIELD,
        );

        let priority_style = if current == PRIORITY_FIELD {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        };
        let selected = form.selected_priority();
        let priority = Paragraph::new(Line::from(Span::styled(
            format!("< {} >", selected),
            Style::default().fg(priority_color(&selected)),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Priority")
                .border_style(priority_style),
        );
        f.render_widget(priority, chunks[2]);

        Self::render_input(f, chunks[3], "Progress % (0-100)", &form.progress, current == PROGRESS_FIELD);
        Self::render_input(f, chunks[4], "Notes", &form.notes, current == NOTES_FIELD);

        let help = Paragraph::new(vec![
            Line::from("Tab/Up/Down: move between fields   Left/Right: cursor or priority"),
            Line::from("Enter: save   Esc: cancel"),
        ])
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[5]);

        if let Some(field) = match current {
            TITLE_FIELD => Some((&form.title, chunks[0])),
            DEADLINE_FIELD => Some((&form.deadline, chunks[1])),
            PROGRESS_FIELD => Some((&form.progress, chunks[3])),
            NOTES_FIELD => Some((&form.notes, chunks[4])),
            _ => None,
        } {
            let (input, rect) = field;
            f.set_cursor_position((rect.x + 1 + input.cursor as u16, rect.y + 1));
        }
    }

    /// Render a confirmation dialog for deleting a task.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let target = self
            .pending_delete
            .and_then(|i| self.store.get(i))
            .map(|t| t.title().to_string())
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(target),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled("Task list", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  Up/Down, j/k   select task"),
            Line::from("  a              add task"),
            Line::from("  e, Enter       edit selected task"),
            Line::from("  d, Delete      delete selected task (asks first)"),
            Line::from("  w              retry saving after a storage error"),
            Line::from("  h, ?           toggle help"),
            Line::from("  q, Esc         quit"),
            Line::from(""),
            Line::from(Span::styled("Form", Style::default().add_modifier(Modifier::BOLD))),
            Line::from("  Tab/Shift+Tab  next/previous field"),
            Line::from("  Left/Right     move cursor, or change priority"),
            Line::from("  Enter          save   Esc  cancel"),
        ];
        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} | Average: {} | Press 'h' for help",
                    self.view.total_count, self.view.average_percent
                ),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the view for the current state.
    pub fn render(&mut self, f: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());
        self.render_header(f, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(26)])
            .split(rows[1]);

        match self.state {
            AppState::TaskList => self.render_task_list(f, columns[0]),
            AppState::AddTask | AppState::EditTask => self.render_task_form(f, columns[0]),
            AppState::Help => self.render_help(f, columns[0]),
            AppState::Confirm => {
                self.render_task_list(f, columns[0]);
                self.render_confirm(f, columns[0]);
            }
        }
        self.render_side_panel(f, columns[1]);
        self.render_status_bar(f, rows[2]);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
