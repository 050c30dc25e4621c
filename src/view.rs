//! Projection of the task collection onto the view surface.
//!
//! `render` builds a complete `TaskView` from the collection and its summary.
//! The terminal and command layers draw that description as-is and rebuild it
//! after every mutation; nothing is patched incrementally.

use chrono::NaiveDate;

use crate::due::format_due_relative;
use crate::fields::Priority;
use crate::summary::Summary;
use crate::task::Task;

/// Text shown in the list region when there are no tasks.
pub const NO_TASKS: &str = "No tasks";

/// Action offered on a row, bound to the row's current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(usize),
    Delete(usize),
}

/// One displayed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub position: usize,
    pub title: String,
    pub badge: String,
    pub notes: String,
    pub progress: String,
    pub deadline: String,
    pub due_label: String,
    pub edit: RowAction,
    pub delete: RowAction,
}

/// Content of the task list region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskList {
    Placeholder(&'static str),
    Rows(Vec<TaskRow>),
}

/// Everything the core writes onto the view surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub list: TaskList,
    pub total_count: String,
    pub summary_count: String,
    pub average_percent: String,
    pub summary_average: String,
    /// Width of the progress indicator, in percent of its track.
    pub progress_fill: u16,
}

/// Decorated label for a priority; unknown values pass through unchanged.
pub fn priority_badge(priority: &Priority) -> String {
    match priority {
        Priority::High => "🔴 High".to_string(),
        Priority::Medium => "🟡 Medium".to_string(),
        Priority::Low => "🟢 Low".to_string(),
        Priority::Other(s) => s.clone(),
    }
}

/// Build the view for `tasks` and their `summary`, with deadlines labelled
/// relative to `today`.
pub fn render(tasks: &[Task], summary: &Summary, today: NaiveDate) -> TaskView {
    let list = if tasks.is_empty() {
        TaskList::Placeholder(NO_TASKS)
    } else {
        TaskList::Rows(
            tasks
                .iter()
                .enumerate()
                .map(|(i, t)| render_row(i, t, today))
                .collect(),
        )
    };

    let count = summary.count.to_string();
    let average = format!("{}%", summary.average_percent);
    TaskView {
        list,
        total_count: count.clone(),
        summary_count: count,
        average_percent: average.clone(),
        summary_average: average,
        progress_fill: summary.average_percent.clamp(0, 100) as u16,
    }
}

fn render_row(position: usize, task: &Task, today: NaiveDate) -> TaskRow {
    TaskRow {
        position,
        title: task.title().to_string(),
        badge: priority_badge(task.priority()),
        notes: task.notes().to_string(),
        progress: format!("{}%", task.progress()),
        deadline: task.deadline().to_string(),
        due_label: format_due_relative(task.deadline_date(), today),
        edit: RowAction::Edit(position),
        delete: RowAction::Delete(position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_priority_badges() {
        assert_eq!(priority_badge(&Priority::High), "🔴 High");
        assert_eq!(priority_badge(&Priority::Medium), "🟡 Medium");
        assert_eq!(priority_badge(&Priority::Low), "🟢 Low");
        assert_eq!(priority_badge(&Priority::Other("Urgent".into())), "Urgent");
        assert_eq!(priority_badge(&Priority::Other(String::new())), "");
    }

    #[test]
    fn test_empty_collection_renders_placeholder() {
        let view = render(&[], &summarize(&[]), today());
        assert_eq!(view.list, TaskList::Placeholder(NO_TASKS));
        assert_eq!(view.total_count, "0");
        assert_eq!(view.summary_count, "0");
        assert_eq!(view.average_percent, "0%");
        assert_eq!(view.summary_average, "0%");
        assert_eq!(view.progress_fill, 0);
    }

    #[test]
    fn test_rows_follow_collection_order() {
        let tasks = vec![
            Task::new("First", "2026-10-20", Priority::High, 20, "a"),
            Task::new("Second", "", Priority::Low, 60, ""),
            Task::new("Third", "2026-10-17", Priority::Other("x".into()), 100, "c"),
        ];
        let view = render(&tasks, &summarize(&tasks), today());
        let TaskList::Rows(rows) = &view.list else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(), ["First", "Second", "Third"]);

        assert_eq!(rows[0].badge, "🔴 High");
        assert_eq!(rows[0].progress, "20%");
        assert_eq!(rows[0].due_label, "tomorrow");
        assert_eq!(rows[1].due_label, "-");
        assert_eq!(rows[2].badge, "x");
        assert_eq!(rows[2].due_label, "2d late");

        assert_eq!(rows[2].edit, RowAction::Edit(2));
        assert_eq!(rows[2].delete, RowAction::Delete(2));

        assert_eq!(view.total_count, "3");
        assert_eq!(view.average_percent, "60%");
        assert_eq!(view.progress_fill, 60);
    }

    #[test]
    fn test_render_is_idempotent() {
        let tasks = vec![Task::new("Only", "", Priority::Medium, 33, "")];
        let summary = summarize(&tasks);
        assert_eq!(render(&tasks, &summary, today()), render(&tasks, &summary, today()));
    }

    #[test]
    fn test_progress_fill_is_clamped() {
        let tasks = vec![Task::new("Over", "", Priority::High, 250, "")];
        let view = render(&tasks, &summarize(&tasks), today());
        assert_eq!(view.average_percent, "250%");
        assert_eq!(view.progress_fill, 100);
    }
}
