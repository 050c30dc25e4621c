//! Summary over the task collection.

use crate::task::Task;

/// Derived figures shown next to the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub count: usize,
    /// Mean progress rounded half up, `0` for an empty collection.
    pub average_percent: i64,
}

/// Compute the summary of `tasks`.
pub fn summarize(tasks: &[Task]) -> Summary {
    let count = tasks.len();
    if count == 0 {
        return Summary::default();
    }
    // Widened so hand-edited stored values cannot overflow the sum.
    let sum: i128 = tasks.iter().map(|t| i128::from(t.progress())).sum();
    let n = count as i128;
    // floor(sum / n + 1/2) without floats.
    let average = (2 * sum + n).div_euclid(2 * n);
    Summary {
        count,
        average_percent: average as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    fn with_progress(values: &[i64]) -> Vec<Task> {
        values
            .iter()
            .map(|&p| Task::new("t", "", Priority::High, p, ""))
            .collect()
    }

    #[test]
    fn test_empty() {
        assert_eq!(summarize(&[]), Summary { count: 0, average_percent: 0 });
    }

    #[test]
    fn test_single() {
        assert_eq!(summarize(&with_progress(&[35])), Summary { count: 1, average_percent: 35 });
    }

    #[test]
    fn test_many() {
        assert_eq!(
            summarize(&with_progress(&[20, 60, 100])),
            Summary { count: 3, average_percent: 60 }
        );
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(summarize(&with_progress(&[0, 1])).average_percent, 1);
        assert_eq!(summarize(&with_progress(&[10, 10, 11])).average_percent, 10);
        assert_eq!(summarize(&with_progress(&[10, 11, 11])).average_percent, 11);
        assert_eq!(summarize(&with_progress(&[0, -1])).average_percent, 0);
    }

    #[test]
    fn test_extreme_stored_values() {
        assert_eq!(
            summarize(&with_progress(&[i64::MAX / 2 + 1])).average_percent,
            i64::MAX / 2 + 1
        );
        assert_eq!(summarize(&with_progress(&[i64::MAX, i64::MAX])).average_percent, i64::MAX);
        assert_eq!(summarize(&with_progress(&[i64::MIN, i64::MIN])).average_percent, i64::MIN);
        assert_eq!(summarize(&with_progress(&[i64::MAX, i64::MIN])).average_percent, 0);
    }
}
