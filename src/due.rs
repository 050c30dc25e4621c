//! Deadline parsing and formatting helpers.

use chrono::{Datelike, Duration, NaiveDate};

use crate::task::DEADLINE_FORMAT;

/// Parse human-readable deadline input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "next monday", "this friday", bare weekday names
/// - "end of week", "end of month"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD" format
///
/// Returns `None` for unrecognised input and for offsets that fall outside
/// the representable date range.
pub fn parse_due_input_at(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "yesterday" => return today.pred_opt(),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_week(today);
            return Some(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return first_of_next.pred_opt();
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some((i, unit)) = rest.char_indices().last() {
            if let Ok(n) = rest[..i].trim().parse::<i64>() {
                let offset = match unit {
                    'd' => Some(Duration::try_days(n)),
                    'w' => Some(Duration::try_weeks(n)),
                    // Approximate: 30 days per month
                    'm' => Some(n.checked_mul(30).and_then(Duration::try_days)),
                    _ => None,
                };
                if let Some(offset) = offset {
                    return offset.and_then(|o| today.checked_add_signed(o));
                }
            }
        }
    }

    let (next, day_name) = if let Some(d) = s.strip_prefix("next ") {
        (true, d)
    } else if let Some(d) = s.strip_prefix("this ") {
        (false, d)
    } else {
        (false, s.as_str())
    };
    if let Some(target) = weekday_index(day_name) {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target + 7 - current) % 7;
        let days = if next { ahead + 7 } else { ahead };
        return today.checked_add_signed(Duration::days(days));
    }

    NaiveDate::parse_from_str(&s, DEADLINE_FORMAT).ok()
}

fn weekday_index(name: &str) -> Option<i64> {
    let i = match name {
        "monday" | "mon" => 0,
        "tuesday" | "tue" => 1,
        "wednesday" | "wed" => 2,
        "thursday" | "thu" => 3,
        "friday" | "fri" => 4,
        "saturday" | "sat" => 5,
        "sunday" | "sun" => 6,
        _ => return None,
    };
    Some(i)
}

/// Start and end dates of the ISO week (Monday to Sunday) containing `today`.
pub fn start_end_of_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Format a deadline relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_simple_words() {
        // 2026-10-19 is a Monday.
        let today = d(2026, 10, 19);
        assert_eq!(parse_due_input_at("today", today), Some(today));
        assert_eq!(parse_due_input_at(" Tomorrow ", today), Some(d(2026, 10, 20)));
        assert_eq!(parse_due_input_at("eow", today), Some(d(2026, 10, 25)));
        assert_eq!(parse_due_input_at("end of month", today), Some(d(2026, 10, 31)));
        assert_eq!(parse_due_input_at("eom", d(2026, 12, 5)), Some(d(2026, 12, 31)));
    }

    #[test]
    fn test_parse_relative_amounts() {
        let today = d(2026, 10, 19);
        assert_eq!(parse_due_input_at("in 3d", today), Some(d(2026, 10, 22)));
        assert_eq!(parse_due_input_at("in 2w", today), Some(d(2026, 11, 2)));
        assert_eq!(parse_due_input_at("in 1m", today), Some(d(2026, 11, 18)));
        assert_eq!(parse_due_input_at("in xd", today), None);
    }

    #[test]
    fn test_parse_out_of_range_offsets() {
        let today = d(2026, 10, 19);
        assert_eq!(parse_due_input_at("in 99999999999d", today), None);
        assert_eq!(parse_due_input_at("in 9223372036854775807d", today), None);
        assert_eq!(parse_due_input_at("in 9223372036854775807w", today), None);
        assert_eq!(parse_due_input_at("in 9223372036854775807m", today), None);
        assert_eq!(parse_due_input_at("in -99999999999d", today), None);
        assert_eq!(parse_due_input_at("tomorrow", NaiveDate::MAX), None);
        assert_eq!(parse_due_input_at("yesterday", NaiveDate::MIN), None);
    }

    #[test]
    fn test_parse_weekdays() {
        let today = d(2026, 10, 19);
        assert_eq!(parse_due_input_at("monday", today), Some(today));
        assert_eq!(parse_due_input_at("fri", today), Some(d(2026, 10, 23)));
        assert_eq!(parse_due_input_at("this friday", today), Some(d(2026, 10, 23)));
        assert_eq!(parse_due_input_at("next monday", today), Some(d(2026, 10, 26)));
        assert_eq!(parse_due_input_at("next friday", today), Some(d(2026, 10, 30)));
    }

    #[test]
    fn test_parse_iso_and_garbage() {
        let today = d(2026, 10, 19);
        assert_eq!(parse_due_input_at("2027-01-05", today), Some(d(2027, 1, 5)));
        assert_eq!(parse_due_input_at("2027-02-30", today), None);
        assert_eq!(parse_due_input_at("someday", today), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = d(2026, 10, 19);
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(format_due_relative(Some(d(2026, 10, 20)), today), "tomorrow");
        assert_eq!(format_due_relative(Some(d(2026, 10, 22)), today), "in 3d");
        assert_eq!(format_due_relative(Some(d(2026, 10, 17)), today), "2d late");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }
}
