//! Read-only month calendar.

use chrono::{Datelike, NaiveDate};

/// Weekday header, Sunday first.
pub const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Month grid for the month containing a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    /// e.g. "October 2026".
    pub label: String,
    /// Blank cells before day 1 (weekday of the 1st, Sunday = 0).
    pub leading_blanks: u32,
    pub days_in_month: u32,
    pub today: u32,
}

impl MonthCalendar {
    pub fn for_date(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        MonthCalendar {
            label: date.format("%B %Y").to_string(),
            leading_blanks: first.weekday().num_days_from_sunday(),
            days_in_month: days_in_month(date.year(), date.month()),
            today: date.day(),
        }
    }

    /// Grid rows of seven cells; `None` is a blank cell.
    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        let cells: Vec<Option<u32>> = (0..self.leading_blanks)
            .map(|_| None)
            .chain((1..=self.days_in_month).map(Some))
            .collect();
        cells
            .chunks(7)
            .map(|chunk| {
                let mut week = [None; 7];
                week[..chunk.len()].copy_from_slice(chunk);
                week
            })
            .collect()
    }

    /// Plain text rendering, today marked with brackets.
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", self.label);
        out.push_str(&WEEKDAYS.map(|d| format!("{d:>4}")).concat());
        out.push('\n');
        for week in self.weeks() {
            let line: String = week
                .iter()
                .map(|cell| match cell {
                    Some(d) if *d == self.today => format!("[{d:>2}]"),
                    Some(d) => format!("{d:>4}"),
                    None => "    ".to_string(),
                })
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}
