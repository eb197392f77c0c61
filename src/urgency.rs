//! Deadline urgency, recomputed at render time and never stored.

use chrono::NaiveDate;

/// Days reported for a deadline that cannot be parsed. Far enough out to never be urgent.
pub const FAR_FUTURE_DAYS: i64 = 999;

/// Last day (inclusive) of the urgent window.
pub const URGENT_WINDOW_DAYS: i64 = 3;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whole days from `today` until the deadline. Malformed input yields [`FAR_FUTURE_DAYS`].
pub fn days_remaining(deadline: &str, today: NaiveDate) -> i64 {
    match NaiveDate::parse_from_str(deadline.trim(), DATE_FORMAT) {
        Ok(date) => (date - today).num_days(),
        Err(_) => FAR_FUTURE_DAYS,
    }
}

/// True inside `0..=3` days. Overdue postings (negative days) are not urgent.
pub fn is_urgent(days_remaining: i64) -> bool {
    (0..=URGENT_WINDOW_DAYS).contains(&days_remaining)
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
