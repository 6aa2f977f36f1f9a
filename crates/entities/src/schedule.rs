//! Calendar dates for a day-by-day plan.

pub use chrono::NaiveDate;
use chrono::Days;

use crate::TaskRecord;

/// Format used for the `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Sets the date of the `i`-th record to `start + i` days.
pub fn assign_dates(records: &mut [TaskRecord], start: NaiveDate) {
    for (offset, record) in records.iter_mut().enumerate() {
        let date = start
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(NaiveDate::MAX);
        record.date = date.format(DATE_FORMAT).to_string();
    }
}
