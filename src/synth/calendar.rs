//! Listed expiration calendar
//!
//! Standard monthly US equity options expire on the third Friday.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// Third Friday of a month
pub fn third_friday(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    // Monday=0 .. Friday=4; already a Friday gives 0
    let first_weekday = first.weekday().num_days_from_monday();
    let days_to_friday = (4 + 7 - first_weekday) % 7;
    let first_friday = first + Duration::days(days_to_friday as i64);

    Some(first_friday + Duration::days(14))
}

/// Monthly expirations starting the month after `as_of`
pub fn monthly_expirations(as_of: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let Some(month_start) = as_of.with_day(1) else {
        return Vec::new();
    };

    let mut expirations: Vec<NaiveDate> = Vec::with_capacity(count);
    for offset in 1..=count as u32 {
        let Some(month) = month_start.checked_add_months(Months::new(offset)) else {
            break;
        };
        if let Some(expiry) = third_friday(month.year(), month.month()) {
            if !expirations.contains(&expiry) {
                expirations.push(expiry);
            }
        }
    }
    expirations
}
