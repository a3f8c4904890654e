use chrono::{Datelike, NaiveDate};

/// Every calendar date of the given month, ascending. Empty for an invalid
/// year/month pair.
pub fn month_dates(year: i32, month: u32) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return out;
    };
    let mut day = first;
    while day.month() == month {
        out.push(day);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    out
}

/// Calendar successor of a month, carrying the year over December.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}
