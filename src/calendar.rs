use jiff::civil::{Date, Weekday};

use crate::models::holiday::HolidayCalendar;

/// Check if a date is a working day: not Saturday, not Sunday, and not a
/// public holiday.
pub fn is_working_day(date: Date, holidays: &HolidayCalendar) -> bool {
    if matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) {
        return false;
    }
    !holidays.contains(date)
}

/// Count working days in the closed interval `[start, end]`, both endpoints
/// included when they are working days. `start > end` counts as an empty
/// interval and returns 0.
///
/// Callers wanting an exclusive bound shift `start` or `end` by one day
/// before calling.
pub fn working_days_between(start: Date, end: Date, holidays: &HolidayCalendar) -> i64 {
    let mut count = 0;
    let mut day = start;
    while day <= end {
        if is_working_day(day, holidays) {
            count += 1;
        }
        match day.tomorrow() {
            Ok(next) => day = next,
            Err(_) => break,
        }
    }
    count
}

/// Walk forward from `start` (inclusive) until `workdays` working days have
/// been counted, and return the day the count was reached. The start day
/// itself counts as working day #1 when it is one, so one working day from a
/// working Monday is that same Monday.
///
/// `workdays <= 0` returns `start` unchanged.
pub fn add_working_days(start: Date, workdays: i64, holidays: &HolidayCalendar) -> Date {
    if workdays <= 0 {
        return start;
    }
    let mut day = start;
    let mut counted = 0;
    loop {
        if is_working_day(day, holidays) {
            counted += 1;
            if counted == workdays {
                return day;
            }
        }
        match day.tomorrow() {
            Ok(next) => day = next,
            Err(_) => return day,
        }
    }
}
