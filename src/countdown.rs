use jiff::ToSpan;
use jiff::civil::Date;

use crate::calendar::{add_working_days, working_days_between};
use crate::models::{
    holiday::HolidayCalendar,
    task::{Schedule, Task},
};

/// Deadline date of a task: its duration in working days counted forward from
/// the issue date. `None` when either field is missing.
pub fn deadline(task: &Task, holidays: &HolidayCalendar) -> Option<Date> {
    let issued_on = task.issued_on?;
    let duration = task.duration_workdays?;
    Some(add_working_days(issued_on, duration, holidays))
}

/// Signed working days remaining until the task's deadline as of `today`.
///
/// `None` when the countdown is undefined (no issue date or no duration).
/// Zero means due today, negative means overdue. For a resumed task the
/// preserved remainder decrements once per elapsed working day since the
/// resume date (the resume day itself does not consume a day) and is clamped
/// at zero.
pub fn remaining_working_days(
    task: &Task,
    today: Date,
    holidays: &HolidayCalendar,
) -> Option<i64> {
    evaluate(task, today, holidays, true)
}

/// Same as [`remaining_working_days`] but without the zero clamp on the
/// resumed branch, so a task that falls overdue again after resuming reports
/// a negative value instead of 0. The clamped variant is the canonical one;
/// this exists for callers that need to see post-resume overdue.
pub fn remaining_working_days_unclamped(
    task: &Task,
    today: Date,
    holidays: &HolidayCalendar,
) -> Option<i64> {
    evaluate(task, today, holidays, false)
}

fn evaluate(task: &Task, today: Date, holidays: &HolidayCalendar, clamp: bool) -> Option<i64> {
    if task.issued_on.is_none() || task.duration_workdays.is_none() {
        return None;
    }

    if let Schedule::Resumed {
        remainder,
        resumed_on,
    } = task.schedule
    {
        // Inclusive count: today == resumed_on gives 1, so the resume day
        // itself costs nothing.
        let elapsed = working_days_between(resumed_on, today, holidays);
        let result = remainder - (elapsed - 1);
        return Some(if clamp { result.max(0) } else { result });
    }

    // Paused tasks land here too: for display purposes their countdown is
    // evaluated as if still running from the issue date.
    let deadline = deadline(task, holidays)?;
    if today == deadline {
        return Some(0);
    }
    if today > deadline {
        // The inclusive counter returns 0 on an inverted interval, so overdue
        // magnitude floors at 1: an overdue task never reads as "0 days".
        let past = working_days_between(deadline.saturating_add(1.day()), today, holidays);
        return Some(-past.max(1));
    }
    Some(working_days_between(
        today.saturating_add(1.day()),
        deadline,
        holidays,
    ))
}

/// Urgency boundaries for the positive countdown range. `critical_max`,
/// `warning_max` and `caution_max` are inclusive upper bounds; values above
/// `caution_max` are `Normal`.
#[derive(Clone, Copy)]
pub struct Thresholds {
    pub critical_max: i64,
    pub warning_max: i64,
    pub caution_max: i64,
}

impl Thresholds {
    /// The partition used by the row display and the dashboard alike.
    pub const CANONICAL: Thresholds = Thresholds {
        critical_max: 2,
        warning_max: 5,
        caution_max: 9,
    };
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::CANONICAL
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Urgency {
    /// Countdown undefined
    None,
    /// Countdown frozen
    Paused,
    Critical,
    Warning,
    Caution,
    Normal,
}

pub struct CountdownDisplay {
    pub text: String,
    pub urgency: Urgency,
}

/// Display tuple for a task's countdown cell.
///
/// A paused task shows its frozen remainder; a negative frozen remainder
/// (already overdue when paused) is called out rather than shown as a number.
pub fn countdown_display(
    task: &Task,
    today: Date,
    holidays: &HolidayCalendar,
    thresholds: Thresholds,
) -> CountdownDisplay {
    if let Schedule::Paused { remainder, .. } = task.schedule {
        let text = if remainder < 0 {
            String::from("Paused (over deadline)")
        } else {
            format!("Paused ({} wd left)", remainder)
        };
        return CountdownDisplay {
            text,
            urgency: Urgency::Paused,
        };
    }

    let days = match remaining_working_days(task, today, holidays) {
        None => {
            return CountdownDisplay {
                text: String::from("—"),
                urgency: Urgency::None,
            };
        }
        Some(days) => days,
    };

    if days < 0 {
        return CountdownDisplay {
            text: String::from("Over deadline"),
            urgency: Urgency::Critical,
        };
    }
    if days == 0 {
        return CountdownDisplay {
            text: String::from("Due today"),
            urgency: Urgency::Critical,
        };
    }

    let urgency = if days <= thresholds.critical_max {
        Urgency::Critical
    } else if days <= thresholds.warning_max {
        Urgency::Warning
    } else if days <= thresholds.caution_max {
        Urgency::Caution
    } else {
        Urgency::Normal
    };

    CountdownDisplay {
        text: format!("{} working days left", days),
        urgency,
    }
}

/// Aggregate bucket for the dashboard charts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bucket {
    Overdue,
    DueWithin2,
    DueWithin5,
    DueWithin9,
    /// Paused, undefined, or more than 9 working days out
    Other,
}

/// Bucket a task by the same countdown the row display uses, so the bucket
/// counts always sum to the number of tasks tallied.
pub fn classify(task: &Task, today: Date, holidays: &HolidayCalendar) -> Bucket {
    if task.schedule.is_paused() {
        return Bucket::Other;
    }
    match remaining_working_days(task, today, holidays) {
        None => Bucket::Other,
        Some(days) if days < 0 => Bucket::Overdue,
        Some(days) if days <= 2 => Bucket::DueWithin2,
        Some(days) if days <= 5 => Bucket::DueWithin5,
        Some(days) if days <= 9 => Bucket::DueWithin9,
        Some(_) => Bucket::Other,
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct BucketCounts {
    pub overdue: usize,
    pub due_0_2: usize,
    pub due_3_5: usize,
    pub due_6_9: usize,
    pub other: usize,
    pub total: usize,
}

pub fn tally<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    today: Date,
    holidays: &HolidayCalendar,
) -> BucketCounts {
    let mut counts = BucketCounts::default();
    for task in tasks {
        match classify(task, today, holidays) {
            Bucket::Overdue => counts.overdue += 1,
            Bucket::DueWithin2 => counts.due_0_2 += 1,
            Bucket::DueWithin5 => counts.due_3_5 += 1,
            Bucket::DueWithin9 => counts.due_6_9 += 1,
            Bucket::Other => counts.other += 1,
        }
        counts.total += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn task(issued_on: Date, duration: i64) -> Task {
        Task {
            issued_on: Some(issued_on),
            duration_workdays: Some(duration),
            ..Task::default()
        }
    }

    #[test]
    fn test_undefined_without_issue_date_or_duration() {
        let holidays = HolidayCalendar::default();
        let today = date(2025, 1, 10);

        let no_issue = Task {
            duration_workdays: Some(5),
            ..Task::default()
        };
        let no_duration = Task {
            issued_on: Some(date(2025, 1, 6)),
            ..Task::default()
        };

        assert_eq!(remaining_working_days(&no_issue, today, &holidays), None);
        assert_eq!(remaining_working_days(&no_duration, today, &holidays), None);
    }

    #[test]
    fn test_five_workdays_from_monday_due_friday() {
        // Scenario A: issued Mon 2025-01-06, 5 working days, no holidays
        let holidays = HolidayCalendar::default();
        let task = task(date(2025, 1, 6), 5);

        assert_eq!(deadline(&task, &holidays), Some(date(2025, 1, 10)));
        // On the deadline itself: due today
        assert_eq!(
            remaining_working_days(&task, date(2025, 1, 10), &holidays),
            Some(0)
        );
        // The Saturday after: overdue, magnitude floors at 1
        assert_eq!(
            remaining_working_days(&task, date(2025, 1, 11), &holidays),
            Some(-1)
        );
        // Two days before the deadline
        assert_eq!(
            remaining_working_days(&task, date(2025, 1, 8), &holidays),
            Some(2)
        );
    }

    #[test]
    fn test_holiday_pushes_deadline_out() {
        // Scenario B: Wednesday 2025-01-08 is a holiday, deadline moves to
        // Monday 2025-01-13
        let holidays = HolidayCalendar::new([date(2025, 1, 8)]);
        let task = task(date(2025, 1, 6), 5);

        assert_eq!(deadline(&task, &holidays), Some(date(2025, 1, 13)));
    }

    #[test]
    fn test_overdue_magnitude_counts_working_days_past_deadline() {
        let holidays = HolidayCalendar::default();
        let task = task(date(2025, 1, 6), 5);

        // Wed Jan 15: Mon 13 + Tue 14 + Wed 15 past the Fri 10 deadline
        assert_eq!(
            remaining_working_days(&task, date(2025, 1, 15), &holidays),
            Some(-3)
        );
    }

    #[test]
    fn test_resumed_remainder_decrements_after_resume_day() {
        // Scenario C: paused with 4 days remaining, resumed Monday, evaluated
        // the following Wednesday (inclusive count of 3): 4 - (3 - 1) = 2
        let holidays = HolidayCalendar::default();
        let task = Task {
            schedule: Schedule::Resumed {
                remainder: 4,
                resumed_on: date(2025, 1, 6),
            },
            ..task(date(2024, 12, 2), 20)
        };

        assert_eq!(
            remaining_working_days(&task, date(2025, 1, 8), &holidays),
            Some(2)
        );
        // The resume day itself consumes nothing
        assert_eq!(
            remaining_working_days(&task, date(2025, 1, 6), &holidays),
            Some(4)
        );
    }

    #[test]
    fn test_resumed_countdown_clamps_at_zero() {
        let holidays = HolidayCalendar::default();
        let task = Task {
            schedule: Schedule::Resumed {
                remainder: 1,
                resumed_on: date(2025, 1, 6),
            },
            ..task(date(2024, 12, 2), 20)
        };
        let later = date(2025, 1, 17);

        assert_eq!(remaining_working_days(&task, later, &holidays), Some(0));
        assert_eq!(
            remaining_working_days_unclamped(&task, later, &holidays),
            Some(-8)
        );
    }

    #[test]
    fn test_paused_task_evaluates_through_normal_branch() {
        let holidays = HolidayCalendar::default();
        let task = Task {
            schedule: Schedule::Paused {
                remainder: 3,
                paused_on: date(2025, 1, 7),
            },
            ..task(date(2025, 1, 6), 5)
        };

        // The frozen remainder does not feed the raw value; the normal branch
        // still reports position relative to the original deadline.
        assert_eq!(
            remaining_working_days(&task, date(2025, 1, 8), &holidays),
            Some(2)
        );
    }

    #[test]
    fn test_display_paused_shows_remainder() {
        let holidays = HolidayCalendar::default();
        let task = Task {
            schedule: Schedule::Paused {
                remainder: 4,
                paused_on: date(2025, 1, 7),
            },
            ..task(date(2025, 1, 6), 10)
        };

        let display = countdown_display(&task, date(2025, 1, 8), &holidays, Thresholds::CANONICAL);
        assert_eq!(display.text, "Paused (4 wd left)");
        assert_eq!(display.urgency, Urgency::Paused);
    }

    #[test]
    fn test_display_paused_over_deadline_is_called_out() {
        // Scenario D: paused while already overdue must show both facts,
        // never a bare number
        let holidays = HolidayCalendar::default();
        let task = Task {
            schedule: Schedule::Paused {
                remainder: -2,
                paused_on: date(2025, 1, 14),
            },
            ..task(date(2025, 1, 6), 5)
        };

        let display = countdown_display(&task, date(2025, 1, 15), &holidays, Thresholds::CANONICAL);
        assert_eq!(display.text, "Paused (over deadline)");
        assert_eq!(display.urgency, Urgency::Paused);
    }

    #[test]
    fn test_display_text_and_urgency_mapping() {
        let holidays = HolidayCalendar::default();
        let thresholds = Thresholds::CANONICAL;
        let today = date(2025, 1, 6);

        let undefined = Task::default();
        let display = countdown_display(&undefined, today, &holidays, thresholds);
        assert_eq!(display.text, "—");
        assert_eq!(display.urgency, Urgency::None);

        let cases = [
            (date(2024, 12, 20), 5, "Over deadline", Urgency::Critical),
            (date(2025, 1, 6), 1, "Due today", Urgency::Critical),
            (date(2025, 1, 6), 3, "2 working days left", Urgency::Critical),
            (date(2025, 1, 6), 5, "4 working days left", Urgency::Warning),
            (date(2025, 1, 6), 10, "9 working days left", Urgency::Caution),
            (date(2025, 1, 6), 15, "14 working days left", Urgency::Normal),
        ];
        for (issued, duration, text, urgency) in cases {
            let display = countdown_display(&task(issued, duration), today, &holidays, thresholds);
            assert_eq!(display.text, text);
            assert_eq!(display.urgency, urgency);
        }
    }

    #[test]
    fn test_custom_thresholds_move_the_boundaries() {
        let holidays = HolidayCalendar::default();
        let tight = Thresholds {
            critical_max: 3,
            warning_max: 6,
            caution_max: 9,
        };
        let today = date(2025, 1, 6);

        // 3 days left: Warning under the canonical partition, Critical here
        let display = countdown_display(&task(date(2025, 1, 6), 4), today, &holidays, tight);
        assert_eq!(display.urgency, Urgency::Critical);
        let display = countdown_display(&task(date(2025, 1, 6), 7), today, &holidays, tight);
        assert_eq!(display.urgency, Urgency::Warning);
    }

    #[test]
    fn test_bucket_counts_sum_to_total() {
        let holidays = HolidayCalendar::new([date(2025, 1, 8)]);
        let today = date(2025, 1, 6);

        let tasks = vec![
            task(date(2024, 12, 2), 5),  // long overdue
            task(date(2025, 1, 6), 1),   // due today
            task(date(2025, 1, 6), 4),   // 3 days left
            task(date(2025, 1, 6), 8),   // 7 days left
            task(date(2025, 1, 6), 30),  // far out
            Task::default(),             // undefined
            Task {
                schedule: Schedule::Paused {
                    remainder: 2,
                    paused_on: date(2025, 1, 3),
                },
                ..task(date(2024, 12, 16), 15)
            },
        ];

        let counts = tally(tasks.iter(), today, &holidays);
        assert_eq!(counts.overdue, 1);
        assert_eq!(counts.due_0_2, 1);
        assert_eq!(counts.due_3_5, 1);
        assert_eq!(counts.due_6_9, 1);
        assert_eq!(counts.other, 3);
        assert_eq!(counts.total, tasks.len());
        assert_eq!(
            counts.overdue + counts.due_0_2 + counts.due_3_5 + counts.due_6_9 + counts.other,
            counts.total
        );
    }

    #[test]
    fn test_classify_matches_row_countdown() {
        let holidays = HolidayCalendar::default();
        let today = date(2025, 1, 6);
        let task = task(date(2025, 1, 6), 3);

        assert_eq!(remaining_working_days(&task, today, &holidays), Some(2));
        assert_eq!(classify(&task, today, &holidays), Bucket::DueWithin2);
    }
}
