use jiff::civil::Date;
use thiserror::Error;

use crate::{
    countdown,
    models::{holiday::HolidayCalendar, store::Store, task::Schedule, task::Task},
    services::{TaskLookupError, find_task},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum PauseTaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Task '{0}' is already paused")]
    TaskAlreadyPaused(String),

    #[error("Task '{0}' is completed; its countdown cannot be paused")]
    TaskCompleted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct PauseTaskParameters {
    pub task_number_or_fuzzy_name: String,
    /// Backdated pause date; the countdown freezes as of this day
    pub paused_on: Option<Date>,
    pub today: Date,
}

/// Freeze a task's countdown, snapshotting the working days remaining as of
/// the effective pause date. The snapshot uses the same evaluator every
/// display path uses, so a task paused while overdue stores a negative
/// remainder. A task whose countdown is undefined freezes at 0.
pub fn pause_task(
    store: &mut Store,
    storage: &impl Storage,
    holidays: &HolidayCalendar,
    parameters: PauseTaskParameters,
) -> Result<Task, PauseTaskError> {
    let task = find_task(store, &parameters.task_number_or_fuzzy_name)?;

    if task.schedule.is_paused() {
        return Err(PauseTaskError::TaskAlreadyPaused(task.title.clone()));
    }
    if task.completed_at.is_some() {
        return Err(PauseTaskError::TaskCompleted(task.title.clone()));
    }

    let paused_on = parameters.paused_on.unwrap_or(parameters.today);
    let remainder = countdown::remaining_working_days(task, paused_on, holidays).unwrap_or(0);

    // Pausing a resumed task discards its resume date; the fresh snapshot is
    // all the next cycle needs.
    let mut updated_task = task.clone();
    updated_task.schedule = Schedule::Paused {
        remainder,
        paused_on,
    };
    updated_task.updated_at = Some(jiff::Timestamp::now());

    store.tasks.insert(updated_task.id, updated_task.clone());
    storage.save(store)?;

    Ok(updated_task)
}

#[derive(Debug, Error)]
pub enum ResumeTaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Task '{0}' is not paused")]
    TaskNotPaused(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct ResumeTaskParameters {
    pub task_number_or_fuzzy_name: String,
    /// Backdated resume date; the countdown continues from this day
    pub resumed_on: Option<Date>,
    pub today: Date,
}

/// Continue a paused task's countdown from its preserved remainder. The
/// remainder starts decrementing the working day after the resume date.
pub fn resume_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: ResumeTaskParameters,
) -> Result<Task, ResumeTaskError> {
    let task = find_task(store, &parameters.task_number_or_fuzzy_name)?;

    let Schedule::Paused { remainder, .. } = task.schedule else {
        return Err(ResumeTaskError::TaskNotPaused(task.title.clone()));
    };

    let resumed_on = parameters.resumed_on.unwrap_or(parameters.today);

    let mut updated_task = task.clone();
    updated_task.schedule = Schedule::Resumed {
        remainder,
        resumed_on,
    };
    updated_task.updated_at = Some(jiff::Timestamp::now());

    store.tasks.insert(updated_task.id, updated_task.clone());
    storage.save(store)?;

    Ok(updated_task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::NullStorage;
    use jiff::civil::date;

    fn seeded_store() -> Store {
        let mut store = Store::default();
        store.add_task(Task {
            title: String::from("Data center fire drill"),
            issued_on: Some(date(2025, 1, 6)),
            duration_workdays: Some(5),
            ..Task::default()
        });
        store
    }

    #[test]
    fn test_pause_snapshots_remainder_as_of_today() {
        let mut store = seeded_store();
        let holidays = HolidayCalendar::default();

        // Deadline is Fri Jan 10; pausing on Wed Jan 8 leaves Thu + Fri
        let paused = pause_task(
            &mut store,
            &NullStorage,
            &holidays,
            PauseTaskParameters {
                task_number_or_fuzzy_name: String::from("1"),
                paused_on: None,
                today: date(2025, 1, 8),
            },
        )
        .unwrap();

        assert_eq!(
            paused.schedule,
            Schedule::Paused {
                remainder: 2,
                paused_on: date(2025, 1, 8),
            }
        );
    }

    #[test]
    fn test_pause_with_backdated_date_uses_that_date() {
        let mut store = seeded_store();
        let holidays = HolidayCalendar::default();

        let paused = pause_task(
            &mut store,
            &NullStorage,
            &holidays,
            PauseTaskParameters {
                task_number_or_fuzzy_name: String::from("1"),
                paused_on: Some(date(2025, 1, 7)),
                today: date(2025, 1, 9),
            },
        )
        .unwrap();

        assert_eq!(
            paused.schedule,
            Schedule::Paused {
                remainder: 3,
                paused_on: date(2025, 1, 7),
            }
        );
    }

    #[test]
    fn test_pause_while_overdue_keeps_negative_remainder() {
        let mut store = seeded_store();
        let holidays = HolidayCalendar::default();

        let paused = pause_task(
            &mut store,
            &NullStorage,
            &holidays,
            PauseTaskParameters {
                task_number_or_fuzzy_name: String::from("1"),
                paused_on: None,
                today: date(2025, 1, 14),
            },
        )
        .unwrap();

        // Mon 13 + Tue 14 past the Fri 10 deadline
        assert_eq!(
            paused.schedule,
            Schedule::Paused {
                remainder: -2,
                paused_on: date(2025, 1, 14),
            }
        );
    }

    #[test]
    fn test_pause_twice_is_an_error() {
        let mut store = seeded_store();
        let holidays = HolidayCalendar::default();
        let params = || PauseTaskParameters {
            task_number_or_fuzzy_name: String::from("1"),
            paused_on: None,
            today: date(2025, 1, 8),
        };

        pause_task(&mut store, &NullStorage, &holidays, params()).unwrap();
        let again = pause_task(&mut store, &NullStorage, &holidays, params());
        assert!(matches!(again, Err(PauseTaskError::TaskAlreadyPaused(_))));
    }

    #[test]
    fn test_resume_carries_remainder_and_sets_resume_date() {
        let mut store = seeded_store();
        let holidays = HolidayCalendar::default();

        pause_task(
            &mut store,
            &NullStorage,
            &holidays,
            PauseTaskParameters {
                task_number_or_fuzzy_name: String::from("1"),
                paused_on: None,
                today: date(2025, 1, 7),
            },
        )
        .unwrap();

        let resumed = resume_task(
            &mut store,
            &NullStorage,
            ResumeTaskParameters {
                task_number_or_fuzzy_name: String::from("1"),
                resumed_on: None,
                today: date(2025, 2, 3),
            },
        )
        .unwrap();

        assert_eq!(
            resumed.schedule,
            Schedule::Resumed {
                remainder: 3,
                resumed_on: date(2025, 2, 3),
            }
        );
    }

    #[test]
    fn test_resume_active_task_is_an_error() {
        let mut store = seeded_store();

        let result = resume_task(
            &mut store,
            &NullStorage,
            ResumeTaskParameters {
                task_number_or_fuzzy_name: String::from("1"),
                resumed_on: None,
                today: date(2025, 1, 8),
            },
        );
        assert!(matches!(result, Err(ResumeTaskError::TaskNotPaused(_))));
    }

    #[test]
    fn test_second_pause_resnapshots_remainder() {
        let mut store = seeded_store();
        let holidays = HolidayCalendar::default();

        // Pause Tue Jan 7 (3 left), resume Mon Jan 13
        pause_task(
            &mut store,
            &NullStorage,
            &holidays,
            PauseTaskParameters {
                task_number_or_fuzzy_name: String::from("1"),
                paused_on: None,
                today: date(2025, 1, 7),
            },
        )
        .unwrap();
        resume_task(
            &mut store,
            &NullStorage,
            ResumeTaskParameters {
                task_number_or_fuzzy_name: String::from("1"),
                resumed_on: None,
                today: date(2025, 1, 13),
            },
        )
        .unwrap();

        // Pausing again on Wed Jan 15 snapshots through the resumed branch:
        // 3 - (3 - 1) = 1, and the old resume date is gone
        let paused = pause_task(
            &mut store,
            &NullStorage,
            &holidays,
            PauseTaskParameters {
                task_number_or_fuzzy_name: String::from("1"),
                paused_on: None,
                today: date(2025, 1, 15),
            },
        )
        .unwrap();

        assert_eq!(
            paused.schedule,
            Schedule::Paused {
                remainder: 1,
                paused_on: date(2025, 1, 15),
            }
        );
    }
}
