use std::collections::HashMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    holiday::{Holiday, HolidayCalendar},
    task::Task,
};

/// Current schema version
pub const CURRENT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
pub struct Store {
    pub version: u32,
    pub tasks: HashMap<Uuid, Task>,
    pub holidays: Vec<Holiday>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            tasks: HashMap::new(),
            holidays: vec![],
        }
    }
}

impl Store {
    /// Adds a task, assigning the next user-facing task number.
    pub fn add_task(&mut self, mut task: Task) {
        let next_number = self
            .tasks
            .values()
            .map(|t| t.task_number)
            .max()
            .unwrap_or(0)
            + 1;
        task.task_number = next_number;
        self.tasks.insert(task.id, task);
    }

    pub fn get_task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn get_task_by_number(&self, task_number: u64) -> Option<&Task> {
        self.tasks.values().find(|t| t.task_number == task_number)
    }

    /// Tasks that have not been deleted
    pub fn get_active_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values().filter(|t| t.deleted_at.is_none())
    }

    /// Tasks that are neither completed nor deleted
    pub fn get_ongoing_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values().filter(|t| t.is_ongoing())
    }

    pub fn get_completed_tasks(&self) -> impl Iterator<Item = &Task> {
        self.get_active_tasks().filter(|t| t.completed_at.is_some())
    }

    pub fn get_deleted_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values().filter(|t| t.deleted_at.is_some())
    }

    /// Inserts a holiday, replacing any existing entry on the same date.
    /// The list is kept sorted by date.
    pub fn add_holiday(&mut self, holiday: Holiday) {
        self.holidays.retain(|h| h.date != holiday.date);
        self.holidays.push(holiday);
        self.holidays.sort_by_key(|h| h.date);
    }

    /// Removes the holiday on `date`, returning whether one existed.
    pub fn remove_holiday(&mut self, date: Date) -> bool {
        let before = self.holidays.len();
        self.holidays.retain(|h| h.date != date);
        self.holidays.len() != before
    }

    pub fn holidays_in_year(&self, year: i16) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter().filter(move |h| h.date.year() == year)
    }

    /// Lookup calendar over every stored holiday, for the countdown engine.
    pub fn holiday_calendar(&self) -> HolidayCalendar {
        self.holidays.iter().map(|h| h.date).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_add_task_assigns_sequential_numbers() {
        let mut store = Store::default();
        store.add_task(Task::default());
        store.add_task(Task {
            id: Uuid::new_v4(),
            ..Task::default()
        });

        let mut numbers: Vec<u64> = store.tasks.values().map(|t| t.task_number).collect();
        numbers.sort();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_add_holiday_replaces_same_date() {
        let mut store = Store::default();
        store.add_holiday(Holiday {
            date: date(2025, 1, 1),
            name: Some(String::from("New Year")),
        });
        store.add_holiday(Holiday {
            date: date(2025, 1, 1),
            name: Some(String::from("New Year's Day")),
        });

        assert_eq!(store.holidays.len(), 1);
        assert_eq!(store.holidays[0].name.as_deref(), Some("New Year's Day"));
    }

    #[test]
    fn test_remove_holiday() {
        let mut store = Store::default();
        store.add_holiday(Holiday {
            date: date(2025, 3, 31),
            name: None,
        });

        assert!(store.remove_holiday(date(2025, 3, 31)));
        assert!(!store.remove_holiday(date(2025, 3, 31)));
        assert!(store.holiday_calendar().is_empty());
    }
}
