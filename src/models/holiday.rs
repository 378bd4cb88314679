use std::collections::BTreeSet;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A public holiday kept in the store, one entry per calendar date.
#[derive(Serialize, Deserialize, Clone)]
pub struct Holiday {
    pub date: Date,
    pub name: Option<String>,
}

/// Lookup set of holiday dates handed to the calendar calculator.
///
/// An empty calendar is valid: every non-weekend day is then a working day.
#[derive(Default, Clone)]
pub struct HolidayCalendar {
    dates: BTreeSet<Date>,
}

impl HolidayCalendar {
    pub fn new(dates: impl IntoIterator<Item = Date>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.dates.contains(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<Date> for HolidayCalendar {
    fn from_iter<I: IntoIterator<Item = Date>>(iter: I) -> Self {
        Self::new(iter)
    }
}
