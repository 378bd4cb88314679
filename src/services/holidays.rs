use std::path::PathBuf;

use jiff::civil::Date;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    models::{holiday::Holiday, store::Store},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddHolidayError {
    #[error("Invalid holiday date '{0}': {1}")]
    InvalidDate(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddHolidayParameters {
    pub date: String,
    pub name: Option<String>,
}

pub fn add_holiday(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddHolidayParameters,
) -> Result<Holiday, AddHolidayError> {
    let date = parameters
        .date
        .parse::<Date>()
        .map_err(|e| AddHolidayError::InvalidDate(parameters.date.clone(), e.to_string()))?;

    let holiday = Holiday {
        date,
        name: parameters.name,
    };
    store.add_holiday(holiday.clone());
    storage.save(store)?;

    Ok(holiday)
}

#[derive(Debug, Error)]
pub enum RemoveHolidayError {
    #[error("Invalid holiday date '{0}': {1}")]
    InvalidDate(String, String),

    #[error("No holiday recorded on {0}")]
    HolidayNotFound(Date),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct RemoveHolidayParameters {
    pub date: String,
}

pub fn remove_holiday(
    store: &mut Store,
    storage: &impl Storage,
    parameters: RemoveHolidayParameters,
) -> Result<Date, RemoveHolidayError> {
    let date = parameters
        .date
        .parse::<Date>()
        .map_err(|e| RemoveHolidayError::InvalidDate(parameters.date.clone(), e.to_string()))?;

    if !store.remove_holiday(date) {
        return Err(RemoveHolidayError::HolidayNotFound(date));
    }
    storage.save(store)?;

    Ok(date)
}

#[derive(Debug, Error)]
pub enum ImportHolidaysError {
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse holiday export '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid holiday date '{0}' in export: {1}")]
    InvalidDate(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct ImportHolidaysParameters {
    pub path: PathBuf,
}

/// One entry of the holiday service's JSON export.
#[derive(Deserialize)]
struct ExportedHoliday {
    holiday_date: String,
    #[serde(default)]
    holiday_name: Option<String>,
}

/// Import a holiday-service JSON export: an array of objects with a
/// `holiday_date` and an optional `holiday_name`. Entries on dates already in
/// the store replace the stored entry. Returns the number of entries read.
pub fn import_holidays(
    store: &mut Store,
    storage: &impl Storage,
    parameters: ImportHolidaysParameters,
) -> Result<usize, ImportHolidaysError> {
    let content = std::fs::read_to_string(&parameters.path).map_err(|e| {
        ImportHolidaysError::ReadFailed {
            path: parameters.path.clone(),
            source: e,
        }
    })?;

    let entries: Vec<ExportedHoliday> =
        serde_json::from_str(&content).map_err(|e| ImportHolidaysError::ParseFailed {
            path: parameters.path.clone(),
            source: e,
        })?;

    let count = entries.len();
    for entry in entries {
        let date = entry.holiday_date.parse::<Date>().map_err(|e| {
            ImportHolidaysError::InvalidDate(entry.holiday_date.clone(), e.to_string())
        })?;
        store.add_holiday(Holiday {
            date,
            name: entry.holiday_name,
        });
    }
    storage.save(store)?;

    Ok(count)
}
