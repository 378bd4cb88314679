use jiff::civil::Date;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{store::Store, task::Task},
    services::{TaskLookupError, find_task},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddTaskError {
    #[error("Invalid issue date '{0}': {1}")]
    InvalidIssueDate(String, String),

    #[error("Invalid progress value {0}: must be between 0 and 100")]
    InvalidProgress(u8),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddTaskParameters {
    pub title: String,
    pub risk_id: Option<u32>,
    pub mitigation_plans: Option<u32>,
    pub reference_no: Option<String>,
    pub initiator: Option<String>,
    pub pics: Vec<String>,
    pub assigned_by: Option<String>,
    pub remarks: Option<String>,
    pub issued_on: Option<String>,
    pub duration_workdays: Option<i64>,
    pub progress_percent: u8,
}

pub fn add_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddTaskParameters,
) -> Result<Task, AddTaskError> {
    // 1. Parse the issue date if provided
    let issued_on = if let Some(date_str) = parameters.issued_on {
        Some(
            date_str
                .parse::<Date>()
                .map_err(|e| AddTaskError::InvalidIssueDate(date_str.clone(), e.to_string()))?,
        )
    } else {
        None
    };

    if parameters.progress_percent > 100 {
        return Err(AddTaskError::InvalidProgress(parameters.progress_percent));
    }

    // 2. Create the task (task_number will be assigned by store.add_task)
    let task = Task {
        id: Uuid::new_v4(),
        task_number: 0,
        title: parameters.title,
        risk_id: parameters.risk_id,
        mitigation_plans: parameters.mitigation_plans,
        reference_no: parameters.reference_no,
        initiator: parameters.initiator,
        pics: parameters.pics.into_iter().filter(|p| !p.is_empty()).collect(),
        assigned_by: parameters.assigned_by,
        remarks: parameters.remarks,
        progress_percent: parameters.progress_percent,
        issued_on,
        duration_workdays: parameters.duration_workdays,
        schedule: Default::default(),
        completed_at: None,
        deleted_at: None,
        created_at: jiff::Timestamp::now(),
        updated_at: None,
    };

    let task_id = task.id;

    // 3. Add to store (assigns task_number) and persist
    store.add_task(task);
    storage.save(store)?;

    Ok(store.get_task(task_id).unwrap().clone())
}

#[derive(Debug, Error)]
pub enum UpdateTaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Invalid issue date '{0}': {1}")]
    InvalidIssueDate(String, String),

    #[error("Invalid progress value {0}: must be between 0 and 100")]
    InvalidProgress(u8),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Default)]
pub struct UpdateTaskParameters {
    pub task_number_or_fuzzy_name: String,
    pub title: Option<String>,
    pub risk_id: Option<u32>,
    pub mitigation_plans: Option<u32>,
    pub reference_no: Option<String>,
    pub initiator: Option<String>,
    pub pics: Vec<String>,
    pub assigned_by: Option<String>,
    pub remarks: Option<String>,
    pub issued_on: Option<String>,
    pub duration_workdays: Option<i64>,
    pub progress_percent: Option<u8>,
}

pub fn update_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: UpdateTaskParameters,
) -> Result<Task, UpdateTaskError> {
    let issued_on = if let Some(date_str) = parameters.issued_on {
        Some(
            date_str
                .parse::<Date>()
                .map_err(|e| UpdateTaskError::InvalidIssueDate(date_str.clone(), e.to_string()))?,
        )
    } else {
        None
    };

    if let Some(progress) = parameters.progress_percent
        && progress > 100
    {
        return Err(UpdateTaskError::InvalidProgress(progress));
    }

    let task = find_task(store, &parameters.task_number_or_fuzzy_name)?;

    let mut updated_task = task.clone();
    if let Some(title) = parameters.title {
        updated_task.title = title;
    }
    if parameters.risk_id.is_some() {
        updated_task.risk_id = parameters.risk_id;
    }
    if parameters.mitigation_plans.is_some() {
        updated_task.mitigation_plans = parameters.mitigation_plans;
    }
    if parameters.reference_no.is_some() {
        updated_task.reference_no = parameters.reference_no;
    }
    if parameters.initiator.is_some() {
        updated_task.initiator = parameters.initiator;
    }
    if !parameters.pics.is_empty() {
        updated_task.pics = parameters.pics.into_iter().filter(|p| !p.is_empty()).collect();
    }
    if parameters.assigned_by.is_some() {
        updated_task.assigned_by = parameters.assigned_by;
    }
    if parameters.remarks.is_some() {
        updated_task.remarks = parameters.remarks;
    }
    if issued_on.is_some() {
        updated_task.issued_on = issued_on;
    }
    if parameters.duration_workdays.is_some() {
        updated_task.duration_workdays = parameters.duration_workdays;
    }
    if let Some(progress) = parameters.progress_percent {
        updated_task.progress_percent = progress;
    }
    updated_task.updated_at = Some(jiff::Timestamp::now());

    store.tasks.insert(updated_task.id, updated_task.clone());
    storage.save(store)?;

    Ok(updated_task)
}

#[derive(Debug, Error)]
pub enum CompleteTaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Task '{0}' is already completed")]
    TaskAlreadyCompleted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct CompleteTaskParameters {
    pub task_number_or_fuzzy_name: String,
}

pub fn complete_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CompleteTaskParameters,
) -> Result<Task, CompleteTaskError> {
    let task = find_task(store, &parameters.task_number_or_fuzzy_name)?;

    if task.completed_at.is_some() {
        return Err(CompleteTaskError::TaskAlreadyCompleted(task.title.clone()));
    }

    let mut updated_task = task.clone();
    updated_task.completed_at = Some(jiff::Timestamp::now());
    updated_task.updated_at = Some(jiff::Timestamp::now());

    store.tasks.insert(updated_task.id, updated_task.clone());
    storage.save(store)?;

    Ok(updated_task)
}

#[derive(Debug, Error)]
pub enum ReopenTaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Task '{0}' is not completed")]
    TaskNotCompleted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct ReopenTaskParameters {
    pub task_number_or_fuzzy_name: String,
}

pub fn reopen_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: ReopenTaskParameters,
) -> Result<Task, ReopenTaskError> {
    let task = find_task(store, &parameters.task_number_or_fuzzy_name)?;

    if task.completed_at.is_none() {
        return Err(ReopenTaskError::TaskNotCompleted(task.title.clone()));
    }

    let mut updated_task = task.clone();
    updated_task.completed_at = None;
    updated_task.updated_at = Some(jiff::Timestamp::now());

    store.tasks.insert(updated_task.id, updated_task.clone());
    storage.save(store)?;

    Ok(updated_task)
}

#[derive(Debug, Error)]
pub enum DeleteTaskError {
    #[error(transparent)]
    Lookup(#[from] TaskLookupError),

    #[error("Task '{0}' is already deleted")]
    TaskAlreadyDeleted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteTaskParameters {
    pub task_number_or_fuzzy_name: String,
}

pub fn delete_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: DeleteTaskParameters,
) -> Result<Task, DeleteTaskError> {
    let task = find_task(store, &parameters.task_number_or_fuzzy_name)?;

    if task.deleted_at.is_some() {
        return Err(DeleteTaskError::TaskAlreadyDeleted(task.title.clone()));
    }

    let task_id = task.id;
    let mut updated_task = task.clone();
    updated_task.deleted_at = Some(jiff::Timestamp::now());

    store.tasks.insert(task_id, updated_task.clone());
    storage.save(store)?;

    Ok(updated_task)
}

#[derive(Debug, Error)]
pub enum RestoreTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Task '{0}' is not deleted")]
    TaskNotDeleted(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct RestoreTaskParameters {
    pub task_number: u64,
}

pub fn restore_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: RestoreTaskParameters,
) -> Result<Task, RestoreTaskError> {
    let task = store
        .get_task_by_number(parameters.task_number)
        .ok_or_else(|| RestoreTaskError::TaskNotFound(parameters.task_number.to_string()))?;

    if task.deleted_at.is_none() {
        return Err(RestoreTaskError::TaskNotDeleted(task.title.clone()));
    }

    let task_id = task.id;
    let mut restored_task = task.clone();
    restored_task.deleted_at = None;

    store.tasks.insert(task_id, restored_task.clone());
    storage.save(store)?;

    Ok(restored_task)
}
