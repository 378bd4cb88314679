use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Default, Clone)]
pub struct Task {
    /// UUID to identify the task
    pub id: Uuid,
    /// User-facing auto-incremental task number
    pub task_number: u64,
    /// Title of the risk mitigation task
    pub title: String,
    /// Identifier of the risk this task mitigates
    pub risk_id: Option<u32>,
    /// Number of mitigation plans attached to the risk
    pub mitigation_plans: Option<u32>,
    /// Reference number of the issuing memo
    pub reference_no: Option<String>,
    /// Unit or person that raised the risk
    pub initiator: Option<String>,
    /// Persons in charge of the task
    pub pics: Vec<String>,
    /// Who assigned the task
    pub assigned_by: Option<String>,
    /// Free-form remarks
    pub remarks: Option<String>,
    /// Data completeness progress, 0-100
    pub progress_percent: u8,
    /// Issue date the working-day countdown starts from
    pub issued_on: Option<Date>,
    /// Number of working days allotted
    pub duration_workdays: Option<i64>,
    /// Countdown state: running, frozen, or continued from a pause
    pub schedule: Schedule,
    /// When the task was completed
    pub completed_at: Option<Timestamp>,
    /// When the task was deleted
    pub deleted_at: Option<Timestamp>,
    /// When the task was created
    pub created_at: Timestamp,
    /// When the task was last edited
    pub updated_at: Option<Timestamp>,
}

/// Countdown state of a task.
///
/// Pausing a `Resumed` task re-snapshots the remainder as of the new pause
/// date and discards the old resume date, so every pause/resume cycle behaves
/// like the first one.
#[derive(Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(tag = "type")]
pub enum Schedule {
    /// Countdown runs from the issue date
    #[default]
    Active,
    /// Countdown frozen; `remainder` is the days-remaining snapshot taken at
    /// `paused_on` and may be negative when the task was already overdue
    Paused { remainder: i64, paused_on: Date },
    /// Countdown continues from the preserved remainder as of `resumed_on`
    Resumed { remainder: i64, resumed_on: Date },
}

impl Schedule {
    pub fn is_paused(&self) -> bool {
        matches!(self, Schedule::Paused { .. })
    }
}

impl Task {
    pub fn is_ongoing(&self) -> bool {
        self.completed_at.is_none() && self.deleted_at.is_none()
    }
}
