// job.rs
use crate::errors::{GleanError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Estado del ciclo de vida de un job. Los códigos numéricos son los que se
/// persisten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
  Unknown,
  Pending,
  Queued,
  Running,
  Interrupted,
  Failed,
  Completed,
  Unsatisfactory,
}

impl JobStatus {
  pub fn code(self) -> i32 {
    match self {
      JobStatus::Unknown => 0,
      JobStatus::Pending => 1,
      JobStatus::Queued => 2,
      JobStatus::Running => 3,
      JobStatus::Interrupted => 4,
      JobStatus::Failed => 5,
      JobStatus::Completed => 6,
      JobStatus::Unsatisfactory => 10,
    }
  }

  pub fn from_code(code: i32) -> Result<Self> {
    Ok(match code {
      0 => JobStatus::Unknown,
      1 => JobStatus::Pending,
      2 => JobStatus::Queued,
      3 => JobStatus::Running,
      4 => JobStatus::Interrupted,
      5 => JobStatus::Failed,
      6 => JobStatus::Completed,
      10 => JobStatus::Unsatisfactory,
      other => return Err(GleanError::Validation(format!("código de estado desconocido: {}", other))),
    })
  }

  /// Jobs que todavía no han producido `params.xml`.
  pub fn is_unstarted(self) -> bool {
    matches!(self, JobStatus::Unknown | JobStatus::Pending)
  }
}

/// Job computacional. El gleaning sólo lo lee: nunca cambia su estado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
  pub id: Uuid,
  /// Número visible del job dentro de su proyecto (p.ej. "12" o "12.3").
  pub number: String,
  pub task_name: String,
  /// Directorio de trabajo del job.
  pub directory: PathBuf,
  pub status: JobStatus,
  pub created_at: DateTime<Utc>,
}

impl Job {
  pub fn new(number: impl Into<String>, task_name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
    Self { id: Uuid::new_v4(),
           number: number.into(),
           task_name: task_name.into(),
           directory: directory.into(),
           status: JobStatus::Pending,
           created_at: Utc::now() }
  }

  pub fn with_status(mut self, status: JobStatus) -> Self {
    self.status = status;
    self
  }
}

impl fmt::Display for Job {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Job(number: {}, task: {}, id: {})", self.number, self.task_name, self.id)
  }
}
