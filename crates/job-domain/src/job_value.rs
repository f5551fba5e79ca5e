// job_value.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Nombre deduplicado de un campo de indicador de rendimiento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobValueKey {
  pub name: String,
  pub description: String,
}

impl JobValueKey {
  /// La descripción toma por defecto el propio nombre.
  pub fn named(name: impl Into<String>) -> Self {
    let name = name.into();
    Self { description: name.clone(), name }
  }
}

/// Valor numérico de un indicador para un job. Sólo se añaden registros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFloatValue {
  pub id: Uuid,
  pub job_id: Uuid,
  pub key: String,
  pub value: f64,
  pub created_at: DateTime<Utc>,
}

impl JobFloatValue {
  pub fn new(job_id: Uuid, key: &JobValueKey, value: f64) -> Self {
    Self { id: Uuid::new_v4(), job_id, key: key.name.clone(), value, created_at: Utc::now() }
  }
}

/// Valor textual de un indicador para un job. Sólo se añaden registros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCharValue {
  pub id: Uuid,
  pub job_id: Uuid,
  pub key: String,
  pub value: String,
  pub created_at: DateTime<Utc>,
}

impl JobCharValue {
  pub fn new(job_id: Uuid, key: &JobValueKey, value: impl Into<String>) -> Self {
    Self { id: Uuid::new_v4(), job_id, key: key.name.clone(), value: value.into(), created_at: Utc::now() }
  }
}
