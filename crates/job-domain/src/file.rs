// file.rs
use crate::errors::{GleanError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Categoría de directorio de los ficheros producidos en el directorio del
/// propio job.
pub const JOB_DIRECTORY: i32 = 1;

/// Tipo de fichero usado cuando la clasificación no es informativa.
pub const UNKNOWN_FILE_TYPE: &str = "Unknown";

/// Relación de un fichero con un job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// Producido por el job.
  Out,
  /// Consumido por el job.
  In,
}

impl Role {
  pub fn code(self) -> i32 {
    match self {
      Role::Out => 0,
      Role::In => 1,
    }
  }

  pub fn from_code(code: i32) -> Result<Self> {
    match code {
      0 => Ok(Role::Out),
      1 => Ok(Role::In),
      other => Err(GleanError::Validation(format!("código de rol desconocido: {}", other))),
    }
  }
}

impl FromStr for Role {
  type Err = GleanError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "in" | "1" => Ok(Role::In),
      "out" | "0" => Ok(Role::Out),
      other => Err(GleanError::Validation(format!("rol desconocido: '{}'", other))),
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Role::Out => write!(f, "OUT"),
      Role::In => write!(f, "IN"),
    }
  }
}

/// Vocabulario cerrado de clasificaciones de fichero (mime normalizado).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileType {
  pub name: String,
  pub description: String,
}

impl FileType {
  pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
    Self { name: name.into(), description: description.into() }
  }
}

/// Artefacto concreto producido o consumido por un job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
  pub id: Uuid,
  pub name: Option<String>,
  pub annotation: Option<String>,
  /// Nombre del `FileType`.
  pub file_type: String,
  pub sub_type: Option<i32>,
  pub content: Option<i32>,
  pub job_id: Uuid,
  pub directory: i32,
  /// Identidad canónica del parámetro bajo el que se descubrió.
  pub job_param_name: String,
  pub created_at: DateTime<Utc>,
}

impl File {
  pub fn key(&self) -> FileKey {
    FileKey::new(self.job_id, self.directory, self.name.as_deref(), &self.job_param_name)
  }
}

/// Clave de unicidad de `File`: (job, directorio, nombre, parámetro).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey {
  pub job_id: Uuid,
  pub directory: i32,
  pub name: Option<String>,
  pub job_param_name: String,
}

impl FileKey {
  /// Un nombre vacío equivale a no tener nombre, igual que en el índice único
  /// (`COALESCE(name, '')`).
  pub fn new(job_id: Uuid, directory: i32, name: Option<&str>, job_param_name: &str) -> Self {
    FileKey { job_id,
              directory,
              name: name.filter(|n| !n.is_empty()).map(str::to_string),
              job_param_name: job_param_name.to_string() }
  }
}

/// Datos para crear un `File`; el id y la fecha los genera el repositorio.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFile {
  pub name: Option<String>,
  pub annotation: Option<String>,
  pub file_type: String,
  pub sub_type: Option<i32>,
  pub content: Option<i32>,
  pub job_id: Uuid,
  pub directory: i32,
  pub job_param_name: String,
}

impl NewFile {
  pub fn key(&self) -> FileKey {
    FileKey::new(self.job_id, self.directory, self.name.as_deref(), &self.job_param_name)
  }

  pub fn into_file(self) -> File {
    File { id: Uuid::new_v4(),
           name: self.name,
           annotation: self.annotation,
           file_type: self.file_type,
           sub_type: self.sub_type,
           content: self.content,
           job_id: self.job_id,
           directory: self.directory,
           job_param_name: self.job_param_name,
           created_at: Utc::now() }
  }
}

/// Uso de un fichero existente por un job en un rol dado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUse {
  pub id: Uuid,
  pub file_id: Uuid,
  pub job_id: Uuid,
  pub role: Role,
  pub job_param_name: String,
  pub created_at: DateTime<Utc>,
}

/// Datos para crear un `FileUse`. La unicidad es (fichero, job, rol): el
/// nombre de parámetro no participa.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFileUse {
  pub file_id: Uuid,
  pub job_id: Uuid,
  pub role: Role,
  pub job_param_name: String,
}

impl NewFileUse {
  pub fn into_file_use(self) -> FileUse {
    FileUse { id: Uuid::new_v4(),
              file_id: self.file_id,
              job_id: self.job_id,
              role: self.role,
              job_param_name: self.job_param_name,
              created_at: Utc::now() }
  }
}
