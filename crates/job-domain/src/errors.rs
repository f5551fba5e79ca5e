// errors.rs
use thiserror::Error;

/// Errores del dominio de gleaning.
///
/// - `NotFound`: job, fichero o tipo de fichero inexistente.
/// - `Validation`: datos que violan un invariante (código de rol inválido,
///   referencia a un job inexistente, ...).
/// - `Storage`: fallo del almacenamiento subyacente (BD, pool, mutex).
/// - `Serialization`: fallo de (de)serialización.
#[derive(Debug, Error, Clone)]
pub enum GleanError {
  #[error("No encontrado: {0}")]
  NotFound(String),
  #[error("Error de validación: {0}")]
  Validation(String),
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
  #[error("Error de serialización: {0}")]
  Serialization(String),
}

impl From<serde_json::Error> for GleanError {
  fn from(e: serde_json::Error) -> Self {
    Self::Serialization(e.to_string())
  }
}

impl From<uuid::Error> for GleanError {
  fn from(e: uuid::Error) -> Self {
    Self::Validation(format!("uuid inválido: {}", e))
  }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, GleanError>;
