// Archivo: errors.rs
// Propósito: errores al construir o cargar árboles de parámetros y el alias
// Result<T> usado por las APIs del crate.
use thiserror::Error;

/// Errores del modelo de parámetros.
///
/// - `NotFound`: fichero o nodo inexistente.
/// - `Io`: error de lectura del fichero de parámetros.
/// - `Serialization`: contenido no deserializable.
/// - `Validation`: estructura inválida (por ejemplo secciones mezcladas).
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("No encontrado: {0}")]
    NotFound(String),
    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Error de validación: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ParamsError>;
