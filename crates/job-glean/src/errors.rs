// Archivo: errors.rs
// Propósito: errores del gleaning y registro de fallos por nodo.
use job_domain::GleanError;
use job_params::ParamsError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errores que abortan una llamada de gleaning o de carga de contenedor.
///
/// Los fallos de un nodo concreto no abortan el lote: se registran como
/// [`NodeFailure`] en el resumen.
#[derive(Error, Debug)]
pub enum GleanFailure {
    /// Error del repositorio o del dominio (job inexistente, BD, ...).
    #[error(transparent)]
    Domain(#[from] GleanError),
    /// Error al leer o interpretar un fichero de parámetros.
    #[error(transparent)]
    Params(#[from] ParamsError),
    /// La tarea del job no tiene definición registrada.
    #[error("Tarea sin definición registrada: {0}")]
    UnknownTask(String),
    /// Configuración inválida en el entorno.
    #[error("Configuración inválida: {0}")]
    Config(String),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, GleanFailure>;

/// Fase del gleaning en la que falló un nodo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Materialize,
    Link,
    Harvest,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Materialize => "materialize",
            Stage::Link => "link",
            Stage::Harvest => "harvest",
        };
        f.write_str(s)
    }
}

/// Fallo aislado de un nodo: fase, ruta del nodo y mensaje.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeFailure {
    pub stage: Stage,
    pub path: String,
    pub message: String,
}

impl NodeFailure {
    pub fn new(stage: Stage, path: impl Into<String>, error: impl fmt::Display) -> Self {
        Self { stage,
               path: path.into(),
               message: error.to_string() }
    }
}

impl fmt::Display for NodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.stage, self.path, self.message)
    }
}
