//! Crate `job-glean`: reconciliación del árbol de parámetros de un job con
//! el repositorio de procedencia.
//!
//! Tres pasos, todos tolerantes a fallos por nodo:
//! - `files`: registra como `File` las salidas que existen en disco.
//! - `file_uses`: enlaza las entradas con `File` ya registrados (`FileUse`).
//! - `indicators`: guarda los indicadores de rendimiento como valores.
//!
//! `JobGleaner` orquesta los tres; `ContainerLoader` construye el contenedor
//! a partir de la definición de la tarea y del fichero de parámetros.
pub mod config;
pub mod container;
pub mod errors;
pub mod file_uses;
pub mod files;
pub mod gleaner;
pub mod indicators;
pub mod summary;

pub use config::GleanConfig;
pub use container::{ContainerLoader, JsonParamsReader, ParamsFiles, ParamsReader, TaskRegistry};
pub use errors::{GleanFailure, NodeFailure, Result, Stage};
pub use gleaner::JobGleaner;
pub use summary::GleanSummary;
