//! Crate `job-params`: árbol de parámetros de un job y utilidades de
//! recorrido.
//!
//! Este crate define el modelo tipado del contenedor de parámetros de un job
//! (`JobContainer` con secciones `inputData`, `outputData` y
//! `controlParameters`), los nodos que lo componen (`ParamNode`: contenedor,
//! lista, fichero, indicador de rendimiento o escalar), el recorrido genérico
//! (`find_objects` / `find_objects_mut`) y la resolución de identidad
//! canónica de un parámetro a partir de su ruta (`param_identity`).
//!
//! Diseño resumido:
//! - Los nodos son un enum etiquetado; el recorrido despacha por variante en
//!   lugar de sondear atributos en tiempo de ejecución.
//! - Los atributos opcionales (subtipo, contenido, anotación, nombre) son
//!   `Option<_>`: ausencia significa "no definido", nunca cero.
//! - Las rutas se calculan durante el recorrido (`outputData.xyzout[1].file`)
//!   y no se guardan en el nodo.
//!
//! Ejemplo rápido:
//! ```rust
//! use job_params::{param_identity, DataFile, JobContainer, ParamNode};
//! let mut container = JobContainer::new();
//! container.output_data.push(ParamNode::File(DataFile::new("XYZOUT")));
//! let found = job_params::data_files(&container.output_data);
//! assert_eq!(found[0].path, "outputData.XYZOUT");
//! assert_eq!(param_identity(&found[0].path), "XYZOUT");
//! ```
pub mod errors;
pub mod identity;
pub mod tree;
pub mod walker;

pub use errors::*;
pub use identity::*;
pub use tree::*;
pub use walker::*;
