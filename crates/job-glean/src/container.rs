// Archivo: container.rs
// Propósito: construir el contenedor de parámetros de un job a partir de la
// definición de su tarea y del fichero de parámetros guardado en disco.
//
// El fichero preferido es el de parámetros finales; el de entrada es la
// alternativa. Para jobs que aún no han arrancado (UNKNOWN o PENDING) el
// orden se invierte, porque todavía no existe el fichero final.
use crate::errors::{GleanFailure, Result};
use job_domain::{Job, JobStatus};
use job_params::JobContainer;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Caché de definiciones de tarea, inyectada en el cargador.
#[derive(Default)]
pub struct TaskRegistry {
    definitions: RwLock<HashMap<String, JobContainer>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, task_name: impl Into<String>, definition: JobContainer) -> Result<()> {
        let mut defs = self.definitions
                           .write()
                           .map_err(|e| GleanFailure::Config(format!("registry poisoned: {:?}", e)))?;
        defs.insert(task_name.into(), definition);
        Ok(())
    }

    /// Copia de la definición de `task_name`, lista para superponer datos.
    pub fn definition(&self, task_name: &str) -> Result<Option<JobContainer>> {
        let defs = self.definitions
                       .read()
                       .map_err(|e| GleanFailure::Config(format!("registry poisoned: {:?}", e)))?;
        Ok(defs.get(task_name).cloned())
    }

    pub fn task_names(&self) -> Result<Vec<String>> {
        let defs = self.definitions
                       .read()
                       .map_err(|e| GleanFailure::Config(format!("registry poisoned: {:?}", e)))?;
        let mut names: Vec<String> = defs.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// Lector de ficheros de parámetros.
pub trait ParamsReader: Send + Sync {
    fn read(&self, path: &Path) -> job_params::Result<JobContainer>;
}

/// Lee contenedores serializados en JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonParamsReader;

impl ParamsReader for JsonParamsReader {
    fn read(&self, path: &Path) -> job_params::Result<JobContainer> {
        JobContainer::from_json_file(path)
    }
}

/// Nombres del fichero de parámetros final y del de entrada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamsFiles {
    pub primary: String,
    pub fallback: String,
}

impl ParamsFiles {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self { primary: primary.into(),
               fallback: fallback.into() }
    }

    /// `params.xml` / `input_params.xml`.
    pub fn xml() -> Self {
        Self::new("params.xml", "input_params.xml")
    }

    /// `params.json` / `input_params.json`.
    pub fn json() -> Self {
        Self::new("params.json", "input_params.json")
    }

    /// Orden de búsqueda para un job en `status`.
    pub fn preference(&self, status: JobStatus) -> [&str; 2] {
        if status.is_unstarted() {
            [self.fallback.as_str(), self.primary.as_str()]
        } else {
            [self.primary.as_str(), self.fallback.as_str()]
        }
    }
}

/// Carga el contenedor de un job: definición de la tarea más los datos del
/// primer fichero de parámetros disponible en su directorio.
pub struct ContainerLoader<P = JsonParamsReader>
    where P: ParamsReader
{
    registry: Arc<TaskRegistry>,
    reader: P,
    files: ParamsFiles,
}

impl ContainerLoader<JsonParamsReader> {
    /// Cargador de contenedores JSON (`params.json` / `input_params.json`).
    pub fn json(registry: Arc<TaskRegistry>) -> Self {
        Self::new(registry, JsonParamsReader, ParamsFiles::json())
    }
}

impl<P> ContainerLoader<P> where P: ParamsReader
{
    pub fn new(registry: Arc<TaskRegistry>, reader: P, files: ParamsFiles) -> Self {
        Self { registry, reader, files }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Contenedor de `job`. Sin definición registrada para su tarea es un
    /// error; sin ficheros de parámetros se devuelve la definición sola.
    pub fn load(&self, job: &Job) -> Result<JobContainer> {
        let mut container = self.registry
                                .definition(&job.task_name)?
                                .ok_or_else(|| GleanFailure::UnknownTask(job.task_name.clone()))?;
        for name in self.files.preference(job.status) {
            let path = job.directory.join(name);
            if path.is_file() {
                debug!("{}: cargando parámetros de {}", job, path.display());
                let data = self.reader.read(&path)?;
                container.merge_from(data);
                return Ok(container);
            }
        }
        warn!("{}: no hay fichero de parámetros en {}, se usa la definición de la tarea",
              job,
              job.directory.display());
        Ok(container)
    }
}
