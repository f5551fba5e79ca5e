use crate::errors::{GleanError, Result};
use crate::file::{File, FileKey, FileType, FileUse, NewFile, NewFileUse, Role};
use crate::job::Job;
use crate::job_value::{JobCharValue, JobFloatValue, JobValueKey};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Superficie de persistencia que consume el gleaning.
///
/// Las operaciones `get_or_create_*` son atómicas en cada implementación:
/// devuelven el registro y `true` si se creó, `false` si ya existía (en ese
/// caso el registro existente no se modifica). Los valores de indicador sólo
/// se añaden.
pub trait GleanRepository: Send + Sync {
    /// Inserta un job (lo crea el controlador de ciclo de vida, no el
    /// gleaning).
    fn save_job(&self, job: Job) -> Result<Uuid>;

    /// Obtiene un job por id. `NotFound` si no existe.
    fn get_job(&self, id: &Uuid) -> Result<Job>;

    /// Registra un tipo de fichero en el vocabulario.
    fn save_file_type(&self, file_type: FileType) -> Result<()>;

    /// Busca un tipo de fichero por nombre.
    fn get_file_type(&self, name: &str) -> Result<Option<FileType>>;

    /// Busca un fichero por su id.
    fn get_file(&self, id: &Uuid) -> Result<Option<File>>;

    /// Busca un fichero por su clave de unicidad.
    fn find_file(&self, key: &FileKey) -> Result<Option<File>>;

    /// Crea el fichero salvo que ya exista uno con la misma `FileKey`.
    fn get_or_create_file(&self, new_file: NewFile) -> Result<(File, bool)>;

    /// Busca un uso por (fichero, job, rol).
    fn find_file_use(&self, file_id: &Uuid, job_id: &Uuid, role: Role) -> Result<Option<FileUse>>;

    /// Crea el uso salvo que ya exista uno con el mismo (fichero, job, rol).
    fn get_or_create_file_use(&self, new_use: NewFileUse) -> Result<(FileUse, bool)>;

    /// Obtiene o crea la clave de indicador `name` (descripción = nombre).
    fn get_or_create_value_key(&self, name: &str) -> Result<(JobValueKey, bool)>;

    /// Añade un valor numérico de indicador.
    fn add_float_value(&self, job_id: &Uuid, key: &JobValueKey, value: f64) -> Result<JobFloatValue>;

    /// Añade un valor textual de indicador.
    fn add_char_value(&self, job_id: &Uuid, key: &JobValueKey, value: &str) -> Result<JobCharValue>;

    fn list_files(&self, job_id: &Uuid) -> Result<Vec<File>>;
    fn list_file_uses(&self, job_id: &Uuid) -> Result<Vec<FileUse>>;
    fn list_float_values(&self, job_id: &Uuid) -> Result<Vec<JobFloatValue>>;
    fn list_char_values(&self, job_id: &Uuid) -> Result<Vec<JobCharValue>>;
}

#[derive(Default)]
struct Tables {
    jobs: HashMap<Uuid, Job>,
    file_types: HashMap<String, FileType>,
    files: Vec<File>,
    file_uses: Vec<FileUse>,
    value_keys: HashMap<String, JobValueKey>,
    float_values: Vec<JobFloatValue>,
    char_values: Vec<JobCharValue>,
}

impl Tables {
    fn require_job(&self, job_id: &Uuid) -> Result<()> {
        if self.jobs.contains_key(job_id) {
            Ok(())
        } else {
            Err(GleanError::NotFound(format!("job {}", job_id)))
        }
    }
}

/// Implementación en memoria para tests y desarrollo.
///
/// Todas las tablas viven bajo un único mutex, de modo que cada
/// get-or-create es atómico frente a llamadas concurrentes.
pub struct InMemoryGleanRepository {
    tables: Mutex<Tables>,
}

impl InMemoryGleanRepository {
    pub fn new() -> Self {
        Self { tables: Mutex::new(Tables::default()) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| GleanError::Storage(format!("mutex poisoned: {:?}", e)))
    }
}

impl Default for InMemoryGleanRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl GleanRepository for InMemoryGleanRepository {
    fn save_job(&self, job: Job) -> Result<Uuid> {
        let id = job.id;
        self.lock()?.jobs.insert(id, job);
        Ok(id)
    }

    fn get_job(&self, id: &Uuid) -> Result<Job> {
        self.lock()?
            .jobs
            .get(id)
            .cloned()
            .ok_or_else(|| GleanError::NotFound(format!("job {}", id)))
    }

    fn save_file_type(&self, file_type: FileType) -> Result<()> {
        self.lock()?.file_types.insert(file_type.name.clone(), file_type);
        Ok(())
    }

    fn get_file_type(&self, name: &str) -> Result<Option<FileType>> {
        Ok(self.lock()?.file_types.get(name).cloned())
    }

    fn get_file(&self, id: &Uuid) -> Result<Option<File>> {
        Ok(self.lock()?.files.iter().find(|f| &f.id == id).cloned())
    }

    fn find_file(&self, key: &FileKey) -> Result<Option<File>> {
        Ok(self.lock()?.files.iter().find(|f| &f.key() == key).cloned())
    }

    fn get_or_create_file(&self, new_file: NewFile) -> Result<(File, bool)> {
        let mut tables = self.lock()?;
        let key = new_file.key();
        if let Some(existing) = tables.files.iter().find(|f| f.key() == key) {
            return Ok((existing.clone(), false));
        }
        tables.require_job(&new_file.job_id)?;
        if !tables.file_types.contains_key(&new_file.file_type) {
            return Err(GleanError::NotFound(format!("file type {}", new_file.file_type)));
        }
        let file = new_file.into_file();
        tables.files.push(file.clone());
        Ok((file, true))
    }

    fn find_file_use(&self, file_id: &Uuid, job_id: &Uuid, role: Role) -> Result<Option<FileUse>> {
        Ok(self.lock()?
               .file_uses
               .iter()
               .find(|u| &u.file_id == file_id && &u.job_id == job_id && u.role == role)
               .cloned())
    }

    fn get_or_create_file_use(&self, new_use: NewFileUse) -> Result<(FileUse, bool)> {
        let mut tables = self.lock()?;
        if let Some(existing) = tables.file_uses
                                      .iter()
                                      .find(|u| u.file_id == new_use.file_id
                                                && u.job_id == new_use.job_id
                                                && u.role == new_use.role)
        {
            return Ok((existing.clone(), false));
        }
        tables.require_job(&new_use.job_id)?;
        if !tables.files.iter().any(|f| f.id == new_use.file_id) {
            return Err(GleanError::NotFound(format!("file {}", new_use.file_id)));
        }
        let file_use = new_use.into_file_use();
        tables.file_uses.push(file_use.clone());
        Ok((file_use, true))
    }

    fn get_or_create_value_key(&self, name: &str) -> Result<(JobValueKey, bool)> {
        let mut tables = self.lock()?;
        if let Some(existing) = tables.value_keys.get(name) {
            return Ok((existing.clone(), false));
        }
        let key = JobValueKey::named(name);
        tables.value_keys.insert(name.to_string(), key.clone());
        Ok((key, true))
    }

    fn add_float_value(&self, job_id: &Uuid, key: &JobValueKey, value: f64) -> Result<JobFloatValue> {
        let mut tables = self.lock()?;
        tables.require_job(job_id)?;
        let row = JobFloatValue::new(*job_id, key, value);
        tables.float_values.push(row.clone());
        Ok(row)
    }

    fn add_char_value(&self, job_id: &Uuid, key: &JobValueKey, value: &str) -> Result<JobCharValue> {
        let mut tables = self.lock()?;
        tables.require_job(job_id)?;
        let row = JobCharValue::new(*job_id, key, value);
        tables.char_values.push(row.clone());
        Ok(row)
    }

    fn list_files(&self, job_id: &Uuid) -> Result<Vec<File>> {
        Ok(self.lock()?.files.iter().filter(|f| &f.job_id == job_id).cloned().collect())
    }

    fn list_file_uses(&self, job_id: &Uuid) -> Result<Vec<FileUse>> {
        Ok(self.lock()?.file_uses.iter().filter(|u| &u.job_id == job_id).cloned().collect())
    }

    fn list_float_values(&self, job_id: &Uuid) -> Result<Vec<JobFloatValue>> {
        Ok(self.lock()?.float_values.iter().filter(|v| &v.job_id == job_id).cloned().collect())
    }

    fn list_char_values(&self, job_id: &Uuid) -> Result<Vec<JobCharValue>> {
        Ok(self.lock()?.char_values.iter().filter(|v| &v.job_id == job_id).cloned().collect())
    }
}
