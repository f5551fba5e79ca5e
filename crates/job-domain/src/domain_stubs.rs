use crate::file::{FileType, UNKNOWN_FILE_TYPE};
use crate::glean_repository::{GleanRepository, InMemoryGleanRepository};
use crate::job::{Job, JobStatus};

pub struct DomainStubs;

impl DomainStubs {
    /// Vocabulario base de tipos de fichero (mime normalizado, descripción).
    pub fn standard_file_types() -> Vec<FileType> {
        [(UNKNOWN_FILE_TYPE, "Tipo de fichero desconocido"),
         ("chemical/x-pdb", "Coordenadas del modelo"),
         ("application/CCP4-mtz", "Datos de reflexiones MTZ"),
         ("application/CCP4-mtz-map", "Coeficientes de mapa MTZ"),
         ("application/refmac-dictionary", "Diccionario de geometría"),
         ("application/CCP4-seq", "Secuencia"),
         ("text/plain", "Texto plano")].into_iter()
                                        .map(|(name, description)| FileType::new(name, description))
                                        .collect()
    }

    /// Crea un repositorio en memoria con el vocabulario base de tipos de
    /// fichero y un job terminado de ejemplo. Devuelve el repo y el job.
    pub fn sample_repo() -> (InMemoryGleanRepository, Job) {
        let repo = InMemoryGleanRepository::new();
        for file_type in Self::standard_file_types() {
            // Un repo recién creado no puede fallar al insertar en memoria.
            let _ = repo.save_file_type(file_type);
        }
        let job = Job::new("1", "refmac", std::env::temp_dir()).with_status(JobStatus::Completed);
        let _ = repo.save_job(job.clone());
        (repo, job)
    }
}
