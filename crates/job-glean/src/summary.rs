// Archivo: summary.rs
// Propósito: contadores de una pasada de gleaning.
use crate::errors::NodeFailure;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Resultado observable de `JobGleaner::glean`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GleanSummary {
    pub job_id: Uuid,
    pub files_created: usize,
    pub files_reused: usize,
    /// Ficheros de salida que no existen en disco.
    pub files_missing: usize,
    /// De los anteriores, los que se limpiaron en el árbol.
    pub files_unset: usize,
    pub uses_created: usize,
    pub uses_existing: usize,
    /// Entradas sin id de fichero o sin fichero en disco.
    pub inputs_skipped: usize,
    pub float_values: usize,
    pub char_values: usize,
    pub indicator_fields_skipped: usize,
    pub failures: Vec<NodeFailure>,
}

impl GleanSummary {
    pub fn new(job_id: Uuid) -> Self {
        Self { job_id, ..Default::default() }
    }

    pub fn record(&mut self, failure: NodeFailure) {
        self.failures.push(failure);
    }

    /// Ningún nodo falló.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for GleanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "job {}: files +{} ={} missing {} (unset {}), uses +{} ={} skipped {}, values float {} char {} \
                skipped {}, failures {}",
               self.job_id,
               self.files_created,
               self.files_reused,
               self.files_missing,
               self.files_unset,
               self.uses_created,
               self.uses_existing,
               self.inputs_skipped,
               self.float_values,
               self.char_values,
               self.indicator_fields_skipped,
               self.failures.len())
    }
}
