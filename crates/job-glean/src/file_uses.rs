// Archivo: file_uses.rs
// Propósito: enlazar los ficheros de entrada de un job con los `File` ya
// registrados, creando un `FileUse` de rol IN por (fichero, job).
use crate::errors::{NodeFailure, Result, Stage};
use crate::summary::GleanSummary;
use job_domain::{FileUse, GleanError, GleanRepository, Job, NewFileUse, Role};
use job_params::{data_files, param_identity, DataFile, Located, ParamContainer};
use log::{debug, info, warn};
use uuid::Uuid;

/// Qué ocurrió con un nodo de entrada.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    Created(FileUse),
    Existing(FileUse),
    Skipped,
}

pub fn make_file_uses<R>(repo: &R, job: &Job, input: &ParamContainer, summary: &mut GleanSummary)
    where R: GleanRepository + ?Sized
{
    for Located { path, node } in data_files(input) {
        match link_file_use(repo, job, &path, node) {
            Ok(LinkOutcome::Created(_)) => summary.uses_created += 1,
            Ok(LinkOutcome::Existing(_)) => summary.uses_existing += 1,
            Ok(LinkOutcome::Skipped) => summary.inputs_skipped += 1,
            Err(e) => {
                warn!("{}: no se pudo enlazar el fichero de entrada: {}", path, e);
                summary.record(NodeFailure::new(Stage::Link, path, e));
            }
        }
    }
}

/// Enlaza un nodo de entrada con su `File`.
///
/// Un id ilegible o un `File` inexistente son errores del nodo. Un uso ya
/// registrado para (fichero, job, IN) se reutiliza aunque la identidad del
/// parámetro haya cambiado.
pub fn link_file_use<R>(repo: &R, job: &Job, path: &str, node: &DataFile) -> Result<LinkOutcome>
    where R: GleanRepository + ?Sized
{
    let raw_id = match node.db_file_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id,
        _ => {
            info!("{}: la entrada no referencia ningún fichero registrado", path);
            return Ok(LinkOutcome::Skipped);
        }
    };
    let file_id = Uuid::parse_str(raw_id).map_err(GleanError::from)?;
    let file = repo.get_file(&file_id)?
                   .ok_or_else(|| GleanError::NotFound(format!("file {}", file_id)))?;
    if !(node.is_set() && node.exists()) {
        debug!("{}: la entrada no está en disco, no se enlaza", path);
        return Ok(LinkOutcome::Skipped);
    }
    let new_use = NewFileUse { file_id: file.id,
                               job_id: job.id,
                               role: Role::In,
                               job_param_name: param_identity(path) };
    let (file_use, created) = repo.get_or_create_file_use(new_use)?;
    if created {
        info!("{}: {} usa el fichero {}", path, job, file.id);
        Ok(LinkOutcome::Created(file_use))
    } else {
        info!("{}: el uso del fichero {} ya existía ({})", path, file.id, file_use.job_param_name);
        Ok(LinkOutcome::Existing(file_use))
    }
}
