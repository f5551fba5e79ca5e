// Archivo: files.rs
// Propósito: materializar en el repositorio los ficheros de salida de un job.
//
// Cada nodo fichero de la sección de salida que existe en disco se registra
// como `File` (clave: job, directorio, nombre, identidad del parámetro). El
// id generado se escribe de vuelta en el nodo sólo cuando el registro se
// crea; si ya existía, el nodo no se toca.
use crate::errors::{NodeFailure, Result, Stage};
use crate::summary::GleanSummary;
use job_domain::{File, GleanError, GleanRepository, Job, NewFile, UNKNOWN_FILE_TYPE};
use job_params::{data_files_mut, param_identity, DataFile, Located, ParamContainer};
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Clasificaciones declaradas que no aportan información y se registran como
/// `Unknown`.
static NON_INFORMATIVE_MIME_TYPES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["application/grace", "application/xml"].into_iter().collect());

/// Tipo de fichero con el que se registra un nodo.
pub fn classify(mime_type: Option<&str>, path: &str) -> String {
    match mime_type.map(str::trim) {
        None | Some("") => {
            error!("{}: el fichero no declara tipo mime, se registra como {}", path, UNKNOWN_FILE_TYPE);
            UNKNOWN_FILE_TYPE.to_string()
        }
        Some(m) if NON_INFORMATIVE_MIME_TYPES.contains(m) => UNKNOWN_FILE_TYPE.to_string(),
        Some(m) => m.to_string(),
    }
}

/// Registra las salidas de `output` para `job`.
///
/// Los fallos de un nodo se registran en `summary` y no detienen el resto.
pub fn make_files<R>(repo: &R,
                     job: &Job,
                     output: &mut ParamContainer,
                     directory: i32,
                     unset_missing_files: bool,
                     summary: &mut GleanSummary)
    where R: GleanRepository + ?Sized
{
    for Located { path, node } in data_files_mut(output) {
        if !node.exists() {
            debug!("{}: el fichero no existe en disco, se omite", path);
            summary.files_missing += 1;
            if unset_missing_files {
                if node.is_set() {
                    summary.files_unset += 1;
                }
                node.unset();
            }
            continue;
        }
        match create_new_file(repo, job, &path, node, directory) {
            Ok((_, true)) => summary.files_created += 1,
            Ok((_, false)) => summary.files_reused += 1,
            Err(e) => {
                warn!("{}: no se pudo registrar el fichero de salida: {}", path, e);
                summary.record(NodeFailure::new(Stage::Materialize, path, e));
            }
        }
    }
}

/// Obtiene o crea el `File` correspondiente a `node`.
///
/// Devuelve el registro y si se creó en esta llamada.
pub fn create_new_file<R>(repo: &R, job: &Job, path: &str, node: &mut DataFile, directory: i32) -> Result<(File, bool)>
    where R: GleanRepository + ?Sized
{
    let file_type = classify(node.mime_type_name.as_deref(), path);
    if repo.get_file_type(&file_type)?.is_none() {
        return Err(GleanError::NotFound(format!("file type {}", file_type)).into());
    }
    let new_file = NewFile { name: node.base_name.clone().filter(|n| !n.trim().is_empty()),
                             annotation: node.annotation.clone(),
                             file_type,
                             sub_type: node.sub_type,
                             content: node.content_flag,
                             job_id: job.id,
                             directory,
                             job_param_name: param_identity(path) };
    let (file, created) = repo.get_or_create_file(new_file)?;
    if created {
        node.set_db_file_id(file.id.to_string());
        info!("{}: registrado fichero {} ({})", path, file.id, file.file_type);
    } else {
        debug!("{}: el fichero ya estaba registrado como {}", path, file.id);
    }
    Ok((file, created))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_informative_types_become_unknown() {
        assert_eq!(classify(Some("application/xml"), "p"), UNKNOWN_FILE_TYPE);
        assert_eq!(classify(Some("application/grace"), "p"), UNKNOWN_FILE_TYPE);
        assert_eq!(classify(Some("  "), "p"), UNKNOWN_FILE_TYPE);
        assert_eq!(classify(None, "p"), UNKNOWN_FILE_TYPE);
        assert_eq!(classify(Some("chemical/x-pdb"), "p"), "chemical/x-pdb");
    }
}
