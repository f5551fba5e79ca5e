// Archivo: gleaner.rs
// Propósito: orquestar una pasada de gleaning sobre el contenedor de un job.
use crate::config::GleanConfig;
use crate::container::{ContainerLoader, ParamsReader};
use crate::errors::Result;
use crate::file_uses::make_file_uses;
use crate::files::make_files;
use crate::indicators::glean_performance_indicators;
use crate::summary::GleanSummary;
use job_domain::{GleanRepository, Role};
use job_params::JobContainer;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

/// Reconcilia el árbol de parámetros de un job con el repositorio.
///
/// Orden de una pasada:
/// - OUT en `roles`: materializar las salidas existentes como `File`.
/// - IN en `roles`: enlazar las entradas con `FileUse`.
/// - Siempre: recoger los indicadores de la sección de salida.
///
/// Sólo la resolución del job es fatal; los fallos por nodo quedan en el
/// [`GleanSummary`]. Repetir la pasada no duplica `File`, `FileUse` ni claves
/// de indicador, pero sí añade de nuevo los valores de indicador.
pub struct JobGleaner<R>
    where R: GleanRepository + ?Sized
{
    repo: Arc<R>,
    config: GleanConfig,
}

impl<R> JobGleaner<R> where R: GleanRepository + ?Sized
{
    pub fn new(repo: Arc<R>, config: GleanConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &GleanConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Pasada completa con roles y limpieza explícitos. El contenedor se
    /// modifica: ids de los ficheros creados y salidas inexistentes limpiadas.
    pub fn glean(&self,
                 job_id: &Uuid,
                 container: &mut JobContainer,
                 roles: &[Role],
                 unset_missing_files: bool)
                 -> Result<GleanSummary> {
        let job = self.repo.get_job(job_id)?;
        let mut summary = GleanSummary::new(job.id);
        if roles.contains(&Role::Out) {
            make_files(&*self.repo,
                       &job,
                       &mut container.output_data,
                       self.config.output_directory,
                       unset_missing_files,
                       &mut summary);
        }
        if roles.contains(&Role::In) {
            make_file_uses(&*self.repo, &job, &container.input_data, &mut summary);
        }
        glean_performance_indicators(&*self.repo, &job, &container.output_data, &mut summary);
        info!("gleaning terminado: {}", summary);
        Ok(summary)
    }

    /// Pasada con los roles y la limpieza de la configuración.
    pub fn glean_with_config(&self, job_id: &Uuid, container: &mut JobContainer) -> Result<GleanSummary> {
        self.glean(job_id, container, &self.config.roles, self.config.unset_missing_files)
    }

    /// Resuelve el job, carga su contenedor con `loader` y lo reconcilia.
    /// Devuelve el contenedor ya actualizado junto con el resumen.
    pub fn glean_job<P>(&self, job_id: &Uuid, loader: &ContainerLoader<P>) -> Result<(JobContainer, GleanSummary)>
        where P: ParamsReader
    {
        let job = self.repo.get_job(job_id)?;
        let mut container = loader.load(&job)?;
        let summary = self.glean_with_config(&job.id, &mut container)?;
        Ok((container, summary))
    }
}
