use job_domain::{DomainStubs, FileType, GleanRepository, Job, JobStatus};
use job_glean::{ContainerLoader, GleanConfig, JobGleaner, TaskRegistry};
use job_params::JobContainer;
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Pequeño menú interactivo para registrar jobs y reconciliar sus ficheros
/// con el repositorio proporcionado por `job-persistence`.
///
/// Opciones soportadas:
/// 1) Registrar job
/// 2) Registrar tipo de fichero
/// 3) Cargar vocabulario estándar de tipos de fichero
/// 4) Glean de un job desde su directorio (params.json / input_params.json)
/// 5) Glean de un job desde un contenedor JSON
/// 6) Ver registros de un job
/// 7) Salir
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).format_timestamp_secs()
                                                                                       .init();
    info!("Iniciando glean-core v{}", env!("CARGO_PKG_VERSION"));

    // Inicializar repo (aplica migraciones embebidas si procede)
    let repo = Arc::new(job_persistence::new_from_env()?);
    let config = GleanConfig::from_env()?;
    let gleaner = JobGleaner::new(Arc::clone(&repo), config);
    let registry = Arc::new(TaskRegistry::new());
    let loader = ContainerLoader::json(Arc::clone(&registry));

    loop {
        println!("\n== Glean CLI menu ==");
        println!("1) Registrar job");
        println!("2) Registrar tipo de fichero");
        println!("3) Cargar vocabulario estándar de tipos de fichero");
        println!("4) Glean de un job desde su directorio");
        println!("5) Glean de un job desde un contenedor JSON");
        println!("6) Ver registros de un job");
        println!("7) Salir");
        let choice = prompt("Elige una opción: ")?;
        match choice.trim() {
            "1" => {
                let number = prompt("Número del job (ej: 12): ")?;
                let task = prompt("Tarea (ej: refmac): ")?;
                let dir = prompt("Directorio del job: ")?;
                let status = prompt("Código de estado (enter = 6, terminado): ")?;
                let status = match parse_status(&status) {
                    Ok(s) => s,
                    Err(e) => {
                        eprintln!("Estado inválido: {}", e);
                        continue;
                    }
                };
                let job = Job::new(number.trim(), task.trim(), PathBuf::from(dir.trim())).with_status(status);
                match repo.save_job(job) {
                    Ok(id) => println!("Job registrado: {}", id),
                    Err(e) => eprintln!("Error registrando job: {}", e),
                }
            }
            "2" => {
                let name = prompt("Nombre (mime normalizado): ")?;
                let description = prompt("Descripción: ")?;
                if name.trim().is_empty() {
                    eprintln!("El nombre no puede estar vacío");
                    continue;
                }
                match repo.save_file_type(FileType::new(name.trim(), description.trim())) {
                    Ok(()) => println!("Tipo registrado: {}", name.trim()),
                    Err(e) => eprintln!("Error registrando tipo: {}", e),
                }
            }
            "3" => {
                let mut saved = 0;
                for ft in DomainStubs::standard_file_types() {
                    match repo.save_file_type(ft) {
                        Ok(()) => saved += 1,
                        Err(e) => eprintln!("Error registrando tipo: {}", e),
                    }
                }
                println!("Tipos registrados: {}", saved);
            }
            "4" => {
                let Some(job) = read_job(&*repo)? else { continue };
                // Sin definición registrada, el fichero de parámetros aporta
                // el contenedor completo.
                if registry.definition(&job.task_name)?.is_none() {
                    registry.register(job.task_name.clone(), JobContainer::new())?;
                }
                match gleaner.glean_job(&job.id, &loader) {
                    Ok((_, summary)) => {
                        println!("{}", summary);
                        for failure in &summary.failures {
                            println!("  {}", failure);
                        }
                    }
                    Err(e) => eprintln!("Error en el gleaning: {}", e),
                }
            }
            "5" => {
                let Some(job) = read_job(&*repo)? else { continue };
                let path = prompt("Ruta del contenedor JSON: ")?;
                let path = Path::new(path.trim());
                let mut container = match JobContainer::from_json_file(path) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("No se pudo leer el contenedor: {}", e);
                        continue;
                    }
                };
                match gleaner.glean_with_config(&job.id, &mut container) {
                    Ok(summary) => {
                        println!("{}", summary);
                        for failure in &summary.failures {
                            println!("  {}", failure);
                        }
                        let save = prompt("¿Guardar el contenedor actualizado? escribir 'yes' para confirmar: ")?;
                        if save.trim().eq_ignore_ascii_case("yes") {
                            std::fs::write(path, container.to_json_string()?)?;
                            println!("Contenedor guardado en {}", path.display());
                        }
                    }
                    Err(e) => eprintln!("Error en el gleaning: {}", e),
                }
            }
            "6" => {
                let Some(job) = read_job(&*repo)? else { continue };
                print_records(&*repo, &job)?;
            }
            "7" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

// Vacío = terminado (6).
fn parse_status(raw: &str) -> Result<JobStatus, String> {
    if raw.trim().is_empty() {
        return Ok(JobStatus::Completed);
    }
    let code = raw.trim().parse::<i32>().map_err(|e| e.to_string())?;
    JobStatus::from_code(code).map_err(|e| e.to_string())
}

fn read_job<R: GleanRepository>(repo: &R) -> anyhow::Result<Option<Job>> {
    let id_s = prompt("Job id (UUID): ")?;
    let id = match Uuid::parse_str(id_s.trim()) {
        Ok(u) => u,
        Err(_) => {
            eprintln!("UUID inválido");
            return Ok(None);
        }
    };
    match repo.get_job(&id) {
        Ok(job) => Ok(Some(job)),
        Err(e) => {
            eprintln!("{}", e);
            Ok(None)
        }
    }
}

fn print_records<R: GleanRepository>(repo: &R, job: &Job) -> anyhow::Result<()> {
    println!("\n{} [{:?}]", job, job.status);
    println!("\nFICHEROS");
    println!("ID                                   | TIPO                       | PARÁMETRO            | NOMBRE");
    println!("----------------------------------------------------------------------------------------------------");
    for f in repo.list_files(&job.id)? {
        let name = f.name.unwrap_or_else(|| "<sin-nombre>".into());
        println!("{} | {:<26} | {:<20} | {}", f.id, f.file_type, f.job_param_name, name);
    }
    println!("\nUSOS");
    for u in repo.list_file_uses(&job.id)? {
        println!("{} | {} | {} | {}", u.id, u.role, u.file_id, u.job_param_name);
    }
    println!("\nINDICADORES");
    for v in repo.list_float_values(&job.id)? {
        println!("{} = {} ({})", v.key, v.value, v.created_at.format("%Y-%m-%d %H:%M:%S"));
    }
    for v in repo.list_char_values(&job.id)? {
        println!("{} = '{}' ({})", v.key, v.value, v.created_at.format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
