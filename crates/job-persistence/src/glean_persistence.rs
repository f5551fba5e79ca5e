use crate::schema;
use crate::schema::{file_types, file_uses, files, job_char_values, job_float_values, job_value_keys, jobs};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use job_domain::{File, FileKey, FileType, FileUse, GleanError, GleanRepository, Job, JobCharValue, JobFloatValue,
                 JobStatus, JobValueKey, NewFile, NewFileUse, Result, Role};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
#[cfg(feature = "pg")]
type DbConn = PgConnection;
#[cfg(not(feature = "pg"))]
type DbConn = SqliteConnection;
#[cfg(feature = "pg")]
type DbBackend = diesel::pg::Pg;
#[cfg(not(feature = "pg"))]
type DbBackend = diesel::sqlite::Sqlite;
type DbPool = Pool<ConnectionManager<DbConn>>;
/// Ajustes por conexión para SQLite: claves foráneas y espera ante bloqueo.
#[cfg(not(feature = "pg"))]
#[derive(Debug)]
struct SqlitePragmas;
#[cfg(not(feature = "pg"))]
impl diesel::r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
    use diesel::connection::SimpleConnection;
    conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
        .map_err(diesel::r2d2::Error::QueryError)
  }
}
/// Repo Diesel que implementa `GleanRepository`.
///
/// Cada get-or-create corre dentro de una transacción y está respaldado por
/// un índice único; si otra llamada concurrente gana la carrera, la violación
/// de unicidad se resuelve releyendo el registro ganador.
pub struct DieselGleanRepository {
  pool: Arc<DbPool>,
}
impl DieselGleanRepository {
  pub fn new(database_url: &str) -> Result<Self> {
    let manager = ConnectionManager::<DbConn>::new(database_url);
    let builder = Pool::builder().max_size(4);
    #[cfg(not(feature = "pg"))]
    let builder = builder.connection_customizer(Box::new(SqlitePragmas));
    let pool = builder.build(manager).map_err(|e| GleanError::Storage(format!("pool: {}", e)))?;
    let repo = DieselGleanRepository { pool: Arc::new(pool) };
    repo.run_migrations()?;
    Ok(repo)
  }
  fn run_migrations(&self) -> Result<()> {
    let mut c = self.conn()?;
    #[cfg(not(feature = "pg"))]
    {
      use diesel::connection::SimpleConnection;
      // Falla en bases en memoria; se sigue con el modo por defecto.
      if let Err(e) = c.batch_execute("PRAGMA journal_mode = WAL;") {
        debug!("no se pudo activar WAL: {}", e);
      }
    }
    let conn: &mut DbConn = &mut c;
    let applied =
      conn.run_pending_migrations(MIGRATIONS).map_err(|e| GleanError::Storage(format!("migraciones: {}", e)))?;
    if !applied.is_empty() {
      info!("aplicadas {} migraciones", applied.len());
    }
    Ok(())
  }
  fn conn_raw(&self) -> std::result::Result<PooledConnection<ConnectionManager<DbConn>>, r2d2::Error> {
    self.pool.get()
  }
  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>> {
    self.conn_raw().map_err(|e| GleanError::Storage(format!("pool: {}", e)))
  }
}
// Diesel row structs; field order must match the `table!` column order.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = schema::jobs)]
struct JobRow {
  pub id: String,
  pub number: String,
  pub task_name: String,
  pub directory: String,
  pub status: i32,
  pub created_at_ts: i64,
}
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = schema::file_types)]
struct FileTypeRow {
  pub name: String,
  pub description: String,
}
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = schema::files)]
struct FileRow {
  pub id: String,
  pub name: Option<String>,
  pub annotation: Option<String>,
  pub file_type: String,
  pub sub_type: Option<i32>,
  pub content: Option<i32>,
  pub job_id: String,
  pub directory: i32,
  pub job_param_name: String,
  pub created_at_ts: i64,
}
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = schema::file_uses)]
struct FileUseRow {
  pub id: String,
  pub file_id: String,
  pub job_id: String,
  pub role: i32,
  pub job_param_name: String,
  pub created_at_ts: i64,
}
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = schema::job_value_keys)]
struct ValueKeyRow {
  pub name: String,
  pub description: String,
}
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = schema::job_float_values)]
struct FloatValueRow {
  pub id: String,
  pub job_id: String,
  pub key_name: String,
  pub value: f64,
  pub created_at_ts: i64,
}
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = schema::job_char_values)]
struct CharValueRow {
  pub id: String,
  pub job_id: String,
  pub key_name: String,
  pub value: String,
  pub created_at_ts: i64,
}
fn parse_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(|e| GleanError::Storage(format!("uuid inválido '{}': {}", s, e)))
}
fn from_ts(ts: i64) -> Result<DateTime<Utc>> {
  DateTime::<Utc>::from_timestamp_millis(ts).ok_or_else(|| GleanError::Storage(format!("timestamp inválido: {}", ts)))
}
impl JobRow {
  fn from_domain(job: &Job) -> Self {
    JobRow { id: job.id.to_string(),
             number: job.number.clone(),
             task_name: job.task_name.clone(),
             directory: job.directory.to_string_lossy().into_owned(),
             status: job.status.code(),
             created_at_ts: job.created_at.timestamp_millis() }
  }
  fn into_domain(self) -> Result<Job> {
    Ok(Job { id: parse_uuid(&self.id)?,
             number: self.number,
             task_name: self.task_name,
             directory: PathBuf::from(self.directory),
             status: JobStatus::from_code(self.status)?,
             created_at: from_ts(self.created_at_ts)? })
  }
}
impl FileRow {
  fn from_domain(f: &File) -> Self {
    FileRow { id: f.id.to_string(),
              name: f.name.clone(),
              annotation: f.annotation.clone(),
              file_type: f.file_type.clone(),
              sub_type: f.sub_type,
              content: f.content,
              job_id: f.job_id.to_string(),
              directory: f.directory,
              job_param_name: f.job_param_name.clone(),
              created_at_ts: f.created_at.timestamp_millis() }
  }
  fn into_domain(self) -> Result<File> {
    Ok(File { id: parse_uuid(&self.id)?,
              name: self.name,
              annotation: self.annotation,
              file_type: self.file_type,
              sub_type: self.sub_type,
              content: self.content,
              job_id: parse_uuid(&self.job_id)?,
              directory: self.directory,
              job_param_name: self.job_param_name,
              created_at: from_ts(self.created_at_ts)? })
  }
}
impl FileUseRow {
  fn from_domain(u: &FileUse) -> Self {
    FileUseRow { id: u.id.to_string(),
                 file_id: u.file_id.to_string(),
                 job_id: u.job_id.to_string(),
                 role: u.role.code(),
                 job_param_name: u.job_param_name.clone(),
                 created_at_ts: u.created_at.timestamp_millis() }
  }
  fn into_domain(self) -> Result<FileUse> {
    Ok(FileUse { id: parse_uuid(&self.id)?,
                 file_id: parse_uuid(&self.file_id)?,
                 job_id: parse_uuid(&self.job_id)?,
                 role: Role::from_code(self.role)?,
                 job_param_name: self.job_param_name,
                 created_at: from_ts(self.created_at_ts)? })
  }
}
impl FloatValueRow {
  fn into_domain(self) -> Result<JobFloatValue> {
    Ok(JobFloatValue { id: parse_uuid(&self.id)?,
                       job_id: parse_uuid(&self.job_id)?,
                       key: self.key_name,
                       value: self.value,
                       created_at: from_ts(self.created_at_ts)? })
  }
}
impl CharValueRow {
  fn into_domain(self) -> Result<JobCharValue> {
    Ok(JobCharValue { id: parse_uuid(&self.id)?,
                      job_id: parse_uuid(&self.job_id)?,
                      key: self.key_name,
                      value: self.value,
                      created_at: from_ts(self.created_at_ts)? })
  }
}
/// Error interno de las transacciones: fallo de Diesel o regla de dominio.
enum TxError {
  Db(DieselError),
  Domain(GleanError),
}
impl From<DieselError> for TxError {
  fn from(e: DieselError) -> Self {
    TxError::Db(e)
  }
}
fn storage(e: DieselError) -> GleanError {
  GleanError::Storage(format!("db: {}", e))
}
fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T> {
  res.map_err(storage)
}
fn finish<T>(res: std::result::Result<T, TxError>) -> Result<T> {
  match res {
    Ok(v) => Ok(v),
    Err(TxError::Db(e)) => Err(storage(e)),
    Err(TxError::Domain(e)) => Err(e),
  }
}
fn is_unique_violation(e: &DieselError) -> bool {
  matches!(e, DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
}
/// Busca con `find` y, si no hay registro, crea con `create`, todo en una
/// transacción. Una violación de unicidad significa que otra transacción
/// insertó la misma clave: se relee y se devuelve como existente.
fn get_or_create<T, F, C>(conn: &mut DbConn, find: F, create: C) -> Result<(T, bool)>
  where F: Fn(&mut DbConn) -> QueryResult<Option<T>>,
        C: Fn(&mut DbConn) -> std::result::Result<T, TxError>
{
  let body = |c: &mut DbConn| -> std::result::Result<(T, bool), TxError> {
    if let Some(existing) = find(c)? {
      return Ok((existing, false));
    }
    Ok((create(c)?, true))
  };
  // En SQLite se toma el bloqueo de escritura al empezar para que dos
  // get-or-create concurrentes se serialicen vía busy_timeout.
  #[cfg(not(feature = "pg"))]
  let attempt = conn.immediate_transaction(body);
  #[cfg(feature = "pg")]
  let attempt = conn.transaction(body);
  match attempt {
    Err(TxError::Db(e)) if is_unique_violation(&e) => {
      debug!("conflicto de unicidad, se relee el registro ganador: {}", e);
      match map_db_err(find(conn))? {
        Some(existing) => Ok((existing, false)),
        None => Err(storage(e)),
      }
    }
    other => finish(other),
  }
}
fn require_job(conn: &mut DbConn, job_id: &Uuid) -> std::result::Result<(), TxError> {
  let found = jobs::table.find(job_id.to_string()).select(jobs::id).first::<String>(conn).optional()?;
  match found {
    Some(_) => Ok(()),
    None => Err(TxError::Domain(GleanError::NotFound(format!("job {}", job_id)))),
  }
}
fn find_file_row(conn: &mut DbConn, key: &FileKey) -> QueryResult<Option<FileRow>> {
  let mut query = files::table.filter(files::job_id.eq(key.job_id.to_string()))
                              .filter(files::directory.eq(key.directory))
                              .filter(files::job_param_name.eq(key.job_param_name.clone()))
                              .into_boxed::<DbBackend>();
  // Mismo criterio que el índice único: COALESCE(name, '').
  query = match key.name.as_deref().filter(|n| !n.is_empty()) {
    Some(n) => query.filter(files::name.eq(n.to_string())),
    None => query.filter(files::name.is_null().or(files::name.eq(""))),
  };
  query.first::<FileRow>(conn).optional()
}
fn find_file_use_row(conn: &mut DbConn, file_id: &Uuid, job_id: &Uuid, role: Role) -> QueryResult<Option<FileUseRow>> {
  file_uses::table.filter(file_uses::file_id.eq(file_id.to_string()))
                  .filter(file_uses::job_id.eq(job_id.to_string()))
                  .filter(file_uses::role.eq(role.code()))
                  .first::<FileUseRow>(conn)
                  .optional()
}
impl GleanRepository for DieselGleanRepository {
  fn save_job(&self, job: Job) -> Result<Uuid> {
    let mut conn = self.conn()?;
    let row = JobRow::from_domain(&job);
    map_db_err(diesel::insert_into(jobs::table).values(&row).execute(&mut conn))?;
    Ok(job.id)
  }
  fn get_job(&self, id: &Uuid) -> Result<Job> {
    let mut conn = self.conn()?;
    let row = map_db_err(jobs::table.find(id.to_string()).first::<JobRow>(&mut conn).optional())?;
    match row {
      Some(r) => r.into_domain(),
      None => Err(GleanError::NotFound(format!("job {}", id))),
    }
  }
  fn save_file_type(&self, file_type: FileType) -> Result<()> {
    let mut conn = self.conn()?;
    let row = FileTypeRow { name: file_type.name, description: file_type.description };
    finish(conn.transaction::<_, TxError, _>(|c| {
                 let existing = file_types::table.find(&row.name).first::<FileTypeRow>(c).optional()?;
                 if existing.is_some() {
                   diesel::update(file_types::table.find(&row.name)).set(file_types::description.eq(&row.description))
                                                                      .execute(c)?;
                 } else {
                   diesel::insert_into(file_types::table).values(&row).execute(c)?;
                 }
                 Ok(())
               }))
  }
  fn get_file_type(&self, name: &str) -> Result<Option<FileType>> {
    let mut conn = self.conn()?;
    let row = map_db_err(file_types::table.find(name).first::<FileTypeRow>(&mut conn).optional())?;
    Ok(row.map(|r| FileType { name: r.name, description: r.description }))
  }
  fn get_file(&self, id: &Uuid) -> Result<Option<File>> {
    let mut conn = self.conn()?;
    let row = map_db_err(files::table.find(id.to_string()).first::<FileRow>(&mut conn).optional())?;
    row.map(FileRow::into_domain).transpose()
  }
  fn find_file(&self, key: &FileKey) -> Result<Option<File>> {
    let mut conn = self.conn()?;
    let row = map_db_err(find_file_row(&mut conn, key))?;
    row.map(FileRow::into_domain).transpose()
  }
  fn get_or_create_file(&self, new_file: NewFile) -> Result<(File, bool)> {
    let mut conn = self.conn()?;
    let key = new_file.key();
    let (row, created) = get_or_create(&mut conn,
                                       |c| find_file_row(c, &key),
                                       |c| {
                                         require_job(c, &new_file.job_id)?;
                                         let known_type = file_types::table.find(&new_file.file_type)
                                                                           .first::<FileTypeRow>(c)
                                                                           .optional()?;
                                         if known_type.is_none() {
                                           return Err(TxError::Domain(GleanError::NotFound(format!("file type {}",
                                                                                                   new_file.file_type))));
                                         }
                                         let row = FileRow::from_domain(&new_file.clone().into_file());
                                         diesel::insert_into(files::table).values(&row).execute(c)?;
                                         Ok(row)
                                       })?;
    Ok((row.into_domain()?, created))
  }
  fn find_file_use(&self, file_id: &Uuid, job_id: &Uuid, role: Role) -> Result<Option<FileUse>> {
    let mut conn = self.conn()?;
    let row = map_db_err(find_file_use_row(&mut conn, file_id, job_id, role))?;
    row.map(FileUseRow::into_domain).transpose()
  }
  fn get_or_create_file_use(&self, new_use: NewFileUse) -> Result<(FileUse, bool)> {
    let mut conn = self.conn()?;
    let (row, created) =
      get_or_create(&mut conn,
                    |c| find_file_use_row(c, &new_use.file_id, &new_use.job_id, new_use.role),
                    |c| {
                      require_job(c, &new_use.job_id)?;
                      let file = files::table.find(new_use.file_id.to_string()).select(files::id).first::<String>(c).optional()?;
                      if file.is_none() {
                        return Err(TxError::Domain(GleanError::NotFound(format!("file {}", new_use.file_id))));
                      }
                      let row = FileUseRow::from_domain(&new_use.clone().into_file_use());
                      diesel::insert_into(file_uses::table).values(&row).execute(c)?;
                      Ok(row)
                    })?;
    Ok((row.into_domain()?, created))
  }
  fn get_or_create_value_key(&self, name: &str) -> Result<(JobValueKey, bool)> {
    let mut conn = self.conn()?;
    let (row, created) = get_or_create(&mut conn,
                                       |c| job_value_keys::table.find(name).first::<ValueKeyRow>(c).optional(),
                                       |c| {
                                         let key = JobValueKey::named(name);
                                         let row = ValueKeyRow { name: key.name, description: key.description };
                                         diesel::insert_into(job_value_keys::table).values(&row).execute(c)?;
                                         Ok(row)
                                       })?;
    Ok((JobValueKey { name: row.name, description: row.description }, created))
  }
  fn add_float_value(&self, job_id: &Uuid, key: &JobValueKey, value: f64) -> Result<JobFloatValue> {
    let mut conn = self.conn()?;
    let record = JobFloatValue::new(*job_id, key, value);
    let row = FloatValueRow { id: record.id.to_string(),
                              job_id: job_id.to_string(),
                              key_name: key.name.clone(),
                              value,
                              created_at_ts: record.created_at.timestamp_millis() };
    finish(conn.transaction::<_, TxError, _>(|c| {
                 require_job(c, job_id)?;
                 diesel::insert_into(job_float_values::table).values(&row).execute(c)?;
                 Ok(())
               }))?;
    Ok(record)
  }
  fn add_char_value(&self, job_id: &Uuid, key: &JobValueKey, value: &str) -> Result<JobCharValue> {
    let mut conn = self.conn()?;
    let record = JobCharValue::new(*job_id, key, value);
    let row = CharValueRow { id: record.id.to_string(),
                             job_id: job_id.to_string(),
                             key_name: key.name.clone(),
                             value: value.to_string(),
                             created_at_ts: record.created_at.timestamp_millis() };
    finish(conn.transaction::<_, TxError, _>(|c| {
                 require_job(c, job_id)?;
                 diesel::insert_into(job_char_values::table).values(&row).execute(c)?;
                 Ok(())
               }))?;
    Ok(record)
  }
  fn list_files(&self, job_id: &Uuid) -> Result<Vec<File>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(files::table.filter(files::job_id.eq(job_id.to_string()))
                                      .order(files::created_at_ts.asc())
                                      .load::<FileRow>(&mut conn))?;
    rows.into_iter().map(FileRow::into_domain).collect()
  }
  fn list_file_uses(&self, job_id: &Uuid) -> Result<Vec<FileUse>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(file_uses::table.filter(file_uses::job_id.eq(job_id.to_string()))
                                          .order(file_uses::created_at_ts.asc())
                                          .load::<FileUseRow>(&mut conn))?;
    rows.into_iter().map(FileUseRow::into_domain).collect()
  }
  fn list_float_values(&self, job_id: &Uuid) -> Result<Vec<JobFloatValue>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(job_float_values::table.filter(job_float_values::job_id.eq(job_id.to_string()))
                                                 .order(job_float_values::created_at_ts.asc())
                                                 .load::<FloatValueRow>(&mut conn))?;
    rows.into_iter().map(FloatValueRow::into_domain).collect()
  }
  fn list_char_values(&self, job_id: &Uuid) -> Result<Vec<JobCharValue>> {
    let mut conn = self.conn()?;
    let rows = map_db_err(job_char_values::table.filter(job_char_values::job_id.eq(job_id.to_string()))
                                                .order(job_char_values::created_at_ts.asc())
                                                .load::<CharValueRow>(&mut conn))?;
    rows.into_iter().map(CharValueRow::into_domain).collect()
  }
}
/// Crear repo desde las variables de entorno. Con `pg` se exige una URL de
/// Postgres en JOB_DB_URL / DATABASE_URL; sin `pg` se usa SQLite y, si no hay
/// URL, una base en memoria compartida.
pub fn new_from_env() -> Result<DieselGleanRepository> {
  dotenvy::dotenv().ok();
  let url = std::env::var("JOB_DB_URL").or_else(|_| std::env::var("DATABASE_URL"));
  if cfg!(feature = "pg") {
    let url = url.map_err(|_| GleanError::Storage("JOB_DB_URL / DATABASE_URL not set".into()))?;
    let l = url.to_lowercase();
    if !(l.starts_with("postgres") || url.contains('@')) {
      return Err(GleanError::Storage("JOB_DB_URL / DATABASE_URL does not look like Postgres URL".into()));
    }
    DieselGleanRepository::new(&url)
  } else {
    let url = url.unwrap_or_else(|_| "file:jobdb?mode=memory&cache=shared".into());
    DieselGleanRepository::new(&url)
  }
}
