use job_domain::{DomainStubs, FileType, GleanError, GleanRepository, Job, JobStatus, NewFile, NewFileUse, Role,
                 JOB_DIRECTORY};
use job_persistence::DieselGleanRepository;
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

// Repo SQLite sobre un fichero temporal; `None` cuando se compila con `pg`.
fn sqlite_repo(dir: &tempfile::TempDir) -> Option<DieselGleanRepository> {
  if cfg!(feature = "pg") {
    eprintln!("skipping sqlite-only persistence test because 'pg' feature is enabled");
    return None;
  }
  let path = dir.path().join(format!("glean_test_{}.db", Uuid::new_v4()));
  let repo = DieselGleanRepository::new(path.to_str().unwrap()).expect("failed to create repo");
  for ft in DomainStubs::standard_file_types() {
    repo.save_file_type(ft).expect("save file type");
  }
  Some(repo)
}

fn saved_job(repo: &DieselGleanRepository) -> Job {
  let job = Job::new("7", "refmac", "/tmp/project/job_7").with_status(JobStatus::Completed);
  repo.save_job(job.clone()).expect("save job");
  job
}

fn new_file(job_id: Uuid, name: Option<&str>, param: &str) -> NewFile {
  NewFile { name: name.map(str::to_string),
            annotation: Some("Model from refinement".into()),
            file_type: "chemical/x-pdb".into(),
            sub_type: Some(1),
            content: None,
            job_id,
            directory: JOB_DIRECTORY,
            job_param_name: param.into() }
}

#[test]
fn job_round_trips_through_sqlite() {
  let dir = tempfile::tempdir().unwrap();
  let Some(repo) = sqlite_repo(&dir) else { return };
  let job = saved_job(&repo);
  let loaded = repo.get_job(&job.id).expect("get job");
  assert_eq!(loaded.id, job.id);
  assert_eq!(loaded.status, JobStatus::Completed);
  assert_eq!(loaded.directory, job.directory);
  assert_eq!(loaded.created_at.timestamp_millis(), job.created_at.timestamp_millis());
  match repo.get_job(&Uuid::new_v4()) {
    Err(GleanError::NotFound(_)) => {}
    other => panic!("expected NotFound, got {:?}", other),
  }
}

#[test]
fn file_types_are_upserted() {
  let dir = tempfile::tempdir().unwrap();
  let Some(repo) = sqlite_repo(&dir) else { return };
  repo.save_file_type(FileType::new("text/plain", "Texto plano")).unwrap();
  let ft = repo.get_file_type("text/plain").unwrap().expect("file type");
  assert_eq!(ft.description, "Texto plano");
  assert!(repo.get_file_type("application/nope").unwrap().is_none());
}

#[test]
fn file_get_or_create_honours_key_with_null_name() {
  let dir = tempfile::tempdir().unwrap();
  let Some(repo) = sqlite_repo(&dir) else { return };
  let job = saved_job(&repo);
  let (a, created_a) = repo.get_or_create_file(new_file(job.id, Some("XYZOUT.pdb"), "XYZOUT")).unwrap();
  let (b, created_b) = repo.get_or_create_file(new_file(job.id, Some("XYZOUT.pdb"), "XYZOUT")).unwrap();
  assert!(created_a && !created_b);
  assert_eq!(a.id, b.id);
  let (c, created_c) = repo.get_or_create_file(new_file(job.id, None, "XYZOUT")).unwrap();
  let (d, created_d) = repo.get_or_create_file(new_file(job.id, None, "XYZOUT")).unwrap();
  assert!(created_c && !created_d);
  assert_eq!(c.id, d.id);
  assert_ne!(a.id, c.id);
  let found = repo.find_file(&a.key()).unwrap().expect("find by key");
  assert_eq!(found.id, a.id);
  assert_eq!(found.annotation.as_deref(), Some("Model from refinement"));
  assert_eq!(repo.get_file(&c.id).unwrap().map(|f| f.name), Some(None));
  assert_eq!(repo.list_files(&job.id).unwrap().len(), 2);
}

#[test]
fn empty_name_matches_absent_name_on_lookup() {
  let dir = tempfile::tempdir().unwrap();
  let Some(repo) = sqlite_repo(&dir) else { return };
  let job = saved_job(&repo);
  let (a, created_a) = repo.get_or_create_file(new_file(job.id, Some(""), "XYZOUT")).unwrap();
  let (b, created_b) = repo.get_or_create_file(new_file(job.id, None, "XYZOUT")).unwrap();
  assert!(created_a && !created_b);
  assert_eq!(a.id, b.id);
  let found = repo.find_file(&b.key()).unwrap().expect("find by key");
  assert_eq!(found.id, a.id);
  assert_eq!(repo.list_files(&job.id).unwrap().len(), 1);
}

#[test]
fn file_creation_requires_job_and_type() {
  let dir = tempfile::tempdir().unwrap();
  let Some(repo) = sqlite_repo(&dir) else { return };
  let job = saved_job(&repo);
  assert!(matches!(repo.get_or_create_file(new_file(Uuid::new_v4(), Some("x"), "p")), Err(GleanError::NotFound(_))));
  let mut nf = new_file(job.id, Some("x"), "p");
  nf.file_type = "application/nope".into();
  assert!(matches!(repo.get_or_create_file(nf), Err(GleanError::NotFound(_))));
  assert!(repo.list_files(&job.id).unwrap().is_empty());
}

#[test]
fn file_use_is_unique_per_file_job_and_role() {
  let dir = tempfile::tempdir().unwrap();
  let Some(repo) = sqlite_repo(&dir) else { return };
  let producer = saved_job(&repo);
  let consumer = saved_job(&repo);
  let (file, _) = repo.get_or_create_file(new_file(producer.id, Some("XYZOUT.pdb"), "XYZOUT")).unwrap();
  let new_use = |param: &str| NewFileUse { file_id: file.id,
                                           job_id: consumer.id,
                                           role: Role::In,
                                           job_param_name: param.into() };
  let (u1, created1) = repo.get_or_create_file_use(new_use("XYZIN")).unwrap();
  let (u2, created2) = repo.get_or_create_file_use(new_use("XYZIN_2")).unwrap();
  assert!(created1 && !created2);
  assert_eq!(u1.id, u2.id);
  assert_eq!(u2.job_param_name, "XYZIN");
  let found = repo.find_file_use(&file.id, &consumer.id, Role::In).unwrap().expect("use");
  assert_eq!(found.id, u1.id);
  assert!(repo.find_file_use(&file.id, &consumer.id, Role::Out).unwrap().is_none());
  let missing = NewFileUse { file_id: Uuid::new_v4(),
                             job_id: consumer.id,
                             role: Role::In,
                             job_param_name: "XYZIN".into() };
  assert!(matches!(repo.get_or_create_file_use(missing), Err(GleanError::NotFound(_))));
  assert_eq!(repo.list_file_uses(&consumer.id).unwrap().len(), 1);
}

#[test]
fn indicator_values_are_appended() {
  let dir = tempfile::tempdir().unwrap();
  let Some(repo) = sqlite_repo(&dir) else { return };
  let job = saved_job(&repo);
  let (key, created) = repo.get_or_create_value_key("RFactor").unwrap();
  let (again, created_again) = repo.get_or_create_value_key("RFactor").unwrap();
  assert!(created && !created_again);
  assert_eq!(key, again);
  assert_eq!(key.description, "RFactor");
  repo.add_float_value(&job.id, &key, 0.21).unwrap();
  repo.add_float_value(&job.id, &key, 0.19).unwrap();
  let (space, _) = repo.get_or_create_value_key("spaceGroup").unwrap();
  repo.add_char_value(&job.id, &space, "P 21 21 21").unwrap();
  let floats = repo.list_float_values(&job.id).unwrap();
  assert_eq!(floats.len(), 2);
  assert!(floats.iter().all(|v| v.key == "RFactor"));
  let chars = repo.list_char_values(&job.id).unwrap();
  assert_eq!(chars.len(), 1);
  assert_eq!(chars[0].value, "P 21 21 21");
  assert!(matches!(repo.add_float_value(&Uuid::new_v4(), &key, 1.0), Err(GleanError::NotFound(_))));
}

#[test]
fn concurrent_get_or_create_file_yields_single_row() {
  let dir = tempfile::tempdir().unwrap();
  let Some(repo) = sqlite_repo(&dir) else { return };
  let job = saved_job(&repo);
  let repo = Arc::new(repo);
  let handles: Vec<_> = (0..4).map(|_| {
                                let repo = Arc::clone(&repo);
                                let job_id = job.id;
                                thread::spawn(move || {
                                  repo.get_or_create_file(new_file(job_id, Some("HKLOUT.mtz"), "HKLOUT"))
                                      .expect("get_or_create")
                                })
                              })
                              .collect();
  let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
  assert_eq!(results.iter().filter(|(_, created)| *created).count(), 1);
  assert!(results.iter().all(|(f, _)| f.id == results[0].0.id));
  assert_eq!(repo.list_files(&job.id).unwrap().len(), 1);
}
