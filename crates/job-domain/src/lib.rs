mod domain_stubs;
mod errors;
mod file;
mod glean_repository;
mod job;
mod job_value;

pub use errors::{GleanError, Result};
pub use file::{File, FileKey, FileType, FileUse, NewFile, NewFileUse, Role, JOB_DIRECTORY, UNKNOWN_FILE_TYPE};
pub use glean_repository::{GleanRepository, InMemoryGleanRepository};
pub use job::{Job, JobStatus};
pub use job_value::{JobCharValue, JobFloatValue, JobValueKey};
pub use domain_stubs::DomainStubs;
