mod deferred_job_scheduler;
mod handler;
mod job;
mod scheduler;
mod store;

pub use deferred_job_scheduler::DeferredJobScheduler;
pub use handler::JobHandler;
pub use job::{DeferredJob, JobId};
pub use scheduler::DeferredScheduler;
pub use store::{FileJobStore, InMemoryJobStore, JobStore, StoreError};
