use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use reminders_models::reminder::ReminderPayload;
use tokio::{
    sync::RwLock,
    task::{self, JoinHandle},
};
use tokio_util::sync::CancellationToken;

use crate::{
    DeferredScheduler, JobHandler,
    job::{DeferredJob, JobId},
    store::JobStore,
};

type JobTaskStore = RwLock<HashMap<JobId, JoinHandle<()>>>;

/// Durable one-shot scheduler.
///
/// Jobs are written to the [`JobStore`] before their timer is armed and removed once the
/// handler has run, so anything still in the store after a restart is picked up again by
/// [`DeferredJobScheduler::resume`].
pub struct DeferredJobScheduler {
    tasks: Arc<JobTaskStore>,
    store: Arc<dyn JobStore>,
    handler: Arc<dyn JobHandler>,
    shutdown: CancellationToken,
}

impl DeferredJobScheduler {
    pub fn new(
        store: Arc<dyn JobStore>,
        handler: Arc<dyn JobHandler>,
        cleanup_interval: Duration,
    ) -> Self {
        let tasks = Arc::new(RwLock::new(HashMap::new()));
        let shutdown = CancellationToken::new();
        Self::spawn_cleanup_task(Arc::clone(&tasks), cleanup_interval, shutdown.child_token());

        Self {
            tasks,
            store,
            handler,
            shutdown,
        }
    }

    /// Re-arms every job left in the store. Overdue jobs fire right away. Jobs that already
    /// have a timer are left alone.
    pub async fn resume(&self) -> anyhow::Result<usize> {
        let jobs = self.store.get_all().await?;
        let count = jobs.len();
        let now = Utc::now();

        for job in jobs {
            let delay = job.remaining_delay(now);
            self.arm(job, delay).await;
        }

        log::info!("Resumed {count} deferred jobs");
        Ok(count)
    }

    /// Stops pending timers. Their jobs stay in the store for the next [`resume`](Self::resume).
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Arms a timer for the job unless one is already tracked for its id.
    async fn arm(&self, job: DeferredJob, delay: Duration) {
        let job_id = job.id;
        let mut tasks = self.tasks.write().await;
        let Entry::Vacant(entry) = tasks.entry(job_id) else {
            log::info!("Job is already armed, skipping. [job_id = {}]", job_id);
            return;
        };

        log::info!("[ARM] Job fires in {:?}. [job_id = {}]", delay, job_id);

        let store = Arc::clone(&self.store);
        let handler = Arc::clone(&self.handler);
        let cancellation_token = self.shutdown.child_token();

        let task = task::spawn(async move {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    log::info!("Timer stopped before firing. [job_id = {}]", job_id);
                }
                _ = tokio::time::sleep(delay) => {
                    run_job(job, store.as_ref(), handler.as_ref()).await;
                }
            }
        });

        entry.insert(task);
    }

    fn spawn_cleanup_task(
        tasks: Arc<JobTaskStore>,
        interval: Duration,
        cancellation_token: CancellationToken,
    ) {
        task::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {
                        Self::clean_finished_tasks(&tasks).await;
                    }
                    _ = cancellation_token.cancelled() => {
                        log::info!("Cleanup task shutting down");
                        break;
                    }
                };
            }
        });
    }

    async fn clean_finished_tasks(tasks: &JobTaskStore) {
        let mut tasks = tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, handle| !handle.is_finished());
        let after = tasks.len();

        if before != after {
            log::info!("Cleaned up {} finished job tasks", before - after);
        }
    }
}

impl Drop for DeferredJobScheduler {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[async_trait]
impl DeferredScheduler for DeferredJobScheduler {
    async fn schedule_once(&self, delay: Duration, payload: ReminderPayload) -> anyhow::Result<()> {
        let run_at = Utc::now() + chrono::Duration::from_std(delay)?;
        let job = DeferredJob::new(run_at, payload);

        self.store.insert(job.clone()).await?;
        self.arm(job, delay).await;

        Ok(())
    }
}

async fn run_job(job: DeferredJob, store: &dyn JobStore, handler: &dyn JobHandler) {
    log::info!("[FIRE] Running job. [job_id = {}]", job.id);

    if let Err(error) = handler.handle_job(&job.payload).await {
        log::warn!(
            "Job handler failed, the job will not be retried. [job_id = {}, error = {:#}]",
            job.id,
            error
        );
    }

    if let Err(error) = store.remove(job.id).await {
        log::error!(
            "Could not remove finished job from the store. [job_id = {}, error = {:#}]",
            job.id,
            error
        );
    }
}
