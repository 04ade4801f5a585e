use std::{
    collections::HashMap,
    io::ErrorKind,
    path::PathBuf,
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::job::{DeferredJob, JobId};

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: DeferredJob) -> anyhow::Result<()>;
    async fn remove(&self, id: JobId) -> anyhow::Result<()>;
    async fn get_all(&self) -> anyhow::Result<Vec<DeferredJob>>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not access job store at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Job store at {path} is corrupt")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct InMemoryJobStore {
    store: RwLock<HashMap<JobId, DeferredJob>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        InMemoryJobStore {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: DeferredJob) -> anyhow::Result<()> {
        let mut store = self.store.write().await;
        if store.contains_key(&job.id) {
            anyhow::bail!("Job {} is already stored", job.id);
        }
        store.insert(job.id, job);
        Ok(())
    }

    async fn remove(&self, id: JobId) -> anyhow::Result<()> {
        self.store.write().await.remove(&id);
        Ok(())
    }

    async fn get_all(&self) -> anyhow::Result<Vec<DeferredJob>> {
        let store = self.store.read().await;
        let mut jobs: Vec<DeferredJob> = store.values().cloned().collect();
        jobs.sort_by_key(|job| job.run_at);
        Ok(jobs)
    }
}

/// Keeps pending jobs in a JSON file so they outlive the process.
///
/// Every change rewrites the whole file through a sibling temp file followed by a rename, so a
/// crash mid-write leaves the previous contents intact.
pub struct FileJobStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileJobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_jobs(&self) -> Result<Vec<DeferredJob>, StoreError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if contents.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_jobs(&self, mut jobs: Vec<DeferredJob>) -> Result<(), StoreError> {
        jobs.sort_by_key(|job| job.run_at);
        let contents = serde_json::to_vec_pretty(&jobs).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let io_error = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, contents)
            .await
            .map_err(io_error)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(io_error)?;

        Ok(())
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn insert(&self, job: DeferredJob) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut jobs = self.read_jobs().await?;
        if jobs.iter().any(|existing| existing.id == job.id) {
            anyhow::bail!("Job {} is already stored", job.id);
        }
        jobs.push(job);
        self.write_jobs(jobs).await?;
        Ok(())
    }

    async fn remove(&self, id: JobId) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut jobs = self.read_jobs().await?;
        let before = jobs.len();
        jobs.retain(|job| job.id != id);
        if jobs.len() != before {
            self.write_jobs(jobs).await?;
        }
        Ok(())
    }

    async fn get_all(&self) -> anyhow::Result<Vec<DeferredJob>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_jobs().await?)
    }
}
