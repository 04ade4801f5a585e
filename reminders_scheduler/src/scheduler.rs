use std::time::Duration;

use async_trait::async_trait;
use reminders_models::reminder::ReminderPayload;

/// Runs a payload once, at or after `delay` from now.
///
/// Implementations are fire-and-forget: nothing is handed back that could be used to list,
/// edit or cancel the work afterwards.
#[async_trait]
pub trait DeferredScheduler: Send + Sync + 'static {
    async fn schedule_once(&self, delay: Duration, payload: ReminderPayload) -> anyhow::Result<()>;
}
