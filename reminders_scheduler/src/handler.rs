use async_trait::async_trait;
use reminders_models::reminder::ReminderPayload;

#[async_trait]
pub trait JobHandler: Send + Sync + 'static {
    async fn handle_job(&self, payload: &ReminderPayload) -> anyhow::Result<()>;
}
