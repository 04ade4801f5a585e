use std::{sync::Arc, time::Duration};

use reminders_scheduler::DeferredScheduler;

use crate::form::Submission;

/// Turns a submitted reminder into a deferred job. Nothing about the reminder is kept afterwards.
pub struct ReminderRegistrar {
    scheduler: Arc<dyn DeferredScheduler>,
}

impl ReminderRegistrar {
    pub fn new(scheduler: Arc<dyn DeferredScheduler>) -> Self {
        Self { scheduler }
    }

    pub async fn register(&self, submission: Submission) -> anyhow::Result<()> {
        let payload = submission.reminder.payload();
        log::info!(
            "Registering reminder. [category = {}, fire_at = {}, delay_seconds = {}]",
            submission.reminder.category,
            submission.reminder.fire_at,
            submission.delay_seconds
        );

        self.scheduler
            .schedule_once(Duration::from_secs(submission.delay_seconds), payload)
            .await
    }
}
