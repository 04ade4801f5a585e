use std::sync::Arc;

use async_trait::async_trait;
use reminders_models::reminder::ReminderPayload;
use reminders_notify::Notifier;
use reminders_scheduler::JobHandler;

/// Renders fired reminder jobs as notifications.
pub struct NotificationJobHandler {
    notifier: Arc<dyn Notifier>,
}

impl NotificationJobHandler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl JobHandler for NotificationJobHandler {
    async fn handle_job(&self, payload: &ReminderPayload) -> anyhow::Result<()> {
        let notifier = Arc::clone(&self.notifier);
        let ReminderPayload { title, message } = payload.clone();

        // Desktop notification services are reached through blocking calls.
        tokio::task::spawn_blocking(move || notifier.notify(&title, &message)).await??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use chrono::{TimeDelta, TimeZone, Utc};
    use reminders_models::reminder::ReminderCategory;
    use reminders_notify::{NotificationBackend, NotificationChannel, NotificationRenderer};
    use reminders_scheduler::{DeferredJobScheduler, InMemoryJobStore};

    use crate::{form::ReminderForm, registrar::ReminderRegistrar};

    use super::*;

    #[derive(Default)]
    struct RecordingNotifier {
        shown: Mutex<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, message: &str) -> anyhow::Result<()> {
            self.shown
                .lock()
                .unwrap()
                .push((title.to_owned(), message.to_owned()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        channels: Mutex<Vec<String>>,
        posted: Mutex<Vec<(String, String)>>,
    }

    impl NotificationBackend for RecordingBackend {
        fn create_channel(&self, channel: &NotificationChannel) -> anyhow::Result<()> {
            self.channels.lock().unwrap().push(channel.id.clone());
            Ok(())
        }

        fn post(&self, notification: &reminders_notify::Notification) -> anyhow::Result<()> {
            self.posted
                .lock()
                .unwrap()
                .push((notification.title.clone(), notification.message.clone()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn payload_is_shown_as_notification() {
        let notifier = Arc::new(RecordingNotifier::default());
        let handler = NotificationJobHandler::new(notifier.clone());

        handler
            .handle_job(&ReminderPayload::new("Todo: Call", "Call mom"))
            .await
            .unwrap();

        assert_eq!(
            *notifier.shown.lock().unwrap(),
            vec![("Todo: Call".to_owned(), "Call mom".to_owned())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn submitted_reminder_is_notified_once_when_due() {
        let backend = Arc::new(RecordingBackend::default());
        let renderer = Arc::new(NotificationRenderer::new(backend.clone()));
        let scheduler = Arc::new(DeferredJobScheduler::new(
            Arc::new(InMemoryJobStore::new()),
            Arc::new(NotificationJobHandler::new(renderer)),
            Duration::from_secs(300),
        ));
        let registrar = ReminderRegistrar::new(scheduler.clone());

        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let fire_at = now + TimeDelta::seconds(60);
        let mut form = ReminderForm::new(chrono_tz::Tz::UTC);
        form.set_title("Call mom");
        form.set_category(ReminderCategory::Call);
        form.pick(fire_at.date_naive(), fire_at.time());
        let submission = form.submit(now).unwrap();
        let delay = Duration::from_secs(submission.delay_seconds);

        registrar.register(submission).await.unwrap();

        assert_eq!(delay, Duration::from_secs(60));
        tokio::time::sleep(delay - Duration::from_secs(1)).await;
        assert!(backend.posted.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::time::sleep(Duration::from_secs(3600)).await;

        assert_eq!(
            *backend.posted.lock().unwrap(),
            vec![("Todo: Call".to_owned(), "Call mom".to_owned())]
        );
        assert_eq!(backend.channels.lock().unwrap().len(), 1);
    }
}
