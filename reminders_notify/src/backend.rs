use std::sync::{Mutex, MutexGuard, PoisonError};

use notify_rust::{Notification as DesktopNotification, Timeout};

use crate::{
    channel::{ChannelRegistry, NotificationChannel},
    notification::{Notification, Priority},
};

/// Platform side of the notification renderer.
pub trait NotificationBackend: Send + Sync + 'static {
    fn create_channel(&self, channel: &NotificationChannel) -> anyhow::Result<()>;
    fn post(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Posts through the desktop notification service (D-Bus, Windows toasts or macOS).
///
/// The tap action is informational here: the main screen is the running terminal session,
/// so a notification only tells the user to return to it and carries no click handler.
pub struct DesktopBackend {
    app_name: String,
    icon: String,
    channels: Mutex<ChannelRegistry>,
}

impl DesktopBackend {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            icon: "alarm-clock".to_owned(),
            channels: Mutex::new(ChannelRegistry::new()),
        }
    }

    fn channels(&self) -> MutexGuard<'_, ChannelRegistry> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn build(&self, notification: &Notification) -> DesktopNotification {
        let timeout = match notification.priority {
            Priority::High => Timeout::Never,
        };

        let mut desktop_notification = DesktopNotification::new();
        desktop_notification
            .summary(&notification.title)
            .body(&notification.message)
            .appname(&self.app_name)
            .icon(&self.icon)
            .timeout(timeout);
        desktop_notification
    }
}

impl NotificationBackend for DesktopBackend {
    fn create_channel(&self, channel: &NotificationChannel) -> anyhow::Result<()> {
        if self.channels().register(channel.clone()) {
            log::info!("Created notification channel {}", channel.id);
        }
        Ok(())
    }

    fn post(&self, notification: &Notification) -> anyhow::Result<()> {
        if !self.channels().contains(&notification.channel_id) {
            anyhow::bail!("Unknown notification channel {}", notification.channel_id);
        }

        self.build(notification).show()?;
        log::info!(
            "Posted desktop notification. [notification_id = {}, tap_action = {:?}]",
            notification.id,
            notification.tap_action
        );
        Ok(())
    }
}

/// Writes notifications to the log. Used where no notification service is available.
#[derive(Default)]
pub struct LogBackend {
    channels: Mutex<ChannelRegistry>,
}

impl LogBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationBackend for LogBackend {
    fn create_channel(&self, channel: &NotificationChannel) -> anyhow::Result<()> {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        if channels.register(channel.clone()) {
            log::info!("Created notification channel {}", channel.id);
        }
        Ok(())
    }

    fn post(&self, notification: &Notification) -> anyhow::Result<()> {
        log::info!(
            "[NOTIFY] {}: {} [notification_id = {}, channel = {}, tap_action = {:?}]",
            notification.title,
            notification.message,
            notification.id,
            notification.channel_id,
            notification.tap_action
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::REMINDER_CHANNEL_ID;

    use super::*;

    #[test]
    fn desktop_notification_has_no_click_handlers() {
        let backend = DesktopBackend::new("reminders");
        let notification = Notification::reminder(REMINDER_CHANNEL_ID, "Todo: Call", "Call mom");

        let desktop_notification = backend.build(&notification);

        assert_eq!(desktop_notification.summary, "Todo: Call");
        assert_eq!(desktop_notification.body, "Call mom");
        assert_eq!(desktop_notification.appname, "reminders");
        assert!(desktop_notification.actions.is_empty());
    }

    #[test]
    fn posting_to_unknown_channel_fails() {
        let backend = DesktopBackend::new("reminders");
        let notification = Notification::reminder(REMINDER_CHANNEL_ID, "Todo: Call", "Call mom");

        assert!(backend.post(&notification).is_err());
    }
}
