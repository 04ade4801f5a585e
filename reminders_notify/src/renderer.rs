use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    Notifier,
    backend::NotificationBackend,
    channel::{ChannelRegistry, NotificationChannel},
    notification::Notification,
};

pub struct NotificationRenderer {
    backend: Arc<dyn NotificationBackend>,
    channel: NotificationChannel,
    created_channels: Mutex<ChannelRegistry>,
}

impl NotificationRenderer {
    pub fn new(backend: Arc<dyn NotificationBackend>) -> Self {
        Self {
            backend,
            channel: NotificationChannel::reminders(),
            created_channels: Mutex::new(ChannelRegistry::new()),
        }
    }

    /// Creates the reminder channel on first use only.
    pub fn ensure_channel(&self) -> anyhow::Result<()> {
        let mut created = self
            .created_channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if created.contains(&self.channel.id) {
            return Ok(());
        }

        self.backend.create_channel(&self.channel)?;
        created.register(self.channel.clone());
        Ok(())
    }
}

impl Notifier for NotificationRenderer {
    fn notify(&self, title: &str, message: &str) -> anyhow::Result<()> {
        self.ensure_channel()?;

        let notification = Notification::reminder(&self.channel.id, title, message);
        self.backend.post(&notification)
    }
}
