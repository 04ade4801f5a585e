use std::collections::HashMap;

pub const REMINDER_CHANNEL_ID: &str = "REMINDER_NOTIFICATIONS";

/// Reminder channels only use the platform default importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
}

impl NotificationChannel {
    pub fn reminders() -> Self {
        Self {
            id: REMINDER_CHANNEL_ID.to_owned(),
            name: REMINDER_CHANNEL_ID.to_owned(),
            description: "Reminder channel to display all user scheduled reminders".to_owned(),
            importance: Importance::Default,
        }
    }
}

/// Channels known to a backend, keyed by id.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, NotificationChannel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when a channel with the same id was already registered; the existing
    /// entry is kept.
    pub fn register(&mut self, channel: NotificationChannel) -> bool {
        if self.channels.contains_key(&channel.id) {
            return false;
        }
        self.channels.insert(channel.id.clone(), channel);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.channels.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&NotificationChannel> {
        self.channels.get(id)
    }
}
