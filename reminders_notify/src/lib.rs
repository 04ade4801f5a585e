mod backend;
mod channel;
mod notification;
mod renderer;

pub use backend::{DesktopBackend, LogBackend, NotificationBackend};
pub use channel::{ChannelRegistry, Importance, NotificationChannel, REMINDER_CHANNEL_ID};
pub use notification::{Notification, Priority, TapAction};
pub use renderer::NotificationRenderer;

/// Shows a one-shot notification to the user.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, title: &str, message: &str) -> anyhow::Result<()>;
}
