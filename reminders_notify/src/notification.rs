use chrono::Utc;

/// Reminders are always posted with high priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
}

/// Screen the notification points the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    OpenMainScreen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u32,
    pub channel_id: String,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub tap_action: TapAction,
}

impl Notification {
    pub fn reminder(channel_id: &str, title: &str, message: &str) -> Self {
        Self {
            id: notification_id(Utc::now().timestamp_millis()),
            channel_id: channel_id.to_owned(),
            title: title.to_owned(),
            message: message.to_owned(),
            priority: Priority::High,
            tap_action: TapAction::OpenMainScreen,
        }
    }
}

/// Last five digits of the epoch millis.
pub(crate) fn notification_id(epoch_millis: i64) -> u32 {
    epoch_millis.rem_euclid(100_000) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_last_five_digits_of_millis() {
        assert_eq!(notification_id(1_760_000_012_345), 12_345);
        assert_eq!(notification_id(99), 99);
    }

    #[test]
    fn reminder_notification_is_high_priority_and_opens_main_screen() {
        let notification =
            Notification::reminder("REMINDER_NOTIFICATIONS", "Todo: Call", "Call mom");

        assert_eq!(notification.priority, Priority::High);
        assert_eq!(notification.tap_action, TapAction::OpenMainScreen);
        assert!(notification.id < 100_000);
    }
}
