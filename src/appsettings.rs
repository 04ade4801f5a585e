use std::path::PathBuf;

use anyhow::anyhow;
use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::form::ReminderTimeZone;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GeneralSettings {
    /// IANA zone name. Unset or empty means the host's local time.
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SchedulerSettings {
    pub store_path: PathBuf,
    pub cleanup_interval_secs: u64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationBackendKind {
    Desktop,
    Log,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NotificationSettings {
    pub backend: NotificationBackendKind,
    pub require_consent: bool,
    pub consent_path: PathBuf,
    pub app_name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    pub scheduler: SchedulerSettings,
    pub notifications: NotificationSettings,
}

impl AppSettings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("scheduler.store_path", "reminder_jobs.json")?
            .set_default("scheduler.cleanup_interval_secs", 300_i64)?
            .set_default("notifications.backend", "desktop")?
            .set_default("notifications.require_consent", false)?
            .set_default("notifications.consent_path", "notification_consent")?
            .set_default("notifications.app_name", "reminders")
    }

    pub fn timezone(&self) -> anyhow::Result<ReminderTimeZone> {
        match self.general.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(ReminderTimeZone::Host),
            Some(name) => name
                .parse::<Tz>()
                .map(ReminderTimeZone::Named)
                .map_err(|_| anyhow!("Unknown time zone {:?}", name)),
        }
    }
}
