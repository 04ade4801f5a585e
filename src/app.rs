use chrono::Utc;
use crate::{
    dialog::{DialogOutcome, FormUi, ReminderDialog},
    form::{ReminderForm, ReminderTimeZone},
    permission::{PermissionDialogs, PermissionFlow, PermissionPlatform},
    registrar::ReminderRegistrar,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainAction {
    AddReminder,
    Quit,
}

pub trait MainScreenUi: FormUi + PermissionDialogs {
    fn choose_main_action(&mut self) -> anyhow::Result<MainAction>;
}

pub struct App<U, P> {
    ui: U,
    platform: P,
    flow: PermissionFlow,
    registrar: ReminderRegistrar,
    timezone: ReminderTimeZone,
}

impl<U, P> App<U, P>
where
    U: MainScreenUi,
    P: PermissionPlatform,
{
    pub fn new(
        ui: U,
        platform: P,
        registrar: ReminderRegistrar,
        timezone: impl Into<ReminderTimeZone>,
    ) -> Self {
        Self {
            ui,
            platform,
            flow: PermissionFlow::new(),
            registrar,
            timezone: timezone.into(),
        }
    }

    /// Runs the main screen until the user quits.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        log::info!("Main screen started");

        loop {
            match self.ui.choose_main_action()? {
                MainAction::AddReminder => self.add_reminder().await?,
                MainAction::Quit => {
                    log::info!("Main screen closed");
                    return Ok(());
                }
            }
        }
    }

    async fn add_reminder(&mut self) -> anyhow::Result<()> {
        if !self
            .flow
            .ensure_permission(&mut self.platform, &mut self.ui)?
        {
            log::info!(
                "Notification permission missing, form not opened. [state = {:?}]",
                self.flow.state()
            );
            return Ok(());
        }

        let form = ReminderForm::new(self.timezone);
        let dialog = ReminderDialog::new(form, &self.registrar, Utc::now);
        match dialog.run(&mut self.ui).await? {
            DialogOutcome::Added => log::debug!("Reminder form closed after adding"),
            DialogOutcome::Cancelled => log::debug!("Reminder form cancelled"),
        }

        Ok(())
    }
}
