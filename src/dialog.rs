use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reminders_models::reminder::ReminderCategory;

use crate::{
    form::{FormError, FormField, ReminderForm},
    registrar::ReminderRegistrar,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    EditTitle,
    ChooseCategory,
    PickDateAndTime,
    Submit,
    Cancel,
}

/// What the form currently shows, including inline field errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: String,
    pub title_error: Option<String>,
    pub category: ReminderCategory,
    pub fire_time: String,
    pub fire_time_error: Option<String>,
}

pub trait FormUi {
    fn choose_action(&mut self, view: &FormView) -> anyhow::Result<FormAction>;
    fn edit_title(&mut self, current: &str) -> anyhow::Result<String>;
    fn choose_category(&mut self, current: ReminderCategory) -> anyhow::Result<ReminderCategory>;
    /// `None` when the picker was dismissed.
    fn pick_date(&mut self, default: NaiveDate) -> anyhow::Result<Option<NaiveDate>>;
    /// `None` when the picker was dismissed.
    fn pick_time(&mut self, default: NaiveTime) -> anyhow::Result<Option<NaiveTime>>;
    fn show_message(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatingReminderState {
    Editing,
    PickingDate,
    PickingTime { date: NaiveDate },
    Submitted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Added,
    Cancelled,
}

#[derive(Debug, Default)]
struct FieldErrors {
    title: Option<FormError>,
    fire_time: Option<FormError>,
}

pub struct ReminderDialog<'a, C> {
    form: ReminderForm,
    registrar: &'a ReminderRegistrar,
    clock: C,
    errors: FieldErrors,
}

impl<'a, C> ReminderDialog<'a, C>
where
    C: Fn() -> DateTime<Utc>,
{
    pub fn new(form: ReminderForm, registrar: &'a ReminderRegistrar, clock: C) -> Self {
        Self {
            form,
            registrar,
            clock,
            errors: FieldErrors::default(),
        }
    }

    pub async fn run(mut self, ui: &mut dyn FormUi) -> anyhow::Result<DialogOutcome> {
        let mut state = CreatingReminderState::Editing;
        loop {
            state = match state {
                CreatingReminderState::Editing => self.handle_editing(ui).await?,
                CreatingReminderState::PickingDate => {
                    let (default_date, _) = self.form.picker_defaults((self.clock)());
                    match ui.pick_date(default_date)? {
                        Some(date) => CreatingReminderState::PickingTime { date },
                        None => CreatingReminderState::Editing,
                    }
                }
                CreatingReminderState::PickingTime { date } => {
                    let (_, default_time) = self.form.picker_defaults((self.clock)());
                    if let Some(time) = ui.pick_time(default_time)? {
                        self.form.pick(date, time);
                        self.errors.fire_time = None;
                        log::debug!("Picked fire time {}", self.form.fire_time_display());
                    }
                    CreatingReminderState::Editing
                }
                CreatingReminderState::Submitted => return Ok(DialogOutcome::Added),
                CreatingReminderState::Cancelled => return Ok(DialogOutcome::Cancelled),
            };
        }
    }

    async fn handle_editing(
        &mut self,
        ui: &mut dyn FormUi,
    ) -> anyhow::Result<CreatingReminderState> {
        let next = match ui.choose_action(&self.view())? {
            FormAction::EditTitle => {
                let title = ui.edit_title(self.form.title())?;
                self.form.set_title(title);
                self.errors.title = None;
                CreatingReminderState::Editing
            }
            FormAction::ChooseCategory => {
                let category = ui.choose_category(self.form.category())?;
                self.form.set_category(category);
                CreatingReminderState::Editing
            }
            FormAction::PickDateAndTime => CreatingReminderState::PickingDate,
            FormAction::Submit => self.submit(ui).await,
            FormAction::Cancel => CreatingReminderState::Cancelled,
        };

        Ok(next)
    }

    async fn submit(&mut self, ui: &mut dyn FormUi) -> CreatingReminderState {
        let submission = match self.form.submit((self.clock)()) {
            Ok(submission) => submission,
            Err(error) => {
                match error.field() {
                    Some(FormField::Title) => self.errors.title = Some(error),
                    Some(FormField::FireTime) => self.errors.fire_time = Some(error),
                    None => ui.show_message(&error.to_string()),
                }
                return CreatingReminderState::Editing;
            }
        };

        match self.registrar.register(submission).await {
            Ok(()) => {
                ui.show_message("Reminder added");
                CreatingReminderState::Submitted
            }
            Err(error) => {
                log::error!("Could not register reminder: {:#}", error);
                ui.show_message("Could not schedule the reminder, please try again");
                CreatingReminderState::Editing
            }
        }
    }

    fn view(&self) -> FormView {
        FormView {
            title: self.form.title().to_owned(),
            title_error: self.errors.title.as_ref().map(ToString::to_string),
            category: self.form.category(),
            fire_time: self.form.fire_time_display(),
            fire_time_error: self.errors.fire_time.as_ref().map(ToString::to_string),
        }
    }
}
