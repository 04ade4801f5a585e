use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use dialoguer::{Confirm, Input, Select};
use reminders_models::reminder::ReminderCategory;

use crate::{
    app::{MainAction, MainScreenUi},
    dialog::{FormAction, FormUi, FormView},
    permission::{ConsentAnswer, ConsentPrompt, PermissionDialogs},
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Interactive prompts on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalUi;

impl TerminalUi {
    fn print_message(&self, message: &str) {
        println!("\n  * {message}\n");
    }

    /// Reads a value, returning `None` when the input is left empty.
    fn read_optional<T>(
        &self,
        prompt: &str,
        initial: String,
        parse: fn(&str) -> Option<T>,
        hint: &'static str,
    ) -> anyhow::Result<Option<T>> {
        let input: String = Input::new()
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), &'static str> {
                let input = input.trim();
                if input.is_empty() || parse(input).is_some() {
                    Ok(())
                } else {
                    Err(hint)
                }
            })
            .interact_text()?;

        Ok(parse(input.trim()))
    }
}

impl MainScreenUi for TerminalUi {
    fn choose_main_action(&mut self) -> anyhow::Result<MainAction> {
        let selection = Select::new()
            .with_prompt("Reminders")
            .items(&["Add reminder", "Quit"])
            .default(0)
            .interact_opt()?;

        Ok(match selection {
            Some(0) => MainAction::AddReminder,
            _ => MainAction::Quit,
        })
    }
}

impl FormUi for TerminalUi {
    fn choose_action(&mut self, view: &FormView) -> anyhow::Result<FormAction> {
        let title = match &view.title_error {
            Some(error) => format!("Title: {} [{}]", view.title, error),
            None => format!("Title: {}", view.title),
        };
        let fire_time = match &view.fire_time_error {
            Some(error) => format!("Date and time: {} [{}]", view.fire_time, error),
            None => format!("Date and time: {}", view.fire_time),
        };
        let items = [
            title,
            format!("Category: {}", view.category),
            fire_time,
            "Add".to_owned(),
            "Cancel".to_owned(),
        ];

        let selection = Select::new()
            .with_prompt("New reminder")
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(match selection {
            Some(0) => FormAction::EditTitle,
            Some(1) => FormAction::ChooseCategory,
            Some(2) => FormAction::PickDateAndTime,
            Some(3) => FormAction::Submit,
            _ => FormAction::Cancel,
        })
    }

    fn edit_title(&mut self, current: &str) -> anyhow::Result<String> {
        let title = Input::<String>::new()
            .with_prompt("Title")
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()?;

        Ok(title)
    }

    fn choose_category(&mut self, current: ReminderCategory) -> anyhow::Result<ReminderCategory> {
        let default = ReminderCategory::ALL
            .iter()
            .position(|category| *category == current)
            .unwrap_or(0);
        let names: Vec<&str> = ReminderCategory::ALL.iter().map(|c| c.name()).collect();

        let selection = Select::new()
            .with_prompt("Category")
            .items(&names)
            .default(default)
            .interact_opt()?;

        Ok(selection
            .and_then(|index| ReminderCategory::ALL.get(index).copied())
            .unwrap_or(current))
    }

    fn pick_date(&mut self, default: NaiveDate) -> anyhow::Result<Option<NaiveDate>> {
        self.read_optional(
            "Date (YYYY-MM-DD, empty to cancel)",
            default.format(DATE_FORMAT).to_string(),
            |input| NaiveDate::parse_from_str(input, DATE_FORMAT).ok(),
            "Expected a date like 2026-12-24",
        )
    }

    fn pick_time(&mut self, default: NaiveTime) -> anyhow::Result<Option<NaiveTime>> {
        self.read_optional(
            "Time (HH:MM, empty to cancel)",
            default.format(TIME_FORMAT).to_string(),
            |input| NaiveTime::parse_from_str(input, TIME_FORMAT).ok(),
            "Expected a 24-hour time like 18:30",
        )
    }

    fn show_message(&mut self, message: &str) {
        self.print_message(message);
    }
}

impl PermissionDialogs for TerminalUi {
    fn confirm_permission_dialog(&mut self) -> anyhow::Result<bool> {
        let ok = Confirm::new()
            .with_prompt("Notification permission required to show notifications. Continue?")
            .default(true)
            .interact_opt()?;

        Ok(ok.unwrap_or(false))
    }

    fn confirm_settings_dialog(&mut self) -> anyhow::Result<bool> {
        let ok = Confirm::new()
            .with_prompt(
                "Notification permission was denied. Open settings to enable notifications?",
            )
            .default(true)
            .interact_opt()?;

        Ok(ok.unwrap_or(false))
    }

    fn show_message(&mut self, message: &str) {
        self.print_message(message);
    }
}

impl ConsentPrompt for TerminalUi {
    fn ask_consent(&mut self) -> anyhow::Result<ConsentAnswer> {
        let selection = Select::new()
            .with_prompt("Allow reminders to send you notifications?")
            .items(&["Allow", "Don't allow", "Don't allow, don't ask again"])
            .default(0)
            .interact_opt()?;

        Ok(match selection {
            Some(0) => ConsentAnswer::Allow,
            Some(2) => ConsentAnswer::DenyAndDontAskAgain,
            _ => ConsentAnswer::Deny,
        })
    }

    fn show_settings_location(&mut self, path: &Path) {
        self.print_message(&format!(
            "Notification consent is stored in {}. Write `granted` to it to enable notifications.",
            path.display()
        ));
    }
}
