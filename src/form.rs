use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use reminders_models::reminder::{Reminder, ReminderCategory};
use thiserror::Error;

pub const FIRE_TIME_PLACEHOLDER: &str = "Select date and time";

const FIRE_TIME_DISPLAY_FORMAT: &str = "%d-%m-%Y %I:%M %p";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please provide a title")]
    MissingTitle,

    #[error("Please select date and time")]
    MissingFireTime,

    #[error("{0} does not exist in the selected time zone, please pick another time")]
    NonexistentLocalTime(NaiveDateTime),

    #[error("Can't set reminders for the past")]
    FireTimeInPast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    FireTime,
}

impl FormError {
    /// The field the error is shown on. `None` means a transient message.
    pub fn field(&self) -> Option<FormField> {
        match self {
            FormError::MissingTitle => Some(FormField::Title),
            FormError::MissingFireTime | FormError::NonexistentLocalTime(_) => {
                Some(FormField::FireTime)
            }
            FormError::FireTimeInPast => None,
        }
    }
}

/// Zone the pickers work in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderTimeZone {
    /// The host's local clock.
    Host,
    Named(Tz),
}

impl ReminderTimeZone {
    fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            ReminderTimeZone::Host => instant.with_timezone(&Local).naive_local(),
            ReminderTimeZone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// `None` when the local time is skipped by a DST change. Ambiguous times resolve to the
    /// earlier instant.
    fn instant(&self, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            ReminderTimeZone::Host => Local
                .from_local_datetime(local)
                .earliest()
                .map(|instant| instant.with_timezone(&Utc)),
            ReminderTimeZone::Named(tz) => tz
                .from_local_datetime(local)
                .earliest()
                .map(|instant| instant.with_timezone(&Utc)),
        }
    }
}

impl From<Tz> for ReminderTimeZone {
    fn from(tz: Tz) -> Self {
        ReminderTimeZone::Named(tz)
    }
}

impl fmt::Display for ReminderTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderTimeZone::Host => f.write_str("host local time"),
            ReminderTimeZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// A validated reminder together with the delay until it is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub reminder: Reminder,
    pub delay_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct ReminderForm {
    timezone: ReminderTimeZone,
    title: String,
    category: ReminderCategory,
    picked: Option<NaiveDateTime>,
}

impl ReminderForm {
    pub fn new(timezone: impl Into<ReminderTimeZone>) -> Self {
        Self {
            timezone: timezone.into(),
            title: String::new(),
            category: ReminderCategory::default(),
            picked: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn category(&self) -> ReminderCategory {
        self.category
    }

    pub fn set_category(&mut self, category: ReminderCategory) {
        self.category = category;
    }

    pub fn picked(&self) -> Option<NaiveDateTime> {
        self.picked
    }

    /// Stores the result of the date and time pickers. Only hours and minutes are kept.
    pub fn pick(&mut self, date: NaiveDate, time: NaiveTime) {
        let time = time
            .with_second(0)
            .and_then(|time| time.with_nanosecond(0))
            .unwrap_or(time);
        self.picked = Some(date.and_time(time));
    }

    /// Initial values for the pickers: the last pick, or the current moment.
    pub fn picker_defaults(&self, now: DateTime<Utc>) -> (NaiveDate, NaiveTime) {
        let current = self
            .picked
            .unwrap_or_else(|| self.timezone.local_time(now));
        (current.date(), current.time())
    }

    pub fn fire_time_display(&self) -> String {
        match self.picked {
            Some(picked) => picked.format(FIRE_TIME_DISPLAY_FORMAT).to_string(),
            None => FIRE_TIME_PLACEHOLDER.to_owned(),
        }
    }

    pub fn submit(&self, now: DateTime<Utc>) -> Result<Submission, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }

        let picked = self.picked.ok_or(FormError::MissingFireTime)?;
        let fire_at = self
            .timezone
            .instant(&picked)
            .ok_or(FormError::NonexistentLocalTime(picked))?;

        let delay_seconds = fire_at.timestamp() - now.timestamp();
        let delay_seconds = u64::try_from(delay_seconds).map_err(|_| FormError::FireTimeInPast)?;

        Ok(Submission {
            reminder: Reminder {
                title: title.to_owned(),
                category: self.category,
                fire_at,
            },
            delay_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use chrono_tz::Europe;
    use proptest::prelude::*;
    use proptest_arbitrary_interop::arb;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    fn form_at(title: &str, fire_at: DateTime<Utc>) -> ReminderForm {
        let mut form = ReminderForm::new(Tz::UTC);
        form.set_title(title);
        form.pick(fire_at.date_naive(), fire_at.time());
        form
    }

    #[test]
    fn empty_title_blocks_submission() {
        let form = form_at("", now() + TimeDelta::hours(1));

        assert_eq!(form.submit(now()), Err(FormError::MissingTitle));
    }

    #[test]
    fn whitespace_title_counts_as_empty() {
        let form = form_at("   ", now() + TimeDelta::hours(1));

        assert_eq!(form.submit(now()), Err(FormError::MissingTitle));
    }

    #[test]
    fn unpicked_fire_time_blocks_submission() {
        let mut form = ReminderForm::new(Tz::UTC);
        form.set_title("Call mom");

        assert_eq!(form.submit(now()), Err(FormError::MissingFireTime));
        assert_eq!(form.fire_time_display(), FIRE_TIME_PLACEHOLDER);
    }

    #[test]
    fn past_fire_time_is_rejected() {
        let form = form_at("Call mom", now() - TimeDelta::minutes(1));

        let error = form.submit(now()).unwrap_err();

        assert_eq!(error, FormError::FireTimeInPast);
        assert_eq!(error.field(), None);
    }

    #[test]
    fn current_minute_is_a_zero_delay() {
        let form = form_at("Call mom", now());

        assert_eq!(form.submit(now()).unwrap().delay_seconds, 0);
    }

    #[test]
    fn valid_form_produces_submission() {
        let mut form = form_at("  Call mom ", now() + TimeDelta::seconds(60));
        form.set_category(ReminderCategory::Call);

        let submission = form.submit(now()).unwrap();

        assert_eq!(submission.delay_seconds, 60);
        assert_eq!(submission.reminder.title, "Call mom");
        assert_eq!(submission.reminder.category, ReminderCategory::Call);
        assert_eq!(submission.reminder.fire_at, now() + TimeDelta::seconds(60));
    }

    #[test]
    fn picked_seconds_are_dropped() {
        let mut form = ReminderForm::new(Tz::UTC);
        form.set_title("Stretch");
        form.pick(
            now().date_naive(),
            NaiveTime::from_hms_opt(10, 15, 42).unwrap(),
        );

        assert_eq!(form.submit(now()).unwrap().delay_seconds, 45 * 60);
    }

    #[test]
    fn pick_is_interpreted_in_form_timezone() {
        let mut form = ReminderForm::new(Tz::Europe__Berlin);
        form.set_title("Standup");
        // 11:30 CEST is 09:30 UTC.
        form.pick(
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            NaiveTime::from_hms_opt(11, 31, 0).unwrap(),
        );

        assert_eq!(form.submit(now()).unwrap().delay_seconds, 60);
    }

    #[test]
    fn time_skipped_by_dst_is_rejected() {
        let mut form = ReminderForm::new(Europe::Berlin);
        form.set_title("Never");
        let date = NaiveDate::from_ymd_opt(2027, 3, 28).unwrap();
        let time = NaiveTime::from_hms_opt(2, 30, 0).unwrap();
        form.pick(date, time);

        let error = form.submit(now()).unwrap_err();

        assert_eq!(error, FormError::NonexistentLocalTime(date.and_time(time)));
        assert_eq!(error.field(), Some(FormField::FireTime));
    }

    #[test]
    fn picker_defaults_follow_last_pick() {
        let mut form = ReminderForm::new(Tz::Europe__Berlin);
        let (date, time) = form.picker_defaults(now());

        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(11, 30, 0).unwrap());

        let picked_date = NaiveDate::from_ymd_opt(2026, 12, 24).unwrap();
        let picked_time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        form.pick(picked_date, picked_time);

        assert_eq!(form.picker_defaults(now()), (picked_date, picked_time));
        assert_eq!(form.fire_time_display(), "24-12-2026 06:00 PM");
    }

    #[test]
    fn host_zone_defaults_to_local_clock() {
        let form = ReminderForm::new(ReminderTimeZone::Host);
        let local_now = now().with_timezone(&Local).naive_local();

        assert_eq!(form.picker_defaults(now()), (local_now.date(), local_now.time()));
    }

    #[test]
    fn host_zone_reads_pick_as_local_time() {
        let local = (now() + TimeDelta::hours(2)).with_timezone(&Local).naive_local();
        let mut form = ReminderForm::new(ReminderTimeZone::Host);
        form.set_title("Dentist");
        form.pick(local.date(), local.time());

        assert_eq!(form.submit(now()).unwrap().delay_seconds, 2 * 60 * 60);
    }

    proptest! {
        #[test]
        fn submitted_reminders_are_never_in_the_past(
            now_utc in arb::<chrono::NaiveDateTime>(),
            offset_minutes in -10_000i64..10_000
        ) {
            let now = DateTime::from_naive_utc_and_offset(now_utc, Utc);
            let Some(fire_at) = now.checked_add_signed(TimeDelta::minutes(offset_minutes)) else {
                return Ok(());
            };
            let form = form_at("Reminder", fire_at);

            match form.submit(now) {
                Ok(submission) => {
                    prop_assert!(submission.reminder.fire_at.timestamp() >= now.timestamp());
                    prop_assert_eq!(
                        submission.reminder.fire_at.timestamp() - now.timestamp(),
                        submission.delay_seconds as i64
                    );
                }
                Err(error) => {
                    prop_assert_eq!(error, FormError::FireTimeInPast);
                    prop_assert!(form.picked().unwrap().and_utc().timestamp() < now.timestamp());
                }
            }
        }
    }
}
