use std::time::Duration;

use chrono::{DateTime, Utc};
use reminders_models::reminder::ReminderPayload;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type JobId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredJob {
    pub id: JobId,
    pub run_at: DateTime<Utc>,
    pub payload: ReminderPayload,
}

impl DeferredJob {
    pub fn new(run_at: DateTime<Utc>, payload: ReminderPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_at,
            payload,
        }
    }

    /// Time left until the job is due. Overdue jobs are due immediately.
    pub fn remaining_delay(&self, now: DateTime<Utc>) -> Duration {
        (self.run_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn job_at(run_at: DateTime<Utc>) -> DeferredJob {
        DeferredJob::new(run_at, ReminderPayload::new("Todo: Call", "Call mom"))
    }

    #[test]
    fn remaining_delay_counts_down_to_run_at() {
        let now = Utc::now();
        let job = job_at(now + TimeDelta::seconds(60));

        assert_eq!(job.remaining_delay(now), Duration::from_secs(60));
        assert_eq!(
            job.remaining_delay(now + TimeDelta::seconds(45)),
            Duration::from_secs(15)
        );
    }

    #[test]
    fn overdue_job_is_due_immediately() {
        let now = Utc::now();
        let job = job_at(now - TimeDelta::hours(3));

        assert_eq!(job.remaining_delay(now), Duration::ZERO);
    }

    #[test]
    fn payload_is_persisted_with_title_and_message_keys() {
        let job = job_at(Utc::now());
        let json = serde_json::to_value(&job).unwrap();

        assert_eq!(json["payload"]["Title"], "Todo: Call");
        assert_eq!(json["payload"]["Message"], "Call mom");
    }
}
