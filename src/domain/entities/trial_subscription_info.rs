use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSubscriptionInfo {
    pub is_available: bool,
    pub trial_period_days: u32,
    /// Start of the trial window. The end date is derived from this.
    pub started_at: DateTime<Utc>,
}

impl TrialSubscriptionInfo {
    /// Trial starting now.
    pub fn new(is_available: bool, trial_period_days: u32) -> Self {
        Self::starting_at(is_available, trial_period_days, Utc::now())
    }

    pub fn starting_at(
        is_available: bool,
        trial_period_days: u32,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            is_available,
            trial_period_days,
            started_at,
        }
    }

    pub fn can_use_trial(&self) -> bool {
        self.is_available
    }

    /// `started_at` plus the trial length, or None if that falls outside the
    /// representable date range.
    pub fn trial_end_date(&self) -> Option<DateTime<Utc>> {
        Duration::try_days(i64::from(self.trial_period_days))
            .and_then(|length| self.started_at.checked_add_signed(length))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn end_date_is_start_plus_trial_days() {
        let start = Utc.with_ymd_and_hms(2024, 2, 25, 8, 0, 0).unwrap();
        let trial = TrialSubscriptionInfo::starting_at(true, 7, start);
        assert_eq!(
            trial.trial_end_date(),
            Some(Utc.with_ymd_and_hms(2024, 3, 3, 8, 0, 0).unwrap())
        );
        assert!(trial.can_use_trial());
    }

    #[test]
    fn end_date_past_supported_range_is_none() {
        let trial = TrialSubscriptionInfo::new(true, u32::MAX);
        assert_eq!(trial.trial_end_date(), None);
    }
}
