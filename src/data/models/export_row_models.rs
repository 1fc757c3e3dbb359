use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{
    purchase_info::{PurchaseInfo, PurchaseState},
    trial_subscription_info::TrialSubscriptionInfo,
};

/// One row of the purchases CSV export.
#[derive(Debug, Serialize)]
pub(crate) struct PurchaseExportRow<'a> {
    pub(crate) order_id: Option<&'a str>,
    pub(crate) product_id: Option<&'a str>,
    pub(crate) state: PurchaseState,
    /// Raw purchase time, in milliseconds since the epoch.
    pub(crate) timestamp: i64,
}

impl<'a> From<&'a PurchaseInfo> for PurchaseExportRow<'a> {
    fn from(p: &'a PurchaseInfo) -> Self {
        Self {
            order_id: p.order_id.as_deref(),
            product_id: p.product_id.as_deref(),
            state: p.purchase_state,
            timestamp: p.purchase_time,
        }
    }
}

/// One row of the trials CSV export.
#[derive(Debug, Serialize)]
pub(crate) struct TrialExportRow {
    pub(crate) available: bool,
    pub(crate) days: u32,
    /// Empty when the end date is out of range.
    pub(crate) ends_on: Option<DateTime<Utc>>,
}

impl From<&TrialSubscriptionInfo> for TrialExportRow {
    fn from(t: &TrialSubscriptionInfo) -> Self {
        Self {
            available: t.is_available,
            days: t.trial_period_days,
            ends_on: t.trial_end_date(),
        }
    }
}
