use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseState {
    Purchased,
    Refunded,
}

impl PurchaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseState::Purchased => "PURCHASED",
            PurchaseState::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PurchaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single purchase as reported by the billing SDK on the device.
///
/// Normally built from a raw payload by
/// [`PurchaseMapper`](crate::domain::mappers::purchase_mapper::PurchaseMapper).
/// The crate never mutates a purchase once it has been added to a manager.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseInfo {
    pub order_id: Option<String>,
    pub purchase_token: Option<String>,
    /// Developer-specified payload attached to the purchase.
    pub payload: Option<String>,
    pub package_name: Option<String>,
    pub purchase_state: PurchaseState,
    /// Milliseconds since the epoch. Zero if the payload did not include it.
    pub purchase_time: i64,
    pub product_id: Option<String>,
    pub data_signature: String,
    /// The raw payload this purchase was parsed from.
    pub original_json: String,
}

impl PurchaseInfo {
    pub fn is_refunded(&self) -> bool {
        self.purchase_state == PurchaseState::Refunded
    }

    /// Purchase time as a UTC date-time, or None if the millisecond value is
    /// out of chrono's representable range.
    pub fn purchase_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.purchase_time)
    }
}

impl fmt::Display for PurchaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<PurchaseInfo {} ({})>",
            self.product_id.as_deref().unwrap_or("None"),
            self.purchase_state
        )
    }
}
