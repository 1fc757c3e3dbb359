use chrono::DateTime;
use serde_json::{Map, Value};

use crate::{
    data::models::purchase_payload_model::{
        field_text, is_purchased_state, purchase_time_millis, PurchasePayloadModel,
    },
    domain::entities::purchase_info::{PurchaseInfo, PurchaseState},
    errors::BillingAnalyticsError,
};

/// Converts raw purchase payloads from the billing SDK into [`PurchaseInfo`]
/// records, plus a handful of read-only lookups over payloads and records.
pub struct PurchaseMapper;

impl PurchaseMapper {
    /// Parses `purchase_data` (the JSON purchase payload). Missing or null
    /// fields are left empty, non-string IDs are kept in their JSON text form,
    /// and a missing or non-numeric purchase time becomes 0. Only JSON that
    /// is not an object fails. A purchase state of
    /// exactly 0 maps to [`PurchaseState::Purchased`]; anything else, including
    /// a missing state, maps to [`PurchaseState::Refunded`].
    pub fn map_to_purchase_info(
        purchase_data: &str,
        data_signature: &str,
    ) -> Result<PurchaseInfo, BillingAnalyticsError> {
        let model: PurchasePayloadModel = serde_json::from_str(purchase_data)
            .map_err(BillingAnalyticsError::PurchasePayloadParse)?;
        let purchase_state = if model.is_purchased() {
            PurchaseState::Purchased
        } else {
            PurchaseState::Refunded
        };
        Ok(PurchaseInfo {
            purchase_time: purchase_time_millis(model.purchase_time.as_ref()),
            order_id: field_text(model.order_id),
            purchase_token: field_text(model.purchase_token),
            payload: field_text(model.developer_payload),
            package_name: field_text(model.package_name),
            purchase_state,
            product_id: field_text(model.product_id),
            data_signature: data_signature.to_string(),
            original_json: purchase_data.to_string(),
        })
    }

    /// Maps `(purchase_data, data_signature)` pairs, failing on the first
    /// malformed payload.
    pub fn map_list<D, S>(purchases: &[(D, S)]) -> Result<Vec<PurchaseInfo>, BillingAnalyticsError>
    where
        D: AsRef<str>,
        S: AsRef<str>,
    {
        purchases
            .iter()
            .map(|(data, sig)| Self::map_to_purchase_info(data.as_ref(), sig.as_ref()))
            .collect()
    }

    pub fn get_purchase_summary(purchase_data: &str) -> Result<String, BillingAnalyticsError> {
        let data = parse_object(purchase_data)?;
        let state = if is_purchased_state(data.get("purchaseState")) {
            "✅ PURCHASED"
        } else {
            "❌ REFUNDED"
        };
        let purchase_time = purchase_time_millis(data.get("purchaseTime"));
        Ok(format!(
            "━━━━━━━━━ Purchase Summary ━━━━━━━━━\n\
             Order ID      : {}\n\
             Product ID    : {}\n\
             Purchase State: {}\n\
             Purchase Time : {}\n\
             ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━",
            display_field(data.get("orderId")),
            display_field(data.get("productId")),
            state,
            Self::format_purchase_time(purchase_time),
        ))
    }

    /// PLACEHOLDER: performs no cryptographic verification at all. Reports
    /// failure only when the payload or signature is blank, and success
    /// otherwise. Do not rely on this to authenticate purchases.
    pub fn verify_purchase_signature(
        purchase_data: &str,
        signature: &str,
        _public_key: &str,
    ) -> bool {
        if signature.trim().is_empty() || purchase_data.trim().is_empty() {
            tracing::warn!(
                "Purchase signature verification is a placeholder and was given blank input."
            );
            return false;
        }
        true
    }

    pub fn filter_by_state(purchases: &[PurchaseInfo], state: PurchaseState) -> Vec<&PurchaseInfo> {
        purchases
            .iter()
            .filter(|p| p.purchase_state == state)
            .collect()
    }

    /// Purchase with the latest purchase time. On ties, the earliest one in
    /// `purchases` wins.
    pub fn get_most_recent_purchase(purchases: &[PurchaseInfo]) -> Option<&PurchaseInfo> {
        purchases.iter().fold(None, |latest, p| match latest {
            Some(l) if l.purchase_time >= p.purchase_time => Some(l),
            _ => Some(p),
        })
    }

    pub fn is_refunded(purchase_data: &str) -> Result<bool, BillingAnalyticsError> {
        Ok(!is_purchased_state(
            parse_object(purchase_data)?.get("purchaseState"),
        ))
    }

    /// Raw value of `field` in the payload, if present.
    pub fn get_field(
        purchase_data: &str,
        field: &str,
    ) -> Result<Option<Value>, BillingAnalyticsError> {
        Ok(parse_object(purchase_data)?.remove(field))
    }

    /// Formats a millisecond timestamp as `YYYY-MM-DD HH:MM:SS` (UTC), or
    /// "N/A" for non-positive or unrepresentable values.
    pub fn format_purchase_time(timestamp: i64) -> String {
        if timestamp <= 0 {
            return "N/A".to_string();
        }
        DateTime::from_timestamp_millis(timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn is_purchase_for_product(
        purchase_data: &str,
        product_id: &str,
    ) -> Result<bool, BillingAnalyticsError> {
        Ok(parse_object(purchase_data)?
            .get("productId")
            .and_then(Value::as_str)
            == Some(product_id))
    }
}

fn parse_object(purchase_data: &str) -> Result<Map<String, Value>, BillingAnalyticsError> {
    serde_json::from_str(purchase_data).map_err(BillingAnalyticsError::PurchasePayloadParse)
}

fn display_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
