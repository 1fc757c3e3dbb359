use serde::Deserialize;
use serde_json::Value;

/// Purchase JSON handed to the app by the billing SDK after a purchase flow
/// completes (the `purchaseData` extra).
///
/// Every field is optional; the SDK omits fields it has no value for. Fields
/// are kept as raw JSON values so that a well-formed payload with unexpected
/// value types (e.g. a numeric order ID, a null purchase time) still maps.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PurchasePayloadModel {
    /// Unique order identifier for the transaction.
    pub(crate) order_id: Option<Value>,
    /// Token that uniquely identifies the purchase for a given item and user
    /// pair.
    pub(crate) purchase_token: Option<Value>,
    /// A developer-specified string that contains supplemental information
    /// about an order.
    pub(crate) developer_payload: Option<Value>,
    /// The application package from which the purchase originated.
    pub(crate) package_name: Option<Value>,
    /// 0 (purchased) or 1 (refunded). Only an exact 0 counts as purchased.
    pub(crate) purchase_state: Option<Value>,
    /// The time the product was purchased, in milliseconds since the epoch
    /// (Jan 1, 1970).
    pub(crate) purchase_time: Option<Value>,
    /// The item's product identifier.
    pub(crate) product_id: Option<Value>,
}

impl PurchasePayloadModel {
    pub(crate) fn is_purchased(&self) -> bool {
        is_purchased_state(self.purchase_state.as_ref())
    }
}

/// True only for a numeric purchase state equal to zero.
pub(crate) fn is_purchased_state(state: Option<&Value>) -> bool {
    match state {
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Text form of an identifier field. Null or missing yields None; strings are
/// taken as-is and any other value (number, bool, object) is kept in its JSON
/// form, e.g. `12345` becomes "12345".
pub(crate) fn field_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Millisecond timestamp of a purchase time field. Anything that is not a
/// number (missing, null, a string) yields 0; fractional values are
/// truncated.
pub(crate) fn purchase_time_millis(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn field_text_stringifies_non_string_values() {
        assert_eq!(field_text(Some(json!("abc"))), Some("abc".to_string()));
        assert_eq!(field_text(Some(json!(12345))), Some("12345".to_string()));
        assert_eq!(field_text(Some(json!(true))), Some("true".to_string()));
        assert_eq!(field_text(Some(Value::Null)), None);
        assert_eq!(field_text(None), None);
    }

    #[test]
    fn purchase_time_defaults_to_zero() {
        assert_eq!(purchase_time_millis(Some(&json!(1691234567890_i64))), 1691234567890);
        assert_eq!(purchase_time_millis(Some(&json!(12.9))), 12);
        assert_eq!(purchase_time_millis(Some(&Value::Null)), 0);
        assert_eq!(purchase_time_millis(Some(&json!("1691234567890"))), 0);
        assert_eq!(purchase_time_millis(None), 0);
    }
}
