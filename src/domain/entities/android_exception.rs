use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An exception surfaced by the billing SDK on the device, e.g.
/// `BazaarNotSupportedException`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndroidException {
    pub name: String,
    pub message: String,
    /// Free-form exception class, e.g. "IllegalStateException".
    #[serde(rename = "type")]
    pub exception_type: String,
    /// Captured when the report is created. Serialized as RFC 3339.
    pub timestamp: DateTime<Utc>,
}

impl AndroidException {
    pub fn new(
        name: impl Into<String>,
        message: impl Into<String>,
        exception_type: impl Into<String>,
    ) -> Self {
        Self::at(name, message, exception_type, Utc::now())
    }

    pub fn at(
        name: impl Into<String>,
        message: impl Into<String>,
        exception_type: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            exception_type: exception_type.into(),
            timestamp,
        }
    }

    /// Pretty output is indented by four spaces, matching the file exports.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if !pretty {
            return serde_json::to_string(self);
        }
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever writes valid UTF-8.
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn serializes_type_and_iso_timestamp() {
        let ex = AndroidException::at(
            "ConsumeFailedException",
            "Consume request failed",
            "RemoteException",
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        );
        let value: serde_json::Value = serde_json::from_str(&ex.to_json(false).unwrap()).unwrap();
        assert_eq!(value["type"], "RemoteException");
        assert_eq!(value["timestamp"], "2024-05-01T12:30:00Z");
        assert!(value.get("exception_type").is_none());
    }

    #[test]
    fn pretty_json_uses_four_space_indent() {
        let ex = AndroidException::at(
            "DisconnectException",
            "Bazaar service disconnected",
            "IllegalStateException",
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        );
        assert_eq!(
            ex.to_json(true).unwrap(),
            "{\n    \"name\": \"DisconnectException\",\n    \"message\": \"Bazaar service disconnected\",\n    \"type\": \"IllegalStateException\",\n    \"timestamp\": \"2024-05-01T12:30:00Z\"\n}"
        );
    }
}
