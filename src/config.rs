use serde::Deserialize;

use crate::errors::BillingAnalyticsError;

/// Formatting options for text reports and file exports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Number of dashes in the separator lines of the exception report.
    pub separator_width: usize,
    /// Indentation, in spaces, of JSON exports.
    pub json_indent: usize,
    pub csv_delimiter: u8,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            separator_width: 35,
            json_indent: 4,
            csv_delimiter: b',',
        }
    }
}

impl ReportOptions {
    /// Missing keys fall back to their defaults.
    pub fn from_json(raw: &str) -> Result<Self, BillingAnalyticsError> {
        serde_json::from_str(raw).map_err(BillingAnalyticsError::ReportOptionsParse)
    }

    pub(crate) fn separator(&self) -> String {
        "-".repeat(self.separator_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let options = ReportOptions::from_json(r#"{"json_indent": 2}"#).unwrap();
        assert_eq!(options.json_indent, 2);
        assert_eq!(options.separator_width, 35);
        assert_eq!(options.csv_delimiter, b',');
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            ReportOptions::from_json("{not json"),
            Err(BillingAnalyticsError::ReportOptionsParse(_))
        ));
    }
}
