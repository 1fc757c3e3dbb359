use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use chrono::{DateTime, Timelike, Utc};

use crate::{
    config::ReportOptions,
    data::datasources::file_export_datasource::{FileExportDatasource, FileExportDatasourceImpl},
    domain::entities::{
        android_exception::AndroidException,
        time_bucket::{resample, BucketFrequency, TimeBucket},
    },
    errors::BillingAnalyticsError,
};

const CSV_HEADERS: [&str; 4] = ["name", "message", "type", "timestamp"];

/// Collects exception reports from the billing SDK and summarizes them.
pub struct ExceptionManager {
    exceptions: Vec<AndroidException>,
    options: ReportOptions,
    export_datasource: FileExportDatasourceImpl,
}

impl ExceptionManager {
    pub fn new() -> Self {
        Self::with_exceptions(Vec::new())
    }

    /// Takes ownership of an existing collection. Retention is up to the
    /// caller.
    pub fn with_exceptions(exceptions: Vec<AndroidException>) -> Self {
        let options = ReportOptions::default();
        Self {
            exceptions,
            export_datasource: FileExportDatasourceImpl::new(&options),
            options,
        }
    }

    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.export_datasource = FileExportDatasourceImpl::new(&options);
        self.options = options;
        self
    }

    pub fn add_exception(&mut self, exception: AndroidException) {
        self.exceptions.push(exception);
    }

    pub fn exceptions(&self) -> &[AndroidException] {
        &self.exceptions
    }

    /// Plain-text report: totals first, then one block per exception in
    /// insertion order.
    pub fn generate_report(&self) -> String {
        let separator = self.options.separator();
        let unique_types: HashSet<&str> = self
            .exceptions
            .iter()
            .map(|ex| ex.exception_type.as_str())
            .collect();

        let mut lines = vec![
            "=== Android Exception Report ===".to_string(),
            format!("Total Exceptions: {}", self.exceptions.len()),
            format!("Unique Types: {}", unique_types.len()),
            separator.clone(),
        ];
        for ex in &self.exceptions {
            lines.push(format!("Name      : {}", ex.name));
            lines.push(format!("Message   : {}", ex.message));
            lines.push(format!("Type      : {}", ex.exception_type));
            lines.push(format!("Timestamp : {}", format_report_time(ex.timestamp)));
            lines.push(separator.clone());
        }
        lines.join("\n")
    }

    pub fn exception_frequency(&self) -> BTreeMap<String, usize> {
        let mut frequency: BTreeMap<String, usize> = BTreeMap::new();
        for ex in &self.exceptions {
            *frequency.entry(ex.exception_type.clone()).or_default() += 1;
        }
        frequency
    }

    pub fn exceptions_over_time(&self, frequency: BucketFrequency) -> Vec<TimeBucket> {
        resample(self.exceptions.iter().map(|ex| ex.timestamp), frequency)
    }

    /// Writes every exception as a JSON array. An empty collection writes `[]`.
    pub fn save_to_json(&self, path: impl AsRef<Path>) -> Result<(), BillingAnalyticsError> {
        let path = path.as_ref();
        self.export_datasource.write_json(path, &self.exceptions)?;
        tracing::info!(
            path = %path.display(),
            rows = self.exceptions.len(),
            "Exceptions exported."
        );
        Ok(())
    }

    /// Writes every exception as a CSV row under a `name,message,type,timestamp`
    /// header. Does nothing, not even create the file, if there are no
    /// exceptions.
    pub fn save_to_csv(&self, path: impl AsRef<Path>) -> Result<(), BillingAnalyticsError> {
        let path = path.as_ref();
        if self.exceptions.is_empty() {
            tracing::debug!(path = %path.display(), "No exceptions to export; skipping CSV.");
            return Ok(());
        }
        let rows = self
            .export_datasource
            .write_csv(path, &CSV_HEADERS, &self.exceptions)?;
        tracing::info!(path = %path.display(), rows, "Exceptions exported.");
        Ok(())
    }
}

impl Default for ExceptionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// `YYYY-MM-DD HH:MM:SS`, with microseconds appended only when non-zero.
fn format_report_time(time: DateTime<Utc>) -> String {
    if time.nanosecond() / 1_000 == 0 {
        time.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        time.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, hour, 15, 0).unwrap()
    }

    fn sample_manager() -> ExceptionManager {
        let mut manager = ExceptionManager::new();
        manager.add_exception(AndroidException::at(
            "BazaarNotSupportedException",
            "Bazaar is not updated",
            "IllegalStateException",
            at(8),
        ));
        manager.add_exception(AndroidException::at(
            "ConsumeFailedException",
            "Consume request failed",
            "RemoteException",
            at(9) + Duration::microseconds(250),
        ));
        manager
    }

    #[test]
    fn frequency_counts_by_type() {
        let mut manager = ExceptionManager::new();
        for _ in 0..3 {
            manager.add_exception(AndroidException::new("X", "x", "A"));
        }
        manager.add_exception(AndroidException::new("Y", "y", "B"));
        assert_eq!(
            manager.exception_frequency(),
            BTreeMap::from([("A".to_string(), 3), ("B".to_string(), 1)])
        );
    }

    #[test]
    fn report_has_fixed_layout() {
        let dashes = "-".repeat(35);
        let expected = [
            "=== Android Exception Report ===",
            "Total Exceptions: 2",
            "Unique Types: 2",
            dashes.as_str(),
            "Name      : BazaarNotSupportedException",
            "Message   : Bazaar is not updated",
            "Type      : IllegalStateException",
            "Timestamp : 2024-06-03 08:15:00",
            dashes.as_str(),
            "Name      : ConsumeFailedException",
            "Message   : Consume request failed",
            "Type      : RemoteException",
            "Timestamp : 2024-06-03 09:15:00.000250",
            dashes.as_str(),
        ]
        .join("\n");
        assert_eq!(sample_manager().generate_report(), expected);
    }

    #[test]
    fn empty_report_has_only_header() {
        let manager = ExceptionManager::new().with_options(ReportOptions {
            separator_width: 5,
            ..ReportOptions::default()
        });
        assert_eq!(
            manager.generate_report(),
            "=== Android Exception Report ===\nTotal Exceptions: 0\nUnique Types: 0\n-----"
        );
    }

    #[test]
    fn exceptions_bucketed_by_hour() {
        let mut manager = sample_manager();
        manager.add_exception(AndroidException::at("Z", "z", "RemoteException", at(11)));
        let counts: Vec<usize> = manager
            .exceptions_over_time(BucketFrequency::Hourly)
            .iter()
            .map(|b| b.count)
            .collect();
        assert_eq!(counts, vec![1, 1, 0, 1]);
        assert!(ExceptionManager::new()
            .exceptions_over_time(BucketFrequency::Daily)
            .is_empty());
    }

    #[test]
    fn json_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exceptions.json");
        let manager = sample_manager();
        manager.save_to_json(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<AndroidException> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, manager.exceptions());

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["type"], "IllegalStateException");
        assert_eq!(value[0]["timestamp"], "2024-06-03T08:15:00Z");
    }

    #[test]
    fn csv_export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exceptions.csv");
        sample_manager().save_to_csv(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "name,message,type,timestamp\n\
             BazaarNotSupportedException,Bazaar is not updated,IllegalStateException,2024-06-03T08:15:00Z\n\
             ConsumeFailedException,Consume request failed,RemoteException,2024-06-03T09:15:00.000250Z\n"
        );
    }

    #[test]
    fn csv_export_of_nothing_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exceptions.csv");
        ExceptionManager::new().save_to_csv(&path).unwrap();
        assert!(!path.exists());
    }
}
