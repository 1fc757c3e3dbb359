use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BillingAnalyticsError {
    #[error("Failed to parse purchase payload: {0}")]
    PurchasePayloadParse(#[source] serde_json::Error),

    #[error("Failed to parse report options: {0}")]
    ReportOptionsParse(#[source] serde_json::Error),

    #[error("Could not write export file '{}': {source}", .path.display())]
    ExportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing CSV export: {0}")]
    CsvExport(#[from] csv::Error),

    #[error("Error writing JSON export: {0}")]
    JsonExport(#[source] serde_json::Error),
}
