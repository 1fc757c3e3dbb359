use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::{config::ReportOptions, errors::BillingAnalyticsError};

pub(crate) trait FileExportDatasource: Send + Sync {
    /// Writes `headers` followed by one record per row. The header row is
    /// written even when `rows` is empty. Returns the number of data rows.
    fn write_csv<T, I>(
        &self,
        path: &Path,
        headers: &[&str],
        rows: I,
    ) -> Result<usize, BillingAnalyticsError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>;

    /// Writes `value` as indented JSON.
    fn write_json<T>(&self, path: &Path, value: &T) -> Result<(), BillingAnalyticsError>
    where
        T: Serialize + ?Sized;
}

pub(crate) struct FileExportDatasourceImpl {
    json_indent: usize,
    csv_delimiter: u8,
}

impl FileExportDatasource for FileExportDatasourceImpl {
    fn write_csv<T, I>(
        &self,
        path: &Path,
        headers: &[&str],
        rows: I,
    ) -> Result<usize, BillingAnalyticsError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let file = create(path)?;
        // Headers are written by hand so that an empty export still gets them.
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.csv_delimiter)
            .has_headers(false)
            .from_writer(file);
        writer.write_record(headers)?;
        let mut count = 0;
        for row in rows {
            writer.serialize(row)?;
            count += 1;
        }
        writer.flush().map_err(|e| io_error(path, e))?;
        Ok(count)
    }

    fn write_json<T>(&self, path: &Path, value: &T) -> Result<(), BillingAnalyticsError>
    where
        T: Serialize + ?Sized,
    {
        let mut file = create(path)?;
        let indent = vec![b' '; self.json_indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut serializer = serde_json::Serializer::with_formatter(&mut file, formatter);
        value
            .serialize(&mut serializer)
            .map_err(BillingAnalyticsError::JsonExport)?;
        file.flush().map_err(|e| io_error(path, e))
    }
}

impl FileExportDatasourceImpl {
    pub(crate) fn new(options: &ReportOptions) -> Self {
        Self {
            json_indent: options.json_indent,
            csv_delimiter: options.csv_delimiter,
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, BillingAnalyticsError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> BillingAnalyticsError {
    BillingAnalyticsError::ExportIo {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        a: u32,
        b: Option<&'static str>,
    }

    #[test]
    fn csv_writes_header_even_without_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let datasource = FileExportDatasourceImpl::new(&ReportOptions::default());
        let written = datasource
            .write_csv(&path, &["a", "b"], Vec::<Row>::new())
            .unwrap();
        assert_eq!(written, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n");
    }

    #[test]
    fn csv_honours_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        let options = ReportOptions {
            csv_delimiter: b';',
            ..ReportOptions::default()
        };
        let datasource = FileExportDatasourceImpl::new(&options);
        let rows = vec![Row { a: 1, b: Some("x") }, Row { a: 2, b: None }];
        assert_eq!(datasource.write_csv(&path, &["a", "b"], rows).unwrap(), 2);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "a;b\n1;x\n2;\n"
        );
    }

    #[test]
    fn json_uses_configured_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let datasource = FileExportDatasourceImpl::new(&ReportOptions::default());
        datasource.write_json(&path, &vec![1, 2]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[\n    1,\n    2\n]"
        );
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let datasource = FileExportDatasourceImpl::new(&ReportOptions::default());
        assert!(matches!(
            datasource.write_json(&path, &Vec::<u8>::new()),
            Err(BillingAnalyticsError::ExportIo { .. })
        ));
    }
}
