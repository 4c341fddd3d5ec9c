//! Append-only CSV log of captured rows.
//!
//! One row per run, header written exactly once over the file's lifetime.
//! No locking: runs are sequential by design and the log is only ever
//! appended to.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

pub const HEADER: [&str; 6] = ["country", "zip", "seller_url", "product_url", "title", "price"];

/// One persisted capture. Always exactly six fields; trailing fields stay
/// empty when upstream stages could not fill them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub country: String,
    pub zip: String,
    pub seller_url: String,
    pub product_url: String,
    pub title: String,
    pub price: String,
}

pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the log with the canonical header, only if no log file exists
    /// yet. Safe to call at every run start; repeated calls never duplicate
    /// or overwrite the header.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(())
    }

    /// Append one row. The log is opened in append mode per call; existing
    /// rows are never touched.
    pub fn append_row(&self, row: &ResultRow) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {} for append", self.path.display()))?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_row() -> ResultRow {
        ResultRow {
            country: "uk".into(),
            zip: "SW1A 1AA".into(),
            seller_url: "https://www.amazon.co.uk/sp?seller=A0SELLER01".into(),
            product_url: "https://www.amazon.co.uk/dp/B0123ABCDE".into(),
            title: "Widget Deluxe".into(),
            price: "£19.99".into(),
        }
    }

    #[test]
    fn test_header_written_once_across_initializations() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"));

        sink.ensure_initialized().unwrap();
        sink.append_row(&sample_row()).unwrap();
        sink.ensure_initialized().unwrap();
        sink.ensure_initialized().unwrap();

        let content = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        let header_lines = content
            .lines()
            .filter(|l| l.starts_with("country,zip"))
            .count();
        assert_eq!(header_lines, 1);
    }

    #[test]
    fn test_rows_have_exactly_six_fields() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"));
        sink.ensure_initialized().unwrap();
        sink.append_row(&sample_row()).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("out.csv")).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 6);
        for record in reader.records() {
            assert_eq!(record.unwrap().len(), 6);
        }
    }

    #[test]
    fn test_embedded_delimiter_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"));
        sink.ensure_initialized().unwrap();

        let mut row = sample_row();
        row.title = "Widget, Deluxe Edition".into();
        sink.append_row(&row).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("out.csv")).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[4], "Widget, Deluxe Edition");
    }

    #[test]
    fn test_appends_never_mutate_earlier_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"));
        sink.ensure_initialized().unwrap();

        sink.append_row(&sample_row()).unwrap();
        let first_pass = fs::read_to_string(dir.path().join("out.csv")).unwrap();

        let mut second = sample_row();
        second.price = "£29.99".into();
        sink.append_row(&second).unwrap();

        let second_pass = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert!(second_pass.starts_with(&first_pass));
        assert_eq!(second_pass.lines().count(), 3);
    }

    #[test]
    fn test_partial_row_keeps_field_count() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"));
        sink.ensure_initialized().unwrap();

        let mut row = sample_row();
        row.product_url.clear();
        row.title.clear();
        row.price.clear();
        sink.append_row(&row).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("out.csv")).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 6);
        assert_eq!(&record[2], "https://www.amazon.co.uk/sp?seller=A0SELLER01");
        assert_eq!(&record[3], "");
    }
}
