//! Flat CSV report: package, upstream version, one column per image

use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::project::ProjectReport;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub package: String,
    pub upstream: Option<String>,
    /// Installed versions, aligned with [`Report::image_columns`]
    pub installed: Vec<Option<String>>,
}

/// Rows plus the image columns they are aligned with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub image_columns: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Builds rows in input order
    ///
    /// Image columns come from the first project; every project is expected to
    /// have been queried against the same images, anything else becomes null.
    pub fn build(projects: &[ProjectReport]) -> Self {
        let image_columns: Vec<String> = projects
            .first()
            .map(|first| first.installed_versions.keys().cloned().collect())
            .unwrap_or_default();

        let rows = projects
            .iter()
            .map(|report| ReportRow {
                package: report.project.name.clone(),
                upstream: report.upstream.version.clone(),
                installed: image_columns
                    .iter()
                    .map(|image| report.installed_versions.get(image).cloned().flatten())
                    .collect(),
            })
            .collect();

        Self {
            image_columns,
            rows,
        }
    }

    pub fn header(&self) -> Vec<&str> {
        let mut header = vec!["package", "upstream"];
        header.extend(self.image_columns.iter().map(String::as_str));
        header
    }

    /// Writes header and rows; nulls become empty fields
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.header())?;

        for row in &self.rows {
            let mut record = vec![
                row.package.as_str(),
                row.upstream.as_deref().unwrap_or(""),
            ];
            record.extend(row.installed.iter().map(|v| v.as_deref().unwrap_or("")));
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), ReportError> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }
}
