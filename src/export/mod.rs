//! Report exporter.
//!
//! Produces downloadable report files from a held result. Nothing here touches
//! the network, and the result is only ever borrowed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::DiagnosticResult;
use crate::error::{ExportError, ExportResult};

/// Media type of the plain-text reports
pub const MEDIA_TYPE_TEXT: &str = "text/plain";
/// Media type of the machine-readable report
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Engineer-facing text report (`rca_report`)
    Technical,
    /// Stakeholder-facing summary (`executive_report`)
    Executive,
    /// Pretty-printed `technical_report`
    Json,
}

impl ReportFormat {
    /// All formats.
    pub const ALL: [ReportFormat; 3] = [
        ReportFormat::Technical,
        ReportFormat::Executive,
        ReportFormat::Json,
    ];

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Technical => "technical",
            ReportFormat::Executive => "executive",
            ReportFormat::Json => "json",
        }
    }

    /// Media type of the exported file.
    pub fn media_type(&self) -> &'static str {
        match self {
            ReportFormat::Technical | ReportFormat::Executive => MEDIA_TYPE_TEXT,
            ReportFormat::Json => MEDIA_TYPE_JSON,
        }
    }

    fn filename_prefix(&self) -> &'static str {
        match self {
            ReportFormat::Technical | ReportFormat::Json => "rca_technical",
            ReportFormat::Executive => "rca_executive",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Technical | ReportFormat::Executive => "txt",
            ReportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" | "txt" => Ok(ReportFormat::Technical),
            "executive" => Ok(ReportFormat::Executive),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// An exported report, ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub filename: String,
    pub media_type: &'static str,
    pub content: String,
}

impl ReportFile {
    /// Write the report into `dir`, creating the directory if needed.
    pub fn write_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// Export `result` in `format`, dated `date`.
pub fn export_report(
    result: &DiagnosticResult,
    format: ReportFormat,
    date: NaiveDate,
) -> ExportResult<ReportFile> {
    let content = match format {
        ReportFormat::Technical => result
            .rca_report
            .clone()
            .ok_or(ExportError::MissingReport { format })?,
        ReportFormat::Executive => result
            .executive_report
            .clone()
            .ok_or(ExportError::MissingReport { format })?,
        ReportFormat::Json => serde_json::to_string_pretty(&result.technical_report)?,
    };

    Ok(ReportFile {
        filename: report_filename(format, &result.target, date),
        media_type: format.media_type(),
        content,
    })
}

/// `rca_<kind>_<target>_<YYYY-MM-DD>.<ext>`
pub fn report_filename(format: ReportFormat, target: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.{}",
        format.filename_prefix(),
        sanitize_target(target),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

fn sanitize_target(target: &str) -> String {
    target
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() || c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}
