use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::navis::tools::error::Result;
use crate::navis::tools::flatten::{
    self, ConsoleMirror, DEFAULT_IMAGE_PREFIX, DiagnosticSink, FlattenOptions, FlattenOutcome,
};
use crate::navis::tools::io::{csv_write, excel_write, xml_read};

/// Default name of the CSV artifact.
pub const DEFAULT_CSV_FILE: &str = "navisworks_views_comments.csv";
/// Default name of the diagnostic trace artifact.
pub const DEFAULT_LOG_FILE: &str = "debug.txt";

/// Where the artifacts of a run go and how the run reports progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub csv_path: PathBuf,
    pub log_path: PathBuf,
    pub xlsx_path: Option<PathBuf>,
    pub stream_debug: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_FILE),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
            xlsx_path: None,
            stream_debug: false,
        }
    }
}

impl ExportOptions {
    /// Image references are named after the CSV file: `<stem>_vp`, or
    /// `vp_` when the CSV path has no stem.
    pub fn image_prefix(&self) -> String {
        match self.csv_path.file_stem().map(|stem| stem.to_string_lossy()) {
            Some(stem) if !stem.is_empty() => format!("{stem}_vp"),
            _ => DEFAULT_IMAGE_PREFIX.to_string(),
        }
    }

    fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            image_prefix: self.image_prefix(),
        }
    }
}

/// Counts reported after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub view_count: u32,
    pub record_count: usize,
    pub duplicate_count: usize,
    pub diagnostic_count: usize,
}

impl From<&FlattenOutcome> for ExportSummary {
    fn from(outcome: &FlattenOutcome) -> Self {
        Self {
            view_count: outcome.view_count,
            record_count: outcome.records.len(),
            duplicate_count: outcome.duplicate_count,
            diagnostic_count: outcome.diagnostics.len(),
        }
    }
}

/// Reads a viewpoint export, flattens it and writes every artifact. Nothing
/// is written unless reading and flattening succeed.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), csv = %options.csv_path.display())
)]
pub fn export_document(input: &Path, options: &ExportOptions) -> Result<ExportSummary> {
    let outcome = if options.stream_debug {
        let mut mirror = ConsoleMirror::stdout();
        process_document(input, options, Some(&mut mirror))?
    } else {
        process_document(input, options, None)?
    };

    write_outputs(&outcome, options)?;
    let summary = ExportSummary::from(&outcome);
    info!(
        views = summary.view_count,
        records = summary.record_count,
        duplicates = summary.duplicate_count,
        "export complete"
    );
    Ok(summary)
}

/// Parses and flattens the document without touching any output file.
#[instrument(level = "debug", skip_all, fields(input = %input.display()))]
pub fn process_document(
    input: &Path,
    options: &ExportOptions,
    mirror: Option<&mut dyn DiagnosticSink>,
) -> Result<FlattenOutcome> {
    let document = xml_read::read_document(input)?;
    info!(
        folders = document.folders.len(),
        views = document.view_count(),
        "parsed viewpoint export"
    );
    Ok(flatten::flatten_document(
        &document,
        &options.flatten_options(),
        mirror,
    ))
}

/// Persists the table, the diagnostic trace and, when requested, the
/// workbook. Every artifact is rendered in memory first so that a rendering
/// failure leaves no file behind.
#[instrument(level = "debug", skip_all)]
pub fn write_outputs(outcome: &FlattenOutcome, options: &ExportOptions) -> Result<()> {
    let table = csv_write::render_records(&outcome.records)?;
    let trace = outcome.diagnostics.render();
    let workbook = match &options.xlsx_path {
        Some(_) => Some(excel_write::render_workbook(&outcome.records)?),
        None => None,
    };

    fs::write(&options.csv_path, table)?;
    debug!(path = %options.csv_path.display(), "table written");

    fs::write(&options.log_path, trace)?;
    debug!(path = %options.log_path.display(), "diagnostics written");

    if let (Some(xlsx_path), Some(workbook)) = (&options.xlsx_path, workbook) {
        fs::write(xlsx_path, workbook)?;
        debug!(path = %xlsx_path.display(), "workbook written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_prefix_follows_csv_stem() {
        let options = ExportOptions::default();
        assert_eq!(options.image_prefix(), "navisworks_views_comments_vp");

        let options = ExportOptions {
            csv_path: PathBuf::from("out/report.csv"),
            ..ExportOptions::default()
        };
        assert_eq!(options.image_prefix(), "report_vp");
    }

    #[test]
    fn image_prefix_falls_back_without_stem() {
        let options = ExportOptions {
            csv_path: PathBuf::from("/"),
            ..ExportOptions::default()
        };
        assert_eq!(options.image_prefix(), "vp_");
    }
}
