//! Directory batch processing.
//!
//! Every `*.pdf` file of an input directory is processed in name order and
//! produces `<stem>.json` in the output directory. A failure on one file
//! writes the canonical error result for that file and the batch moves on.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::extractor::OutlineExtractor;
use crate::model::OutlineResult;

/// Outcome of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    /// The outline was extracted and written
    Success {
        /// Resolved title
        title: String,
        /// Number of headings
        headings: usize,
    },
    /// Processing failed; the error result was written instead
    Failed {
        /// Failure description
        reason: String,
    },
}

/// One processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    /// Input PDF
    pub input: PathBuf,
    /// JSON file written
    pub output: PathBuf,
    /// What happened
    #[serde(flatten)]
    pub status: BatchStatus,
}

impl BatchEntry {
    /// Whether the file was processed successfully.
    pub fn is_success(&self) -> bool {
        matches!(self.status, BatchStatus::Success { .. })
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Files processed successfully
    pub successful: usize,
    /// Files that failed
    pub failed: usize,
    /// Per-file outcomes in processing order
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// Total number of files.
    pub fn total(&self) -> usize {
        self.successful + self.failed
    }

    fn push(&mut self, entry: BatchEntry) {
        if entry.is_success() {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.entries.push(entry);
    }
}

/// List the PDF files of a directory, sorted by file name.
///
/// The `.pdf` extension is matched case-insensitively. Fails when the
/// directory does not exist or holds no PDF files.
pub fn find_pdf_files<P: AsRef<Path>>(input: P) -> Result<Vec<PathBuf>> {
    let input = input.as_ref();
    if !input.is_dir() {
        return Err(Error::InputDirMissing(input.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoInputFiles(input.display().to_string()));
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Output path for an input file: `<output>/<stem>.json`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// Write a result as pretty-printed JSON (two-space indent, non-ASCII kept).
pub fn write_json_output<P: AsRef<Path>>(result: &OutlineResult, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    Ok(())
}

/// Process every PDF of `input` with `extractor`, writing into `output`.
pub fn process_directory<P, Q>(input: P, output: Q, extractor: &OutlineExtractor) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let files = find_pdf_files(input)?;
    process_files(&files, output, |path| extractor.extract_path(path))
}

/// Process the given files with a custom extraction function.
///
/// The output directory is created when missing. Errors from `extract`, and
/// failures writing its result, are recorded per file.
pub fn process_files<Q, F>(files: &[PathBuf], output: Q, mut extract: F) -> Result<BatchReport>
where
    Q: AsRef<Path>,
    F: FnMut(&Path) -> Result<OutlineResult>,
{
    let output = output.as_ref();
    fs::create_dir_all(output)?;

    let mut report = BatchReport::default();
    for file in files {
        let out_path = output_path_for(file, output);
        log::info!("Processing {}", file.display());

        let written = extract(file).and_then(|result| {
            write_json_output(&result, &out_path)?;
            Ok(result)
        });

        let status = match written {
            Ok(result) => {
                log::info!(
                    "Saved {} ({} heading(s), title: '{}')",
                    out_path.display(),
                    result.len(),
                    result.title
                );
                BatchStatus::Success {
                    headings: result.len(),
                    title: result.title,
                }
            }
            Err(e) => {
                log::error!("Failed to process '{}': {}", file.display(), e);
                if let Err(save) = write_json_output(&OutlineResult::processing_error(), &out_path) {
                    log::error!("Could not save error JSON for '{}': {}", file.display(), save);
                }
                BatchStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        report.push(BatchEntry {
            input: file.clone(),
            output: out_path,
            status,
        });
    }

    log::info!(
        "Batch complete: {} successful, {} failed, {} total",
        report.successful,
        report.failed,
        report.total()
    );
    Ok(report)
}
