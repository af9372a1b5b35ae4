//! File intake: filtering uploaded batches down to PDFs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::queue::QueuedPdf;

/// Rejection of a whole upload batch
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    /// The batch contained no PDF files at all
    #[error("the selection contained no PDF files")]
    NoQualifyingFiles,
}

/// Result of filtering one uploaded batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intake {
    /// Qualifying candidates in their original order
    pub accepted: Vec<PathBuf>,
    /// How many candidates were silently dropped
    pub rejected: usize,
}

/// Whether a path names a PDF file (by extension, case-insensitive)
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Filter an uploaded batch down to PDF files.
///
/// Mixed batches are partially accepted: non-PDF entries are dropped
/// without individual reporting. A batch with zero qualifying files is
/// rejected as a whole.
pub fn filter_batch(paths: Vec<PathBuf>) -> Result<Intake, IntakeError> {
    let total = paths.len();
    let accepted: Vec<PathBuf> = paths.into_iter().filter(|path| is_pdf(path)).collect();
    if accepted.is_empty() {
        return Err(IntakeError::NoQualifyingFiles);
    }
    Ok(Intake {
        rejected: total - accepted.len(),
        accepted,
    })
}

/// Read one accepted file into a queue entry
pub fn load_file(path: &Path) -> Result<QueuedPdf> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());
    Ok(QueuedPdf::new(name, bytes))
}
