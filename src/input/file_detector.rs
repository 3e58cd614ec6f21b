//! File type detection and document discovery

use crate::error::{Result, ResumeRankerError};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions accepted for resumes and job descriptions.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, FileType::Unknown)
    }
}

/// Expand files and directories into the supported documents they contain.
///
/// Files given explicitly are kept as-is, so an unsupported one surfaces later
/// as an `UnsupportedFormat` error. Directories are walked recursively, keep
/// only supported files, and are visited in file-name order.
pub fn collect_documents(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for input in inputs {
        if input.is_file() {
            documents.push(input.clone());
        } else if input.is_dir() {
            let before = documents.len();
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    ResumeRankerError::InvalidInput(format!(
                        "Failed to read directory {}: {}",
                        input.display(),
                        e
                    ))
                })?;
                if entry.file_type().is_file() && FileType::from_path(entry.path()).is_supported() {
                    documents.push(entry.into_path());
                }
            }
            debug!("Found {} documents in {}", documents.len() - before, input.display());
        } else {
            return Err(ResumeRankerError::InvalidInput(format!(
                "File does not exist: {}",
                input.display()
            )));
        }
    }

    Ok(documents)
}
