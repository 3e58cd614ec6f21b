//! Document decoding for a ranking run

use crate::error::{Result, ResumeRankerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Text decoded from one input document.
#[derive(Debug, Clone)]
pub struct DecodedDocument {
    pub path: PathBuf,
    pub text: String,
}

/// Outcome of `InputManager::decode_batch`: readable documents in input
/// order, and the documents that could not be decoded.
#[derive(Debug, Default)]
pub struct DecodedBatch {
    pub documents: Vec<DecodedDocument>,
    pub failures: Vec<(PathBuf, ResumeRankerError)>,
}

/// Decodes PDF, plain-text and Markdown documents.
///
/// Text is cached by canonical path, so a file reached twice in one run (as a
/// job description and again inside a resume directory, or through two
/// spellings of the same path) is decoded once.
#[derive(Default)]
pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    show_progress: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a progress bar on stderr while `decode_batch` runs.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ResumeRankerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let key = path.canonicalize()?;
        if let Some(text) = self.cache.get(&key) {
            debug!("Using cached text for: {}", path.display());
            return Ok(text.clone());
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => PdfExtractor.extract(path).await?,
            FileType::Text => PlainTextExtractor.extract(path).await?,
            FileType::Markdown => MarkdownExtractor.extract(path).await?,
            FileType::Unknown => {
                return Err(ResumeRankerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        debug!("Decoded {} ({} chars)", path.display(), text.chars().count());
        self.cache.insert(key, text.clone());
        Ok(text)
    }

    /// Decode every document in `paths`.
    ///
    /// A document that cannot be decoded is logged and listed in `failures`;
    /// it never stops the batch. A path resolving to a file already seen in
    /// this batch is skipped so the same resume is not ranked twice.
    pub async fn decode_batch(&mut self, paths: &[PathBuf]) -> DecodedBatch {
        let progress = self.progress_bar(paths.len());
        let mut seen = HashSet::new();
        let mut batch = DecodedBatch::default();

        for path in paths {
            progress.set_message(path.display().to_string());

            let key = path.canonicalize().unwrap_or_else(|_| path.clone());
            if !seen.insert(key) {
                debug!("Skipping duplicate document: {}", path.display());
                progress.inc(1);
                continue;
            }

            match self.extract_text(path).await {
                Ok(text) => batch.documents.push(DecodedDocument {
                    path: path.clone(),
                    text,
                }),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    batch.failures.push((path.clone(), e));
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        batch
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("template is compile-time constant")
                .progress_chars("=>-"),
        );
        bar
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
