//! Text extraction from various file formats

use crate::error::{Result, ResumeRankerError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ResumeRankerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Render Markdown and strip it back to plain text. Headings and paragraphs
/// stay on their own lines separated by a blank line, list items become
/// `- ` lines, so section headers and role blocks survive.
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_to_text(&html_output)
}

struct MarkupPatterns {
    block_end: Regex,
    list_item: Regex,
    tag: Regex,
    blank_runs: Regex,
}

fn markup_patterns() -> &'static MarkupPatterns {
    static PATTERNS: OnceLock<MarkupPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkupPatterns {
        block_end: Regex::new(r"</(?:p|h[1-6]|ul|ol|pre|blockquote)>").expect("Invalid block regex"),
        list_item: Regex::new(r"<li>(?:\s*<p>)?").expect("Invalid list item regex"),
        tag: Regex::new(r"<[^>]*>").expect("Invalid tag regex"),
        blank_runs: Regex::new(r"\n{3,}").expect("Invalid blank line regex"),
    })
}

fn html_to_text(html: &str) -> String {
    let patterns = markup_patterns();

    let text = html.replace("<br>", "\n").replace("<br />", "\n").replace("<hr />", "\n");
    let text = patterns.block_end.replace_all(&text, "\n\n");
    let text = patterns.list_item.replace_all(&text, "- ");
    let text = patterns.tag.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let joined = lines.join("\n");
    patterns.blank_runs.replace_all(&joined, "\n\n").trim().to_string()
}
