//! Section segmentation by header lines

use crate::error::{Result, ResumeRankerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One header occurrence and the span it opens.
///
/// `start` is the offset of the header line, `content_start` the offset just
/// past it, and `end` the start of the next header (or the text length).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub name: String,
    pub header: String,
    pub start: usize,
    pub content_start: usize,
    pub end: usize,
}

/// Default header aliases per section name.
pub fn default_section_patterns() -> BTreeMap<String, Vec<String>> {
    let defaults: [(&str, &[&str]); 6] = [
        ("education", &["education", "academic background", "academic qualifications", "qualifications"]),
        (
            "experience",
            &[
                "experience",
                "work experience",
                "professional experience",
                "employment history",
                "employment",
                "internships",
                "internship",
            ],
        ),
        ("skills", &["skills", "technical skills", "core competencies", "key skills"]),
        ("projects", &["projects", "personal projects", "academic projects"]),
        ("summary", &["summary", "professional summary", "objective", "profile", "about me"]),
        ("achievements", &["achievements", "awards", "honors", "certifications"]),
    ];

    defaults
        .iter()
        .map(|(name, aliases)| {
            (
                name.to_string(),
                aliases.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect()
}

pub struct SectionSegmenter {
    rules: Vec<(String, Regex)>,
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new(&default_section_patterns()).expect("default section patterns are valid")
    }
}

impl SectionSegmenter {
    /// Compile one case-insensitive whole-line rule per section. A header line
    /// holds exactly one alias, optionally followed by a colon.
    pub fn new(patterns: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut rules = Vec::new();

        for (name, aliases) in patterns {
            let mut aliases: Vec<&str> = aliases
                .iter()
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .collect();
            if aliases.is_empty() {
                continue;
            }
            aliases.sort_by(|a, b| b.len().cmp(&a.len()));

            let alternation = aliases
                .iter()
                .map(|a| regex::escape(a))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?im)^[ \t]*(?:{})[ \t]*:?[ \t]*\r?$", alternation);
            let rule = Regex::new(&pattern).map_err(|e| {
                ResumeRankerError::Configuration(format!(
                    "Invalid header aliases for section '{}': {}",
                    name, e
                ))
            })?;
            rules.push((name.to_lowercase(), rule));
        }

        Ok(Self { rules })
    }

    /// Every header occurrence in offset order. The spans tile the text from
    /// the first header to the end without gaps or overlaps.
    pub fn bounds(&self, text: &str) -> Vec<SectionBounds> {
        let mut hits: Vec<(usize, usize, &str)> = Vec::new();
        for (name, rule) in &self.rules {
            for m in rule.find_iter(text) {
                hits.push((m.start(), m.end(), name.as_str()));
            }
        }

        // Rules are in name order, so a stable sort keeps the first name on ties.
        hits.sort_by_key(|(start, _, _)| *start);
        hits.dedup_by_key(|(start, _, _)| *start);

        let mut bounds = Vec::with_capacity(hits.len());
        for (idx, (start, header_end, name)) in hits.iter().enumerate() {
            let end = hits.get(idx + 1).map(|(next, _, _)| *next).unwrap_or(text.len());
            let content_start = text[*header_end..end]
                .find('\n')
                .map(|nl| header_end + nl + 1)
                .unwrap_or(end);

            bounds.push(SectionBounds {
                name: name.to_string(),
                header: text[*start..*header_end].trim().to_string(),
                start: *start,
                content_start,
                end,
            });
        }

        bounds
    }

    /// Section name to trimmed content. A section that appears more than once
    /// keeps its last occurrence. Sections without a header have no key.
    pub fn segment(&self, text: &str) -> BTreeMap<String, String> {
        let mut sections = BTreeMap::new();
        for bound in self.bounds(text) {
            let content = text[bound.content_start..bound.end].trim().to_string();
            sections.insert(bound.name, content);
        }
        sections
    }

    pub fn get_section(&self, text: &str, name: &str) -> Option<String> {
        self.segment(text).remove(&name.to_lowercase())
    }
}
