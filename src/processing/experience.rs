//! Experience section analysis: one entry per role block

use crate::processing::sections::SectionSegmenter;
use crate::processing::text_processor::TextProcessor;
use chrono::NaiveDate;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// End date used when a block carries a single date.
pub const PRESENT: &str = "Present";

/// Texts longer than this many lines are treated as a whole resume and the
/// experience section is isolated first.
const FULL_RESUME_MIN_LINES: usize = 10;

/// Sentences shorter than this are not reported as highlights.
const MIN_HIGHLIGHT_CHARS: usize = 20;

const EARLIEST_YEAR: i32 = 1900;
const LATEST_YEAR: i32 = 2100;

/// Leading words that mark a line as a job title.
const TITLE_WORDS: &[&str] = &[
    "senior", "junior", "lead", "principal", "staff", "chief", "head", "associate",
    "assistant", "software", "backend", "frontend", "full stack", "fullstack", "data",
    "machine learning", "research", "web", "mobile", "devops", "cloud", "qa", "test",
    "product", "project", "engineering", "engineer", "developer", "programmer",
    "analyst", "consultant", "manager", "director", "architect", "designer", "scientist",
    "intern", "trainee", "teaching assistant", "founder", "co-founder", "cto", "ceo",
];

/// Suffixes that mark a capitalized phrase as an organization.
const ORGANIZATION_SUFFIXES: &[&str] = &[
    "inc", "inc.", "llc", "llp", "ltd", "ltd.", "limited", "pvt", "corp", "corp.",
    "corporation", "company", "co.", "technologies", "technology", "solutions", "systems",
    "labs", "software", "services", "consulting", "group", "bank", "university",
    "institute", "college", "foundation", "studios", "networks", "analytics",
];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    /// Start date as written in the resume.
    pub start_date: Option<String>,
    /// End date as written, or `"Present"` when only one date was found.
    pub end_date: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub responsibilities: Vec<String>,
}

impl ExperienceEntry {
    fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.company.is_none()
            && self.title.is_none()
            && self.responsibilities.is_empty()
    }
}

#[derive(Debug, Clone)]
struct DateMention {
    text: String,
    start: usize,
    value: NaiveDate,
}

pub struct ExperienceAnalyzer {
    processor: Arc<TextProcessor>,
    segmenter: Arc<SectionSegmenter>,
    block_separator: Regex,
    month_year: Regex,
    numeric_month_year: Regex,
    year: Regex,
    bullet: Regex,
    company_after_at: Regex,
    title_separator: Regex,
}

impl ExperienceAnalyzer {
    pub fn new(processor: Arc<TextProcessor>, segmenter: Arc<SectionSegmenter>) -> Self {
        Self {
            processor,
            segmenter,
            block_separator: Regex::new(r"\n[ \t\r]*\n").expect("Invalid block separator regex"),
            month_year: Regex::new(
                r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?,?[ \t]*'?(\d{4})\b",
            )
            .expect("Invalid month-year regex"),
            numeric_month_year: Regex::new(r"\b(\d{1,2})/(\d{4})\b").expect("Invalid MM/YYYY regex"),
            year: Regex::new(r"\b(\d{4})\b").expect("Invalid year regex"),
            bullet: Regex::new(r"^\s*(?:[\u{2022}\u{25CF}\u{25AA}\u{25E6}\u{2023}\u{2043}*\-\u{2013}]|\d{1,2}[.)])\s*")
                .expect("Invalid bullet regex"),
            company_after_at: Regex::new(r"(?:\bat|@)[ \t]+([A-Z][\w&.\-]*(?:[ \t]+[A-Z&][\w&.\-]*)*)")
                .expect("Invalid company regex"),
            title_separator: Regex::new(r"[ \t]+(?:at|@|-|\u{2013}|\u{2014})[ \t]+|[|,(]")
                .expect("Invalid title separator regex"),
        }
    }

    /// Split experience text into role entries. Whole resumes are narrowed to
    /// their experience section when one exists.
    pub fn analyze(&self, text: &str) -> Vec<ExperienceEntry> {
        let scope = self.experience_scope(text);

        self.block_separator
            .split(&scope)
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(|block| self.analyze_block(block))
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    /// Sentences of the experience section long enough to stand alone.
    /// Empty when the text has no experience section.
    pub fn highlights(&self, text: &str) -> Vec<String> {
        match self.segmenter.get_section(text, "experience") {
            Some(section) => self
                .processor
                .split_sentences(&section.replace('\n', " "))
                .into_iter()
                .filter(|sentence| sentence.chars().count() > MIN_HIGHLIGHT_CHARS)
                .collect(),
            None => Vec::new(),
        }
    }

    fn experience_scope(&self, text: &str) -> String {
        if text.lines().count() > FULL_RESUME_MIN_LINES {
            if let Some(section) = self.segmenter.get_section(text, "experience") {
                return section;
            }
            debug!("No experience header found; analyzing the whole text");
        }
        text.to_string()
    }

    fn analyze_block(&self, block: &str) -> ExperienceEntry {
        let dates = self.find_dates(block);
        let (start_date, end_date) = match (dates.first(), dates.last()) {
            (Some(first), Some(last)) if dates.len() > 1 => {
                if last.value < first.value {
                    debug!("Role block dates run backwards: {} .. {}", first.text, last.text);
                }
                (Some(first.text.clone()), Some(last.text.clone()))
            }
            (Some(only), _) => (Some(only.text.clone()), Some(PRESENT.to_string())),
            _ => (None, None),
        };

        let mut responsibilities = Vec::new();
        let mut heading_lines = Vec::new();
        for line in block.lines() {
            if let Some(marker) = self.bullet.find(line) {
                let item = line[marker.end()..].trim();
                if !item.is_empty() {
                    responsibilities.push(item.to_string());
                }
            } else if !line.trim().is_empty() {
                heading_lines.push(line.trim());
            }
        }

        let title = heading_lines.iter().find_map(|line| self.extract_title(line));
        let company = self.extract_company(&heading_lines, title.as_deref());

        ExperienceEntry {
            start_date,
            end_date,
            company,
            title,
            responsibilities,
        }
    }

    /// Date mentions in block order. Grammars are tried month-year first,
    /// then MM/YYYY, then bare years; a span claimed by an earlier grammar is
    /// not matched again, even when its fragment turned out to be malformed.
    fn find_dates(&self, block: &str) -> Vec<DateMention> {
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut mentions: Vec<DateMention> = Vec::new();

        for caps in self.month_year.captures_iter(block) {
            let month = month_number(&caps[1]);
            let year = caps[2].parse::<i32>().ok();
            if let Some(found) = caps.get(0) {
                claim_date(&mut claimed, &mut mentions, found, month, year);
            }
        }

        for caps in self.numeric_month_year.captures_iter(block) {
            let month = caps[1].parse::<u32>().ok();
            let year = caps[2].parse::<i32>().ok();
            if let Some(found) = caps.get(0) {
                claim_date(&mut claimed, &mut mentions, found, month, year);
            }
        }

        for caps in self.year.captures_iter(block) {
            let year = caps[1].parse::<i32>().ok();
            if let Some(found) = caps.get(0) {
                claim_date(&mut claimed, &mut mentions, found, Some(1), year);
            }
        }

        mentions.sort_by_key(|mention| mention.start);
        mentions
    }

    /// A heading line that begins with a known title word, cut at the first
    /// separator or date.
    fn extract_title(&self, line: &str) -> Option<String> {
        let lower = line.to_lowercase();
        let starts_with_title = TITLE_WORDS.iter().any(|word| {
            lower.starts_with(word)
                && lower[word.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric())
        });
        if !starts_with_title {
            return None;
        }

        let mut cut = self
            .title_separator
            .find(line)
            .map(|m| m.start())
            .unwrap_or(line.len());
        for date in [&self.month_year, &self.numeric_month_year, &self.year] {
            if let Some(m) = date.find(line) {
                cut = cut.min(m.start());
            }
        }

        let title = line[..cut].trim().trim_end_matches([',', '-', '|']).trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }

    /// Organization name, tried in order: "at X" / "@ X"; a capitalized phrase
    /// ending in an organization suffix; the text after a title on a
    /// "Title, Company" or "Title | Company" line.
    fn extract_company(&self, heading_lines: &[&str], title: Option<&str>) -> Option<String> {
        for line in heading_lines {
            if let Some(caps) = self.company_after_at.captures(line) {
                let name = self.strip_dates(&caps[1]);
                if !name.is_empty() {
                    return Some(name);
                }
            }
        }

        for line in heading_lines {
            for phrase in self.processor.capitalized_phrases(line) {
                let last_word = phrase
                    .split_whitespace()
                    .last()
                    .unwrap_or_default()
                    .to_lowercase();
                if phrase.split_whitespace().count() >= 2
                    && ORGANIZATION_SUFFIXES.contains(&last_word.as_str())
                {
                    return Some(phrase.to_string());
                }
            }
        }

        let title = title?;
        heading_lines.iter().find_map(|line| {
            let rest = line.strip_prefix(title)?;
            let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '|' | '-' | '\u{2013}' | '\u{2014}'));
            let phrase = self.processor.capitalized_phrases(rest).into_iter().next()?;
            let name = self.strip_dates(phrase);
            if name.is_empty() || MONTH_PREFIXES.iter().any(|m| name.to_lowercase().starts_with(m)) {
                None
            } else {
                Some(name)
            }
        })
    }

    fn strip_dates(&self, text: &str) -> String {
        let mut cut = text.len();
        for date in [&self.month_year, &self.numeric_month_year, &self.year] {
            if let Some(m) = date.find(text) {
                cut = cut.min(m.start());
            }
        }
        text[..cut].trim().trim_end_matches([',', '-', '|', '(']).trim().to_string()
    }
}

fn claim_date(
    claimed: &mut Vec<(usize, usize)>,
    mentions: &mut Vec<DateMention>,
    found: regex::Match<'_>,
    month: Option<u32>,
    year: Option<i32>,
) {
    if claimed
        .iter()
        .any(|(start, end)| found.start() < *end && *start < found.end())
    {
        return;
    }
    claimed.push((found.start(), found.end()));

    let value = match (month, year) {
        (Some(month), Some(year)) if (EARLIEST_YEAR..=LATEST_YEAR).contains(&year) => {
            NaiveDate::from_ymd_opt(year, month, 1)
        }
        _ => None,
    };

    match value {
        Some(value) => mentions.push(DateMention {
            text: found.as_str().trim().to_string(),
            start: found.start(),
            value,
        }),
        None => debug!("Skipping malformed date fragment '{}'", found.as_str()),
    }
}

const MONTH_PREFIXES: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTH_PREFIXES
        .iter()
        .position(|prefix| lower.starts_with(prefix))
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ExperienceAnalyzer {
        ExperienceAnalyzer::new(
            Arc::new(TextProcessor::new()),
            Arc::new(SectionSegmenter::default()),
        )
    }

    #[test]
    fn test_drops_blocks_without_fields() {
        let text = "Jan 2020 \u{2013} Present\n- Led team\n\nsome unrelated notes here";
        let entries = analyzer().analyze(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start_date.as_deref(), Some("Jan 2020"));
        assert_eq!(entries[0].end_date.as_deref(), Some(PRESENT));
        assert_eq!(entries[0].responsibilities, vec!["Led team".to_string()]);
    }

    #[test]
    fn test_full_role_block() {
        let text = "Software Engineer at Acme Corp\nMarch 2019 - 06/2021\n\u{2022} Built payment APIs\n1. Mentored two interns";
        let entries = analyzer().analyze(text);

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.title.as_deref(), Some("Software Engineer"));
        assert_eq!(entry.company.as_deref(), Some("Acme Corp"));
        assert_eq!(entry.start_date.as_deref(), Some("March 2019"));
        assert_eq!(entry.end_date.as_deref(), Some("06/2021"));
        assert_eq!(
            entry.responsibilities,
            vec!["Built payment APIs".to_string(), "Mentored two interns".to_string()]
        );
    }

    #[test]
    fn test_dates_ordered_by_position_not_value() {
        let text = "Data Analyst\n2021 - 2018";
        let entries = analyzer().analyze(text);
        assert_eq!(entries[0].start_date.as_deref(), Some("2021"));
        assert_eq!(entries[0].end_date.as_deref(), Some("2018"));
    }

    #[test]
    fn test_malformed_dates_are_skipped() {
        let text = "Intern\n13/2020 and 0042";
        let entries = analyzer().analyze(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Intern"));
        assert_eq!(entries[0].start_date, None);
        assert_eq!(entries[0].end_date, None);
    }

    #[test]
    fn test_company_from_suffix_and_separator() {
        let analyzer = analyzer();

        let entries = analyzer.analyze("Globex Technologies\nBackend Developer\n2020");
        assert_eq!(entries[0].company.as_deref(), Some("Globex Technologies"));
        assert_eq!(entries[0].title.as_deref(), Some("Backend Developer"));

        let entries = analyzer.analyze("Product Manager | Initech\nJan 2018 - Dec 2019");
        assert_eq!(entries[0].title.as_deref(), Some("Product Manager"));
        assert_eq!(entries[0].company.as_deref(), Some("Initech"));
    }

    #[test]
    fn test_full_resume_uses_experience_section() {
        let text = "Jane Doe\njane@x.com\n9876543210\n\nSummary\nEngineer with 2015 roots\n\nExperience\nSoftware Engineer at Acme Corp\nJan 2020 - Present\n- Shipped things\n\nEducation\nB.Tech 2014 - 2018\nSome University\n";
        let entries = analyzer().analyze(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].company.as_deref(), Some("Acme Corp"));
        assert_eq!(entries[0].start_date.as_deref(), Some("Jan 2020"));
    }

    #[test]
    fn test_highlights() {
        let text = "Experience\nBuilt a distributed cache in Rust. Short one.\n\nSkills\nRust";
        let highlights = analyzer().highlights(text);
        assert_eq!(highlights, vec!["Built a distributed cache in Rust.".to_string()]);
        assert!(analyzer().highlights("no sections here").is_empty());
    }
}
