//! Field extractors for contact details, education and projects
//!
//! Every extractor reads the same text independently and returns `None` when
//! it cannot find its target. Name extraction runs an ordered cascade of
//! strategies; the first one that matches wins.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name-detection strategies, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameStrategy {
    /// A `Name:` line within the first five lines.
    LabeledLine,
    /// The first two consecutive Title Case words anywhere in the text.
    TitleCasePair,
    /// The first two consecutive ALL-CAPS words, returned in Title Case.
    UpperCasePair,
}

impl NameStrategy {
    pub const ORDER: [NameStrategy; 3] = [
        NameStrategy::LabeledLine,
        NameStrategy::TitleCasePair,
        NameStrategy::UpperCasePair,
    ];
}

/// Lines scanned for an explicit `Name:` label.
const NAME_LABEL_SCAN_LINES: usize = 5;

/// Lines absorbed after a project-indicator line.
const PROJECT_DESCRIPTION_LINES: usize = 2;

/// Credential patterns: degree abbreviations and full names. Two-letter
/// abbreviations (`B.E`, `M.E`) need their dot, otherwise every "be" and
/// "me" in running text would count.
const EDUCATION_PATTERNS: &[&str] = &[
    r"b\.?tech",
    r"bachelor of technology",
    r"b\.e",
    r"bachelor of engineering",
    r"b\.?sc",
    r"bachelor of science",
    r"b\.?c\.?a",
    r"b\.?com",
    r"m\.?tech",
    r"master of technology",
    r"m\.e",
    r"master of engineering",
    r"m\.?sc",
    r"master of science",
    r"m\.?c\.?a",
    r"m\.?b\.?a",
    r"ph\.?d",
    r"high school",
    r"secondary school",
    r"senior secondary",
];

pub struct FieldExtractor {
    labeled_name: Regex,
    title_case_pair: Regex,
    upper_case_pair: Regex,
    email: Regex,
    phone: Regex,
    github: Regex,
    linkedin: Regex,
    education: Vec<Regex>,
    project_indicator: Regex,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        let labeled_name = Regex::new(r"^(?i:name)[ \t]*[:\-]?[ \t]*([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)?)")
            .expect("Invalid labeled name regex");
        let title_case_pair = Regex::new(r"\b([A-Z][a-z]+)[ \t]+([A-Z][a-z]+)\b")
            .expect("Invalid title case regex");
        let upper_case_pair = Regex::new(r"\b([A-Z]{2,})[ \t]+([A-Z]{2,})\b")
            .expect("Invalid upper case regex");

        // Whitespace is tolerated after '@' and before the TLD dot because PDF
        // decoders break addresses across lines.
        let email = Regex::new(r"[a-zA-Z0-9._%+-]+@\s*[a-zA-Z0-9.-]+\s*\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        // Indian mobile numbering: optional +91, ten digits starting 6-9.
        let phone = Regex::new(r"(?:\+91[ -]?)?[6-9](?:[ -]?\d){9}").expect("Invalid phone regex");

        let github = Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[a-zA-Z0-9_-]+")
            .expect("Invalid GitHub regex");
        let linkedin = Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[a-zA-Z0-9_-]+")
            .expect("Invalid LinkedIn regex");

        let education = EDUCATION_PATTERNS
            .iter()
            .map(|p| Regex::new(&format!(r"(?i)\b{}\b", p)).expect("Invalid education regex"))
            .collect();

        let project_indicator = Regex::new(
            r"(?i)\b(?:projects?|clones?|systems?|detection|apps?|applications?|implementation)\b",
        )
        .expect("Invalid project indicator regex");

        Self {
            labeled_name,
            title_case_pair,
            upper_case_pair,
            email,
            phone,
            github,
            linkedin,
            education,
            project_indicator,
        }
    }

    /// Run the name cascade and report which strategy produced the result.
    pub fn extract_name_with_strategy(&self, text: &str) -> Option<(String, NameStrategy)> {
        NameStrategy::ORDER
            .iter()
            .find_map(|strategy| self.apply_name_strategy(*strategy, text).map(|n| (n, *strategy)))
    }

    pub fn extract_name(&self, text: &str) -> Option<String> {
        self.extract_name_with_strategy(text).map(|(name, _)| name)
    }

    fn apply_name_strategy(&self, strategy: NameStrategy, text: &str) -> Option<String> {
        match strategy {
            NameStrategy::LabeledLine => text
                .trim()
                .lines()
                .take(NAME_LABEL_SCAN_LINES)
                .find_map(|line| self.labeled_name.captures(line.trim()))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" ")),
            NameStrategy::TitleCasePair => self
                .title_case_pair
                .captures(text)
                .map(|caps| format!("{} {}", &caps[1], &caps[2])),
            NameStrategy::UpperCasePair => self
                .upper_case_pair
                .captures(text)
                .map(|caps| format!("{} {}", title_case(&caps[1]), title_case(&caps[2]))),
        }
    }

    /// First e-mail address, with any whitespace inside it removed.
    pub fn extract_email(&self, text: &str) -> Option<String> {
        self.email
            .find(text)
            .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
    }

    pub fn extract_phone(&self, text: &str) -> Option<String> {
        self.phone.find(text).map(|m| m.as_str().trim().to_string())
    }

    pub fn extract_github_url(&self, text: &str) -> Option<String> {
        find_in_despaced(&self.github, text)
    }

    pub fn extract_linkedin_url(&self, text: &str) -> Option<String> {
        find_in_despaced(&self.linkedin, text)
    }

    /// Credential tokens, uppercased with punctuation removed.
    pub fn extract_education(&self, text: &str) -> Option<BTreeSet<String>> {
        let credentials: BTreeSet<String> = self
            .education
            .iter()
            .flat_map(|pattern| pattern.find_iter(text))
            .map(|m| normalize_credential(m.as_str()))
            .filter(|c| !c.is_empty())
            .collect();

        if credentials.is_empty() {
            None
        } else {
            Some(credentials)
        }
    }

    /// Lines mentioning a project indicator, each joined with up to two
    /// following lines of description.
    pub fn extract_projects(&self, text: &str) -> Option<Vec<String>> {
        let lines: Vec<&str> = text.lines().collect();
        let mut projects = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if !self.project_indicator.is_match(line) {
                continue;
            }
            let block = std::iter::once(*line)
                .chain(lines.iter().skip(idx + 1).take(PROJECT_DESCRIPTION_LINES).copied())
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            projects.push(block);
        }

        if projects.is_empty() {
            None
        } else {
            Some(projects)
        }
    }
}

/// Spaces and tabs are removed before URL matching; newlines are kept so a
/// handle does not run into the next line.
fn find_in_despaced(pattern: &Regex, text: &str) -> Option<String> {
    let despaced: String = text.chars().filter(|c| *c != ' ' && *c != '\t').collect();
    pattern.find(&despaced).map(|m| m.as_str().to_string())
}

fn normalize_credential(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_label() {
        let extractor = FieldExtractor::new();
        let text = "Name: Jane Doe\nEmail: jane@x.com\nSkills: Python, SQL";
        assert_eq!(
            extractor.extract_name_with_strategy(text),
            Some(("Jane Doe".to_string(), NameStrategy::LabeledLine))
        );
    }

    #[test]
    fn test_name_label_only_in_first_five_lines() {
        let extractor = FieldExtractor::new();
        let text = "a\nb\nc\nd\ne\nName: Jane Doe";
        assert_eq!(
            extractor.extract_name_with_strategy(text),
            Some(("Jane Doe".to_string(), NameStrategy::TitleCasePair))
        );
    }

    #[test]
    fn test_name_title_case_fallback() {
        let extractor = FieldExtractor::new();
        let text = "resume of\nJohn Smith\njohn@example.com";
        assert_eq!(extractor.extract_name(text), Some("John Smith".to_string()));
    }

    #[test]
    fn test_name_upper_case_fallback() {
        let extractor = FieldExtractor::new();
        let text = "KUNAL SHARMA\nkunal@example.com";
        assert_eq!(
            extractor.extract_name_with_strategy(text),
            Some(("Kunal Sharma".to_string(), NameStrategy::UpperCasePair))
        );
    }

    #[test]
    fn test_name_not_found() {
        let extractor = FieldExtractor::new();
        assert_eq!(extractor.extract_name("lowercase only text 123"), None);
    }

    #[test]
    fn test_email_tolerates_split_addresses() {
        let extractor = FieldExtractor::new();
        assert_eq!(
            extractor.extract_email("Email: jane@x.com"),
            Some("jane@x.com".to_string())
        );
        assert_eq!(
            extractor.extract_email("mail: jane.doe@ gmail .com | other@y.org"),
            Some("jane.doe@gmail.com".to_string())
        );
        assert_eq!(extractor.extract_email("no address here"), None);
    }

    #[test]
    fn test_phone_indian_numbers() {
        let extractor = FieldExtractor::new();
        assert_eq!(
            extractor.extract_phone("Phone: +91 9876543210"),
            Some("+91 9876543210".to_string())
        );
        assert_eq!(
            extractor.extract_phone("call 98765-43210 now"),
            Some("98765-43210".to_string())
        );
        assert_eq!(extractor.extract_phone("Phone: 555-123-4567"), None);
    }

    #[test]
    fn test_profile_urls() {
        let extractor = FieldExtractor::new();
        let text = "GitHub: github .com/janedoe\nLinkedIn: https://www.linkedin.com/in/jane-doe";
        assert_eq!(
            extractor.extract_github_url(text),
            Some("github.com/janedoe".to_string())
        );
        assert_eq!(
            extractor.extract_linkedin_url(text),
            Some("https://www.linkedin.com/in/jane-doe".to_string())
        );
        assert_eq!(extractor.extract_github_url("nothing"), None);
    }

    #[test]
    fn test_education_credentials() {
        let extractor = FieldExtractor::new();
        let text = "B.Tech in Computer Science\nSenior Secondary, 2016\nPh.D. candidate";
        let education = extractor.extract_education(text).unwrap();

        assert!(education.contains("BTECH"));
        assert!(education.contains("SENIOR SECONDARY"));
        assert!(education.contains("PHD"));
        assert_eq!(extractor.extract_education("I will be there with me"), None);
    }

    #[test]
    fn test_projects_absorb_following_lines() {
        let extractor = FieldExtractor::new();
        let text = "Netflix Clone\nBuilt with React\nDeployed on Vercel\nHobbies\nChess";
        let projects = extractor.extract_projects(text).unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0], "Netflix Clone Built with React Deployed on Vercel");
        assert_eq!(extractor.extract_projects("nothing relevant"), None);
    }
}
