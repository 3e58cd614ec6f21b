//! Resume and job-description parsing
//!
//! Wires the normalizer, segmenter, field extractors, experience analyzer and
//! skill matcher together. One `ResumeParser` is built per run; the language
//! context and the vocabulary automaton inside it are shared by every call.

use crate::error::Result;
use crate::processing::experience::{ExperienceAnalyzer, ExperienceEntry};
use crate::processing::extractors::{FieldExtractor, NameStrategy};
use crate::processing::sections::SectionSegmenter;
use crate::processing::skill_matcher::{SkillContext, SkillMatcher};
use crate::processing::text_processor::{collapse_whitespace, normalize, TextProcessor};
use crate::processing::vocabulary::SkillVocabulary;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Structured fields of one resume. Built once and never modified.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub education: BTreeSet<String>,
    pub experience: Vec<ExperienceEntry>,
    /// Normalized resume text.
    pub full_text: String,
}

/// Skill and text subset of a job description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobRequirement {
    pub skills: BTreeSet<String>,
    pub full_text: String,
}

/// A record plus the intermediate results that do not belong on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedResume {
    pub record: ResumeRecord,
    pub name_strategy: Option<NameStrategy>,
    pub sections: Vec<String>,
    pub projects: Vec<String>,
    pub highlights: Vec<String>,
}

pub struct ResumeParser {
    segmenter: Arc<SectionSegmenter>,
    extractor: FieldExtractor,
    experience: ExperienceAnalyzer,
    skills: SkillMatcher,
}

impl ResumeParser {
    pub fn new(
        vocabulary: &SkillVocabulary,
        section_patterns: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self> {
        let processor = Arc::new(TextProcessor::new());
        Self::with_processor(vocabulary, section_patterns, processor)
    }

    pub fn with_processor(
        vocabulary: &SkillVocabulary,
        section_patterns: &BTreeMap<String, Vec<String>>,
        processor: Arc<TextProcessor>,
    ) -> Result<Self> {
        let segmenter = Arc::new(SectionSegmenter::new(section_patterns)?);
        let experience = ExperienceAnalyzer::new(Arc::clone(&processor), Arc::clone(&segmenter));
        let skills = SkillMatcher::new(vocabulary, processor)?;

        Ok(Self {
            segmenter,
            extractor: FieldExtractor::new(),
            experience,
            skills,
        })
    }

    /// Build a `ResumeRecord` from decoded resume text.
    pub fn parse(&self, raw: &str) -> ResumeRecord {
        self.parse_detailed(raw).record
    }

    pub fn parse_detailed(&self, raw: &str) -> ParsedResume {
        let full_text = normalize(raw);

        let (name, name_strategy) = match self.extractor.extract_name_with_strategy(raw) {
            Some((name, strategy)) => (Some(name), Some(strategy)),
            None => (None, None),
        };

        let record = ResumeRecord {
            name,
            email: self.extractor.extract_email(raw),
            phone: self.extractor.extract_phone(raw),
            skills: self.skills.extract_skills(&collapse_whitespace(raw)).into_iter().collect(),
            github: self.extractor.extract_github_url(raw),
            linkedin: self.extractor.extract_linkedin_url(raw),
            education: self.extractor.extract_education(raw).unwrap_or_default(),
            experience: self.experience.analyze(raw),
            full_text,
        };

        debug!(
            "Parsed resume: name={:?}, {} skills, {} experience entries",
            record.name,
            record.skills.len(),
            record.experience.len()
        );

        ParsedResume {
            record,
            name_strategy,
            sections: self.segmenter.bounds(raw).into_iter().map(|b| b.name).collect(),
            projects: self.extractor.extract_projects(raw).unwrap_or_default(),
            highlights: self.experience.highlights(raw),
        }
    }

    pub fn parse_job(&self, raw: &str) -> JobRequirement {
        let skills = self.skills.extract_skills(&collapse_whitespace(raw)).into_iter().collect();
        JobRequirement {
            skills,
            full_text: normalize(raw),
        }
    }

    pub fn skills_with_context(&self, raw: &str, window: usize) -> Vec<SkillContext> {
        self.skills.skills_with_context(&collapse_whitespace(raw), window)
    }

    pub fn skill_matcher(&self) -> &SkillMatcher {
        &self.skills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::sections::default_section_patterns;

    fn parser(skills: &[&str]) -> ResumeParser {
        let vocabulary: SkillVocabulary = skills.iter().collect();
        ResumeParser::new(&vocabulary, &default_section_patterns()).unwrap()
    }

    #[test]
    fn test_parse_labeled_resume() {
        let parser = parser(&["python", "sql", "java"]);
        let record = parser.parse("Name: Jane Doe\nEmail: jane@x.com\nSkills: Python, SQL");

        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.email.as_deref(), Some("jane@x.com"));
        assert_eq!(
            record.skills,
            ["python", "sql"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>()
        );
        assert_eq!(record.full_text, "Name: Jane Doe Email: jane@x. com Skills: Python, SQL");
    }

    #[test]
    fn test_parse_detailed_reports_sections() {
        let parser = parser(&["rust"]);
        let text = "Alex Kumar\n+91 9876543210\n\nExperience\nBackend Developer at Initech Labs\n2021 - 2023\n- Wrote Rust services for billing.\n\nProjects\nChat Application\nRealtime chat in Rust\n\nEducation\nB.Tech, 2020\n";
        let parsed = parser.parse_detailed(text);

        assert_eq!(parsed.record.name.as_deref(), Some("Alex Kumar"));
        assert_eq!(parsed.name_strategy, Some(NameStrategy::TitleCasePair));
        assert_eq!(parsed.record.phone.as_deref(), Some("+91 9876543210"));
        assert_eq!(parsed.sections, vec!["experience", "projects", "education"]);
        assert!(parsed.record.education.contains("BTECH"));
        assert_eq!(parsed.record.experience.len(), 1);
        assert_eq!(parsed.record.experience[0].company.as_deref(), Some("Initech Labs"));
        assert!(parsed.projects.iter().any(|p| p.starts_with("Chat Application")));
    }

    #[test]
    fn test_parse_job_requirement() {
        let parser = parser(&["python", "sql", "docker"]);
        let job = parser.parse_job("We need Python and Docker experience.");
        assert_eq!(job.skills, ["docker", "python"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>());
        assert_eq!(job.full_text, "We need Python and Docker experience.");
    }

    #[test]
    fn test_symbol_skills_survive_parsing() {
        let parser = parser(&["node.js", "c#", "python", "asp.net"]);

        let record = parser.parse("Skills: Node.js, C#, Python, ASP.NET");
        assert_eq!(
            record.skills,
            ["asp.net", "c#", "node.js", "python"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>()
        );

        let job = parser.parse_job("Need Node.js and C# developer");
        assert_eq!(job.skills, ["c#", "node.js"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>());

        let contexts = parser.skills_with_context("Need Node.js and C# developer", 1);
        assert_eq!(contexts[0].context, "Need Node.js and");
    }

    #[test]
    fn test_builtin_vocabulary_finds_symbol_skills() {
        let parser = ResumeParser::new(&SkillVocabulary::builtin(), &default_section_patterns()).unwrap();
        let job = parser.parse_job("Node.js and C# expert");
        assert!(job.skills.contains("node.js"));
        assert!(job.skills.contains("c#"));
    }

    #[test]
    fn test_parse_empty_text() {
        let parser = parser(&["python"]);
        let record = parser.parse("");
        assert_eq!(record, ResumeRecord::default());
    }
}
