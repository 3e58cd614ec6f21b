//! Vocabulary-driven skill matching

use crate::error::{Result, ResumeRankerError};
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::SkillVocabulary;
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// One skill occurrence together with the words around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillContext {
    pub skill: String,
    pub context: String,
}

/// Finds vocabulary skills in free text.
///
/// Two strategies run over the same text and their results are unioned:
/// whole-word matching of every vocabulary entry (multi-word entries match as
/// contiguous spans), and a phrase pass that compares each candidate noun
/// phrase against the vocabulary. Output never depends on vocabulary order.
pub struct SkillMatcher {
    automaton: AhoCorasick,
    skills: Vec<String>,
    lookup: HashSet<String>,
    processor: Arc<TextProcessor>,
    token: Regex,
}

impl SkillMatcher {
    pub fn new(vocabulary: &SkillVocabulary, processor: Arc<TextProcessor>) -> Result<Self> {
        let skills: Vec<String> = vocabulary.iter().map(str::to_string).collect();

        // Standard semantics so overlapping entries ("java", "javascript") are all reported.
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&skills)
            .map_err(|e| ResumeRankerError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        let lookup = skills.iter().cloned().collect();
        debug!("Skill matcher ready with {} vocabulary entries", skills.len());

        Ok(Self {
            automaton,
            skills,
            lookup,
            processor,
            token: Regex::new(r"\S+").expect("Invalid token regex"),
        })
    }

    /// Vocabulary entries found in `text`, ascending.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let mut found: BTreeSet<String> = self
            .whole_word_matches(text)
            .map(|(skill, _, _)| skill.to_string())
            .collect();

        for phrase in self.processor.noun_phrases(text) {
            if self.lookup.contains(&phrase) {
                found.insert(phrase);
            }
        }

        found.into_iter().collect()
    }

    /// Vocabulary entries occurring anywhere in `text` as a case-insensitive
    /// substring, without word-boundary checks.
    pub fn substring_skills(&self, text: &str) -> BTreeSet<String> {
        self.automaton
            .find_overlapping_iter(text)
            .map(|m| self.skills[m.pattern().as_usize()].clone())
            .collect()
    }

    /// Every whole-word skill occurrence with up to `window` whitespace tokens
    /// on each side, in text order.
    pub fn skills_with_context(&self, text: &str, window: usize) -> Vec<SkillContext> {
        let tokens: Vec<(usize, usize, &str)> = self
            .token
            .find_iter(text)
            .map(|m| (m.start(), m.end(), m.as_str()))
            .collect();

        let mut occurrences: Vec<(usize, usize, &str)> = self
            .whole_word_matches(text)
            .map(|(skill, start, end)| (start, end, skill))
            .collect();
        occurrences.sort();

        occurrences
            .into_iter()
            .filter_map(|(start, end, skill)| {
                let first = tokens.iter().position(|(_, token_end, _)| *token_end > start)?;
                let last = tokens.iter().rposition(|(token_start, _, _)| *token_start < end)?;
                let from = first.saturating_sub(window);
                let to = (last + window).min(tokens.len() - 1);
                let context = tokens[from..=to]
                    .iter()
                    .map(|(_, _, token)| *token)
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(SkillContext {
                    skill: skill.to_string(),
                    context,
                })
            })
            .collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.skills.len()
    }

    /// Occurrences whose neighbours on both sides are not alphanumeric.
    fn whole_word_matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (&'a str, usize, usize)> + 'a {
        self.automaton
            .find_overlapping_iter(text)
            .filter(move |m| is_word_bounded(text, m.start(), m.end()))
            .map(move |m| (self.skills[m.pattern().as_usize()].as_str(), m.start(), m.end()))
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(entries: &[&str]) -> SkillMatcher {
        let vocabulary: SkillVocabulary = entries.iter().collect();
        SkillMatcher::new(&vocabulary, Arc::new(TextProcessor::new())).unwrap()
    }

    #[test]
    fn test_extract_skills_sorted_and_case_insensitive() {
        let matcher = matcher(&["python", "sql", "java"]);
        let skills = matcher.extract_skills("Name: Jane Doe\nEmail: jane@x.com\nSkills: SQL, Python");
        assert_eq!(skills, vec!["python".to_string(), "sql".to_string()]);
    }

    #[test]
    fn test_whole_word_rejects_embedded_matches() {
        let matcher = matcher(&["java", "go", "r"]);
        assert!(matcher.extract_skills("JavaScript and Google products").is_empty());
        assert_eq!(matcher.extract_skills("Go, R and Java"), vec!["go", "java", "r"]);
    }

    #[test]
    fn test_multi_word_and_symbol_entries() {
        let matcher = matcher(&["machine learning", "c++", "node.js", "ci/cd"]);
        let skills = matcher.extract_skills("Built ML pipelines (machine  learning) in C++ with node.js and CI/CD.");
        assert_eq!(skills, vec!["c++", "ci/cd", "machine learning", "node.js"]);
    }

    #[test]
    fn test_vocabulary_order_does_not_matter() {
        let text = "Skilled in Rust, python and data structures; some Java";
        let forward = matcher(&["rust", "python", "data structures", "java", "go"]);
        let backward = matcher(&["go", "java", "data structures", "python", "rust"]);
        assert_eq!(forward.extract_skills(text), backward.extract_skills(text));
    }

    #[test]
    fn test_substring_skills_ignore_boundaries() {
        let matcher = matcher(&["java", "script"]);
        let found = matcher.substring_skills("JavaScript");
        assert!(found.contains("java"));
        assert!(found.contains("script"));
    }

    #[test]
    fn test_empty_vocabulary_matches_nothing() {
        let matcher = matcher(&[]);
        assert_eq!(matcher.vocabulary_size(), 0);
        assert!(matcher.extract_skills("Rust Python SQL").is_empty());
    }

    #[test]
    fn test_skills_with_context_window() {
        let matcher = matcher(&["rust", "sql"]);
        let contexts = matcher.skills_with_context("wrote services in Rust backed by SQL databases", 1);

        assert_eq!(
            contexts,
            vec![
                SkillContext {
                    skill: "rust".to_string(),
                    context: "in Rust backed".to_string(),
                },
                SkillContext {
                    skill: "sql".to_string(),
                    context: "by SQL databases".to_string(),
                },
            ]
        );
    }
}
