//! Controlled skill vocabulary

use crate::error::{Result, ResumeRankerError};
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::Path;

/// Deduplicated, lowercased skill tokens. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillVocabulary {
    skills: BTreeSet<String>,
}

impl SkillVocabulary {
    /// Build from one-skill-per-line text. Blank lines are ignored and entries
    /// are trimmed and lowercased.
    pub fn from_lines(content: &str) -> Self {
        Self::from_iter(content.lines())
    }

    /// Load a vocabulary file. A missing or unreadable file is an error; a
    /// readable file without entries yields an empty vocabulary.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResumeRankerError::VocabularyUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        let vocabulary = Self::from_lines(&content);
        info!("Loaded {} skills from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }

    /// Vocabulary used when no vocabulary file is configured.
    pub fn builtin() -> Self {
        let vocabulary = Self::from_iter(BUILTIN_SKILLS.iter().copied());
        debug!("Using built-in vocabulary with {} skills", vocabulary.len());
        vocabulary
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.contains(&skill.trim().to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillVocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let skills = iter
            .into_iter()
            .map(|line| line.as_ref().trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Self { skills }
    }
}

const BUILTIN_SKILLS: &[&str] = &[
    // Programming languages
    "c++", "c#", "java", "python", "javascript", "typescript", "go", "rust", "kotlin",
    "swift", "php", "ruby", "scala", "r",
    // Web
    "html", "css", "react", "reactjs", "angular", "vue", "node.js", "nodejs", "express",
    "expressjs", "django", "flask", "spring", "hibernate", "bootstrap", "tailwind css",
    // Data
    "sql", "nosql", "mongodb", "postgresql", "mysql", "redis", "pandas", "numpy",
    "tableau", "power bi", "excel", "machine learning", "deep learning", "tensorflow",
    "pytorch", "scikit-learn",
    // Infrastructure and tooling
    "aws", "azure", "gcp", "docker", "kubernetes", "git", "github", "gitlab", "ci/cd",
    "jenkins", "linux",
    // Practices and fundamentals
    "agile", "scrum", "kanban", "jira", "object-oriented programming", "data structures",
    "algorithms",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_lines_normalizes_and_dedups() {
        let vocabulary = SkillVocabulary::from_lines("Python\n\n  SQL \npython\n   \nJava");
        assert_eq!(vocabulary.len(), 3);
        assert!(vocabulary.contains("python"));
        assert!(vocabulary.contains("SQL"));
        assert_eq!(vocabulary.iter().collect::<Vec<_>>(), vec!["java", "python", "sql"]);
    }

    #[test]
    fn test_load_missing_file_is_distinct_error() {
        let result = SkillVocabulary::load(Path::new("/definitely/not/here/skills.txt"));
        assert!(matches!(
            result,
            Err(ResumeRankerError::VocabularyUnavailable { .. })
        ));
    }

    #[test]
    fn test_load_empty_file_is_empty_vocabulary() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n   \n").unwrap();

        let vocabulary = SkillVocabulary::load(file.path()).unwrap();
        assert!(vocabulary.is_empty());
    }

    #[test]
    fn test_builtin_is_lowercase() {
        let vocabulary = SkillVocabulary::builtin();
        assert!(!vocabulary.is_empty());
        assert!(vocabulary.iter().all(|s| s == s.to_lowercase()));
    }
}
