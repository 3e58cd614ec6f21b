//! Configuration management for the resume ranker

use crate::error::{Result, ResumeRankerError};
use crate::processing::ranking::ScoringPreset;
use crate::processing::sections::default_section_patterns;
use crate::processing::vocabulary::SkillVocabulary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub skills: SkillsConfig,
    pub sections: SectionsConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsConfig {
    /// One skill per line. The built-in vocabulary is used when unset.
    pub vocabulary_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsConfig {
    /// Section name to header aliases.
    pub patterns: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub preset: ScoringPreset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    /// Candidates shown per job on the console.
    pub top_n: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Csv,
    Html,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            patterns: default_section_patterns(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            top_n: 5,
        }
    }
}

impl Config {
    /// Load the user configuration, writing defaults on first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load an explicit configuration file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ResumeRankerError::Configuration(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeRankerError::Configuration(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    /// The configured vocabulary file, or the built-in list when none is set.
    pub fn load_vocabulary(&self) -> Result<SkillVocabulary> {
        match &self.skills.vocabulary_path {
            Some(path) => SkillVocabulary::load(path),
            None => Ok(SkillVocabulary::builtin()),
        }
    }

    pub fn section_patterns(&self) -> &BTreeMap<String, Vec<String>> {
        &self.sections.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.scoring.preset = ScoringPreset::SkillQuota;
        config.output.top_n = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.scoring.preset, ScoringPreset::SkillQuota);
        assert_eq!(loaded.output.top_n, 3);
        assert!(loaded.section_patterns().contains_key("experience"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\npreset = \"skill-quota\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.scoring.preset, ScoringPreset::SkillQuota);
        assert_eq!(config.output.format, OutputFormat::Console);
        assert_eq!(config.section_patterns().len(), 6);
        assert!(config.skills.vocabulary_path.is_none());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = Config::load_from(Path::new("/no/such/config.toml"));
        assert!(matches!(result, Err(ResumeRankerError::Configuration(_))));
    }

    #[test]
    fn test_missing_vocabulary_file_is_reported() {
        let mut config = Config::default();
        config.skills.vocabulary_path = Some(PathBuf::from("/no/such/skills.txt"));
        assert!(matches!(
            config.load_vocabulary(),
            Err(ResumeRankerError::VocabularyUnavailable { .. })
        ));

        config.skills.vocabulary_path = None;
        assert!(!config.load_vocabulary().unwrap().is_empty());
    }
}
