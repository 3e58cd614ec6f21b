//! CLI interface for the resume ranker

use crate::config::OutputFormat;
use crate::processing::ranking::ScoringPreset;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Resume field extraction and candidate ranking")]
#[command(long_about = "Extract contact details, skills, education and experience from resumes, and rank resumes against job descriptions by skill overlap and text similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract structured fields from a resume
    Parse {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Output format: console, json
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// List vocabulary skills found in a document
    Skills {
        /// Path to a resume or job description
        #[arg(short, long)]
        input: PathBuf,

        /// Show each occurrence with this many surrounding words
        #[arg(long)]
        context: Option<usize>,
    },

    /// Rank resumes against one or more job descriptions
    Rank {
        /// Job description files (TXT, MD, PDF)
        #[arg(short, long, required = true, num_args = 1..)]
        job: Vec<PathBuf>,

        /// Resume files or directories containing resumes
        #[arg(short, long, required = true, num_args = 1..)]
        resumes: Vec<PathBuf>,

        /// Scoring preset: holistic, skill-quota
        #[arg(short, long)]
        preset: Option<String>,

        /// Skill vocabulary file, one skill per line
        #[arg(long)]
        skills: Option<PathBuf>,

        /// Output format: console, json, csv, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Number of candidates shown per job on the console
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "csv" => Ok(OutputFormat::Csv),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, csv, html", format)),
    }
}

pub fn parse_preset(preset: &str) -> Result<ScoringPreset, String> {
    preset.parse::<ScoringPreset>().map_err(|e| e.to_string())
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
