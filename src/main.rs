//! Resume ranker: resume field extraction and candidate ranking tool

use clap::Parser;
use log::{error, info, warn};
use resume_ranker::cli::{self, Cli, Commands, ConfigAction};
use resume_ranker::config::{Config, OutputFormat};
use resume_ranker::error::{Result, ResumeRankerError};
use resume_ranker::input::file_detector::{self, SUPPORTED_EXTENSIONS};
use resume_ranker::input::InputManager;
use resume_ranker::output::formatter::{
    save_report_to_file, suggest_filename, ConsoleFormatter, JsonFormatter, ReportGenerator,
};
use resume_ranker::output::RankingReport;
use resume_ranker::processing::text_processor::TextProcessor;
use resume_ranker::processing::{Candidate, JobPosting, RankingEngine, ResumeParser, SkillVocabulary};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Parse { resume, output, save } => {
            cli::validate_file_extension(&resume, SUPPORTED_EXTENSIONS)
                .map_err(|e| ResumeRankerError::InvalidInput(format!("Resume file: {}", e)))?;

            let output_format = cli::parse_output_format(&output).map_err(ResumeRankerError::InvalidInput)?;
            if !matches!(output_format, OutputFormat::Console | OutputFormat::Json) {
                return Err(ResumeRankerError::InvalidInput(
                    "The parse command supports console and json output".to_string(),
                ));
            }

            let vocabulary = config.load_vocabulary()?;
            let parser = ResumeParser::new(&vocabulary, config.section_patterns())?;

            let text = InputManager::new().extract_text(&resume).await?;
            let parsed = parser.parse_detailed(&text);

            let content = match output_format {
                OutputFormat::Json => JsonFormatter::new(true).format_value(&parsed)?,
                _ => ConsoleFormatter::new(config.output.color_output && save.is_none(), config.output.top_n)
                    .format_resume(&parsed),
            };
            emit(&content, save.as_deref(), output_format)?;
        }

        Commands::Skills { input, context } => {
            cli::validate_file_extension(&input, SUPPORTED_EXTENSIONS)
                .map_err(|e| ResumeRankerError::InvalidInput(format!("Input file: {}", e)))?;

            let vocabulary = config.load_vocabulary()?;
            let parser = ResumeParser::new(&vocabulary, config.section_patterns())?;

            let text = InputManager::new().extract_text(&input).await?;
            let skills: Vec<String> = parser.parse_job(&text).skills.into_iter().collect();
            let contexts = context.map(|window| parser.skills_with_context(&text, window));

            let formatter = ConsoleFormatter::new(config.output.color_output, config.output.top_n);
            println!("{}", formatter.format_skills(&skills, contexts.as_deref()));
        }

        Commands::Rank {
            job,
            resumes,
            preset,
            skills,
            output,
            save,
            top,
        } => {
            let started = Instant::now();

            let preset = match preset {
                Some(preset) => cli::parse_preset(&preset).map_err(ResumeRankerError::InvalidInput)?,
                None => config.scoring.preset,
            };
            let output_format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(ResumeRankerError::InvalidInput)?,
                None => config.output.format,
            };
            let top_n = top.unwrap_or(config.output.top_n);
            let chatty = output_format == OutputFormat::Console || save.is_some();

            let vocabulary = match &skills {
                Some(path) => SkillVocabulary::load(path)?,
                None => config.load_vocabulary()?,
            };
            if vocabulary.is_empty() {
                warn!("Skill vocabulary is empty; skill match scores will all be 0");
            }

            let processor = Arc::new(TextProcessor::new());
            let parser = ResumeParser::with_processor(&vocabulary, config.section_patterns(), Arc::clone(&processor))?;
            let engine = RankingEngine::new(processor, preset);

            let resume_paths = file_detector::collect_documents(&resumes)?;
            if resume_paths.is_empty() {
                return Err(ResumeRankerError::InvalidInput(
                    "No supported resume files found".to_string(),
                ));
            }

            if chatty {
                println!("🚀 Resume ranking");
                println!("💼 Job descriptions: {}", job.len());
                println!("📄 Resumes: {}", resume_paths.len());
                println!("🔧 Preset: {} | Skills in vocabulary: {}", preset, vocabulary.len());
            }

            let mut input_manager = InputManager::new().with_progress(chatty);

            let mut postings = Vec::with_capacity(job.len());
            for path in &job {
                cli::validate_file_extension(path, SUPPORTED_EXTENSIONS)
                    .map_err(|e| ResumeRankerError::InvalidInput(format!("Job description file: {}", e)))?;
                let text = input_manager.extract_text(path).await?;
                let requirement = parser.parse_job(&text);
                info!("{}: {} required skills", path.display(), requirement.skills.len());
                postings.push(JobPosting {
                    id: path.display().to_string(),
                    requirement,
                });
            }

            let candidates = parse_resumes(&mut input_manager, &parser, &resume_paths).await;
            if candidates.is_empty() {
                return Err(ResumeRankerError::Processing(
                    "None of the resumes could be read".to_string(),
                ));
            }

            let rankings = engine.rank_jobs(&candidates, &postings);
            let report = RankingReport::new(
                &rankings,
                &candidates,
                preset,
                started.elapsed().as_millis() as u64,
            );

            let generator = ReportGenerator::new(config.output.color_output && save.is_none(), top_n);
            let content = generator.generate_report(&report, output_format)?;
            emit(&content, save.as_deref(), output_format)?;

            if chatty {
                println!("\n✅ Ranked {} resumes against {} jobs", candidates.len(), postings.len());
            }
        }

        Commands::Config { action } => {
            let config_path = config_file.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let (skill_weight, semantic_weight) = config.scoring.preset.weights();
                    println!("⚙️  Current Configuration\n");
                    println!("Config File: {}", config_path.display());
                    match &config.skills.vocabulary_path {
                        Some(path) => println!("Skill Vocabulary: {}", path.display()),
                        None => println!("Skill Vocabulary: built-in"),
                    }
                    println!("\nScoring Preset: {}", config.scoring.preset);
                    println!("  Skill match: {:.0}%", skill_weight * 100.0);
                    println!("  Semantic: {:.0}%", semantic_weight * 100.0);
                    println!("\nSections:");
                    for (name, aliases) in config.section_patterns() {
                        println!("  {}: {}", name, aliases.join(", "));
                    }
                    println!("\nOutput: {:?} | Colors: {} | Top: {}", config.output.format, config.output.color_output, config.output.top_n);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&config_path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
        }
    }

    Ok(())
}

/// Decode and parse every resume. Unreadable files are reported and skipped.
async fn parse_resumes(
    input_manager: &mut InputManager,
    parser: &ResumeParser,
    paths: &[PathBuf],
) -> Vec<Candidate> {
    let batch = input_manager.decode_batch(paths).await;
    if !batch.failures.is_empty() {
        warn!("{} of {} resumes could not be read", batch.failures.len(), paths.len());
    }

    batch
        .documents
        .into_iter()
        .map(|document| Candidate {
            id: document.path.display().to_string(),
            record: parser.parse(&document.text),
        })
        .collect()
}

/// Print to stdout, or write to `save`. A directory target gets a
/// timestamped file name.
fn emit(content: &str, save: Option<&Path>, format: OutputFormat) -> Result<()> {
    match save {
        Some(path) => {
            let target = if path.is_dir() {
                path.join(suggest_filename(format, true))
            } else {
                path.to_path_buf()
            };
            save_report_to_file(content, &target)?;
            println!("💾 Saved to {}", target.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
