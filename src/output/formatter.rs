//! Output formatters for ranking reports and parsed resumes

use crate::config::OutputFormat;
use crate::error::{Result, ResumeRankerError};
use crate::output::report::{JobReport, RankingReport, ReportEntry};
use crate::processing::parser::ParsedResume;
use crate::processing::skill_matcher::SkillContext;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Candidates highlighted at the top of the HTML report.
const HTML_HIGHLIGHTED: usize = 3;

/// Trait for formatting ranking reports
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    top_n: usize,
}

pub struct JsonFormatter {
    pretty: bool,
}

/// One row per job and candidate
pub struct CsvFormatter;

pub struct HtmlFormatter;

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    csv_formatter: CsvFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Ranking Report</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 960px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .job {
            background: white;
            padding: 24px;
            margin-bottom: 24px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .job h2 { color: #007acc; border-bottom: 2px solid #e9ecef; padding-bottom: 8px; }
        .candidate { border-left: 4px solid #dee2e6; padding: 8px 16px; margin: 12px 0; }
        .top-candidate { border-left-color: #28a745; background: #f1fbf3; }
        .rank-badge {
            display: inline-block;
            min-width: 32px;
            padding: 2px 10px;
            border-radius: 16px;
            font-weight: bold;
            color: white;
            background: #6c757d;
            text-align: center;
        }
        .top-candidate .rank-badge { background: #28a745; }
        .scores { color: #495057; font-size: 0.95em; }
        .chip { display: inline-block; padding: 1px 8px; margin: 2px; border-radius: 10px; font-size: 0.85em; }
        .chip-match { background: #d4edda; color: #155724; }
        .chip-missing { background: #f8d7da; color: #721c24; }
        .footer { text-align: center; color: #6c757d; font-size: 0.9em; }
    </style>
</head>
<body>
    <h1>Resume Ranking Report</h1>
    <p>Generated: {{ generated_at }} | Preset: {{ preset }} | Resumes: {{ resume_count }}</p>
    {% for job in jobs %}
    <div class="job">
        <h2>{{ job.job_id }}</h2>
        <p><strong>Required skills:</strong> {{ job.job_skills }}</p>
        {% for entry in job.entries %}
        <div class="candidate{% if entry.highlighted %} top-candidate{% endif %}">
            <h3><span class="rank-badge">#{{ entry.rank }}</span> {{ entry.name }} <small>{{ entry.resume_id }}</small></h3>
            {% if !entry.email.is_empty() %}<p>{{ entry.email }}</p>{% endif %}
            <p class="scores"><strong>{{ entry.final_score }}%</strong> overall | skill match {{ entry.skill_score }}% | semantic {{ entry.semantic_score }}%</p>
            <div>
                {% for skill in entry.matching_skills %}<span class="chip chip-match">{{ skill }}</span>{% endfor %}
                {% for skill in entry.missing_skills %}<span class="chip chip-missing">{{ skill }}</span>{% endfor %}
            </div>
        </div>
        {% endfor %}
    </div>
    {% endfor %}
    <p class="footer">Generated by Resume Ranker v{{ version }}</p>
</body>
</html>"#,
    ext = "html"
)]
struct HtmlTemplate {
    generated_at: String,
    preset: String,
    resume_count: usize,
    version: String,
    jobs: Vec<HtmlJob>,
}

struct HtmlJob {
    job_id: String,
    job_skills: String,
    entries: Vec<HtmlEntry>,
}

struct HtmlEntry {
    rank: usize,
    name: String,
    resume_id: String,
    email: String,
    final_score: String,
    skill_score: String,
    semantic_score: String,
    matching_skills: Vec<String>,
    missing_skills: Vec<String>,
    highlighted: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, top_n: usize) -> Self {
        Self { use_colors, top_n }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match score {
            s if s >= 80.0 => ("EXCELLENT", Color::Green),
            s if s >= 60.0 => ("GOOD", Color::BrightGreen),
            s if s >= 40.0 => ("FAIR", Color::Yellow),
            s if s >= 20.0 => ("WEAK", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_entry(&self, entry: &ReportEntry) -> String {
        let mut output = format!(
            "#{:<3} {} ({})  {:.1}% {}\n",
            entry.rank,
            self.colorize(entry.display_name(), Color::Cyan),
            entry.resume_id,
            entry.final_score,
            self.format_score_badge(entry.final_score)
        );
        output.push_str(&format!(
            "     Skill match: {:.1}% | Semantic: {:.1}%\n",
            entry.skill_match_score, entry.semantic_score
        ));
        if !entry.matching_skills.is_empty() {
            output.push_str(&format!("     ✓ {}\n", self.colorize(&join(&entry.matching_skills), Color::Green)));
        }
        if !entry.missing_skills.is_empty() {
            output.push_str(&format!("     ✗ {}\n", self.colorize(&join(&entry.missing_skills), Color::Red)));
        }
        output
    }

    fn format_job(&self, job: &JobReport) -> String {
        let mut output = self.format_header(&format!("Job: {}", job.job_id), 2);
        if job.job_skills.is_empty() {
            output.push_str("Required skills: none detected\n\n");
        } else {
            output.push_str(&format!("Required skills: {}\n\n", join(&job.job_skills)));
        }

        for entry in job.entries.iter().take(self.top_n) {
            output.push_str(&self.format_entry(entry));
        }
        if job.entries.len() > self.top_n {
            output.push_str(&format!(
                "     ... and {} more candidates\n",
                job.entries.len() - self.top_n
            ));
        }
        output
    }

    /// Extracted fields of a single resume.
    pub fn format_resume(&self, parsed: &ParsedResume) -> String {
        let record = &parsed.record;
        let mut output = self.format_header("📄 RESUME FIELDS", 1);

        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        output.push_str(&format!("Name:     {}\n", self.colorize(&field(&record.name), Color::Cyan)));
        output.push_str(&format!("Email:    {}\n", field(&record.email)));
        output.push_str(&format!("Phone:    {}\n", field(&record.phone)));
        output.push_str(&format!("GitHub:   {}\n", field(&record.github)));
        output.push_str(&format!("LinkedIn: {}\n", field(&record.linkedin)));

        if !parsed.sections.is_empty() {
            output.push_str(&format!("Sections: {}\n", parsed.sections.join(", ")));
        }

        output.push_str(&self.format_header(&format!("Skills ({})", record.skills.len()), 2));
        output.push_str(&format!("{}\n", join(&record.skills)));

        if !record.education.is_empty() {
            output.push_str(&self.format_header("Education", 2));
            output.push_str(&format!("{}\n", join(&record.education)));
        }

        if !record.experience.is_empty() {
            output.push_str(&self.format_header("Experience", 2));
            for entry in &record.experience {
                let title = entry.title.as_deref().unwrap_or("Untitled role");
                let company = entry.company.as_deref().map(|c| format!(" @ {}", c)).unwrap_or_default();
                let dates = match (&entry.start_date, &entry.end_date) {
                    (Some(start), Some(end)) => format!(" ({} - {})", start, end),
                    (Some(start), None) => format!(" ({})", start),
                    _ => String::new(),
                };
                output.push_str(&format!("• {}{}{}\n", self.colorize(title, Color::Yellow), company, dates));
                for item in &entry.responsibilities {
                    output.push_str(&format!("    - {}\n", item));
                }
            }
        }

        if !parsed.projects.is_empty() {
            output.push_str(&self.format_header("Projects", 2));
            for project in &parsed.projects {
                output.push_str(&format!("• {}\n", project));
            }
        }

        if !parsed.highlights.is_empty() {
            output.push_str(&self.format_header("Highlights", 3));
            for highlight in &parsed.highlights {
                output.push_str(&format!("• {}\n", highlight));
            }
        }

        output
    }

    /// Skills found in a document, optionally with each occurrence in context.
    pub fn format_skills(&self, skills: &[String], contexts: Option<&[SkillContext]>) -> String {
        let mut output = self.format_header(&format!("🎯 SKILLS FOUND ({})", skills.len()), 1);
        for skill in skills {
            output.push_str(&format!("• {}\n", self.colorize(skill, Color::Green)));
        }

        if let Some(contexts) = contexts {
            output.push_str(&self.format_header("Occurrences", 2));
            for occurrence in contexts {
                output.push_str(&format!(
                    "{}: \"{}\"\n",
                    self.colorize(&occurrence.skill, Color::Cyan),
                    occurrence.context
                ));
            }
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 CANDIDATE RANKING", 1));
        output.push_str(&format!(
            "Generated: {} | Preset: {} | {} resumes against {} jobs | {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.preset,
            report.metadata.resume_count,
            report.metadata.job_count,
            report.metadata.processing_time_ms
        ));

        for job in &report.jobs {
            output.push_str(&self.format_job(job));
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Any serializable value, e.g. a parsed resume.
    pub fn format_value<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        self.format_value(report)
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "Job",
            "Rank",
            "Name",
            "Resume",
            "Score",
            "Skill Match",
            "Semantic Match",
            "Matching Skills Count",
            "Missing Skills Count",
        ])?;

        for job in &report.jobs {
            for entry in &job.entries {
                writer.write_record([
                    job.job_id.clone(),
                    entry.rank.to_string(),
                    entry.name.clone().unwrap_or_default(),
                    entry.resume_id.clone(),
                    format!("{:.2}", entry.final_score),
                    format!("{:.2}", entry.skill_match_score),
                    format!("{:.2}", entry.semantic_score),
                    entry.matching_skills.len().to_string(),
                    entry.missing_skills.len().to_string(),
                ])?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ResumeRankerError::OutputFormatting(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ResumeRankerError::OutputFormatting(format!("CSV output is not UTF-8: {}", e)))
    }
}

impl HtmlFormatter {
    fn create_template_data(&self, report: &RankingReport) -> HtmlTemplate {
        let jobs = report
            .jobs
            .iter()
            .map(|job| HtmlJob {
                job_id: job.job_id.clone(),
                job_skills: if job.job_skills.is_empty() {
                    "none detected".to_string()
                } else {
                    join(&job.job_skills)
                },
                entries: job
                    .entries
                    .iter()
                    .map(|entry| HtmlEntry {
                        rank: entry.rank,
                        name: entry.display_name().to_string(),
                        resume_id: entry.resume_id.clone(),
                        email: entry.email.clone().unwrap_or_default(),
                        final_score: format!("{:.1}", entry.final_score),
                        skill_score: format!("{:.1}", entry.skill_match_score),
                        semantic_score: format!("{:.1}", entry.semantic_score),
                        matching_skills: entry.matching_skills.iter().cloned().collect(),
                        missing_skills: entry.missing_skills.iter().cloned().collect(),
                        highlighted: entry.rank <= HTML_HIGHLIGHTED,
                    })
                    .collect(),
            })
            .collect();

        HtmlTemplate {
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            preset: report.metadata.preset.to_string(),
            resume_count: report.metadata.resume_count,
            version: report.metadata.ranker_version.clone(),
            jobs,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeRankerError::OutputFormatting(e.to_string()))
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool, top_n: usize) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, top_n),
            json_formatter: JsonFormatter::new(true),
            csv_formatter: CsvFormatter,
            html_formatter: HtmlFormatter,
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Csv => &self.csv_formatter,
            OutputFormat::Html => &self.html_formatter,
        };
        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(true, 5)
    }
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("ranking{}.txt", timestamp_suffix),
        OutputFormat::Json => format!("ranking{}.json", timestamp_suffix),
        OutputFormat::Csv => format!("ranking{}.csv", timestamp_suffix),
        OutputFormat::Html => format!("ranking{}.html", timestamp_suffix),
    }
}
