//! Report structures for ranking runs

use crate::processing::parser::ResumeRecord;
use crate::processing::ranking::{Candidate, JobRanking, RankedCandidate, ScoringPreset};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Everything produced by one `rank` run, ready for any formatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub metadata: ReportMetadata,
    pub jobs: Vec<JobReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub ranker_version: String,
    pub preset: ScoringPreset,
    pub resume_count: usize,
    pub job_count: usize,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: String,
    pub job_skills: BTreeSet<String>,
    pub entries: Vec<ReportEntry>,
}

/// One ranked candidate joined with the contact details of its resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub rank: usize,
    pub resume_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub education: BTreeSet<String>,
    pub final_score: f64,
    pub skill_match_score: f64,
    pub semantic_score: f64,
    pub matching_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
}

impl ReportEntry {
    fn new(ranked: &RankedCandidate, record: Option<&ResumeRecord>) -> Self {
        Self {
            rank: ranked.rank,
            resume_id: ranked.resume_id.clone(),
            name: record.and_then(|r| r.name.clone()),
            email: record.and_then(|r| r.email.clone()),
            phone: record.and_then(|r| r.phone.clone()),
            education: record.map(|r| r.education.clone()).unwrap_or_default(),
            final_score: ranked.final_score,
            skill_match_score: ranked.skill_match_score,
            semantic_score: ranked.semantic_score,
            matching_skills: ranked.matching_skills.clone(),
            missing_skills: ranked.missing_skills.clone(),
        }
    }

    /// Display name, falling back to the resume identifier.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.resume_id)
    }
}

impl RankingReport {
    pub fn new(
        rankings: &[JobRanking],
        candidates: &[Candidate],
        preset: ScoringPreset,
        processing_time_ms: u64,
    ) -> Self {
        let records: HashMap<&str, &ResumeRecord> = candidates
            .iter()
            .map(|c| (c.id.as_str(), &c.record))
            .collect();

        let jobs = rankings
            .iter()
            .map(|ranking| JobReport {
                job_id: ranking.job_id.clone(),
                job_skills: ranking.job_skills.clone(),
                entries: ranking
                    .candidates
                    .iter()
                    .map(|ranked| ReportEntry::new(ranked, records.get(ranked.resume_id.as_str()).copied()))
                    .collect(),
            })
            .collect();

        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                ranker_version: env!("CARGO_PKG_VERSION").to_string(),
                preset,
                resume_count: candidates.len(),
                job_count: rankings.len(),
                processing_time_ms,
            },
            jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_joins_contact_details() {
        let candidate = Candidate {
            id: "jane.txt".to_string(),
            record: ResumeRecord {
                name: Some("Jane Doe".to_string()),
                email: Some("jane@x.com".to_string()),
                ..ResumeRecord::default()
            },
        };
        let ranking = JobRanking {
            job_id: "job.txt".to_string(),
            job_skills: BTreeSet::new(),
            candidates: vec![
                RankedCandidate {
                    resume_id: "jane.txt".to_string(),
                    skill_match_score: 0.0,
                    semantic_score: 0.0,
                    final_score: 0.0,
                    matching_skills: BTreeSet::new(),
                    missing_skills: BTreeSet::new(),
                    rank: 1,
                },
                RankedCandidate {
                    resume_id: "ghost.txt".to_string(),
                    skill_match_score: 0.0,
                    semantic_score: 0.0,
                    final_score: 0.0,
                    matching_skills: BTreeSet::new(),
                    missing_skills: BTreeSet::new(),
                    rank: 2,
                },
            ],
        };

        let report = RankingReport::new(&[ranking], &[candidate], ScoringPreset::Holistic, 12);
        let entries = &report.jobs[0].entries;

        assert_eq!(report.metadata.job_count, 1);
        assert_eq!(entries[0].display_name(), "Jane Doe");
        assert_eq!(entries[0].email.as_deref(), Some("jane@x.com"));
        assert_eq!(entries[1].display_name(), "ghost.txt");
    }
}
