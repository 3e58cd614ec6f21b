//! Skill-overlap and lexical-similarity scoring, and candidate ranking

use crate::error::ResumeRankerError;
use crate::processing::parser::{JobRequirement, ResumeRecord};
use crate::processing::text_processor::TextProcessor;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Named weightings of the skill-match and semantic components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringPreset {
    /// Half skill overlap, half similarity of the full texts.
    #[default]
    Holistic,
    /// Skill overlap dominates; similarity compares the skill lists only.
    SkillQuota,
}

/// Which texts the semantic component compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticSource {
    FullText,
    SkillList,
}

impl ScoringPreset {
    /// `(skill_weight, semantic_weight)`, summing to 1.
    pub fn weights(&self) -> (f64, f64) {
        match self {
            ScoringPreset::Holistic => (0.5, 0.5),
            ScoringPreset::SkillQuota => (0.7, 0.3),
        }
    }

    pub fn semantic_source(&self) -> SemanticSource {
        match self {
            ScoringPreset::Holistic => SemanticSource::FullText,
            ScoringPreset::SkillQuota => SemanticSource::SkillList,
        }
    }
}

impl fmt::Display for ScoringPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringPreset::Holistic => write!(f, "holistic"),
            ScoringPreset::SkillQuota => write!(f, "skill-quota"),
        }
    }
}

impl FromStr for ScoringPreset {
    type Err = ResumeRankerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "holistic" => Ok(ScoringPreset::Holistic),
            "skill-quota" | "skill_quota" | "quota" => Ok(ScoringPreset::SkillQuota),
            other => Err(ResumeRankerError::InvalidInput(format!(
                "Unknown scoring preset '{}'. Expected holistic or skill-quota",
                other
            ))),
        }
    }
}

/// A parsed resume and the identifier it is reported under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub record: ResumeRecord,
}

/// A parsed job description and the identifier it is reported under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub requirement: JobRequirement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub resume_id: String,
    pub skill_match_score: f64,
    pub semantic_score: f64,
    pub final_score: f64,
    pub matching_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub rank: usize,
}

/// Ranking of every candidate against one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRanking {
    pub job_id: String,
    pub job_skills: BTreeSet<String>,
    pub candidates: Vec<RankedCandidate>,
}

/// Percentage of job skills present in the resume; 0 when the job lists none.
pub fn skill_match_score(resume_skills: &BTreeSet<String>, job_skills: &BTreeSet<String>) -> f64 {
    let job = lowercase_set(job_skills);
    if job.is_empty() {
        return 0.0;
    }
    let resume = lowercase_set(resume_skills);
    let matched = job.intersection(&resume).count();
    matched as f64 / job.len() as f64 * 100.0
}

/// Term-frequency cosine similarity as a percentage. Empty or stop-word-only
/// input on either side scores 0.
pub fn semantic_score(processor: &TextProcessor, resume_text: &str, job_text: &str) -> f64 {
    let resume = processor.term_frequencies(resume_text);
    let job = processor.term_frequencies(job_text);
    if resume.is_empty() || job.is_empty() {
        return 0.0;
    }

    // Integer accumulation keeps the result independent of map iteration order.
    let dot: usize = resume
        .iter()
        .filter_map(|(term, count)| job.get(term).map(|other| count * other))
        .sum();
    let norm = |freq: &HashMap<String, usize>| (freq.values().map(|c| c * c).sum::<usize>() as f64).sqrt();
    let denominator = norm(&resume) * norm(&job);
    if denominator == 0.0 {
        return 0.0;
    }

    let similarity = dot as f64 / denominator * 100.0;
    if similarity.is_finite() {
        similarity.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn lowercase_set(skills: &BTreeSet<String>) -> BTreeSet<String> {
    skills.iter().map(|s| s.to_lowercase()).collect()
}

fn skill_list_text(skills: &BTreeSet<String>) -> String {
    skills.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

pub struct RankingEngine {
    processor: Arc<TextProcessor>,
    preset: ScoringPreset,
}

impl RankingEngine {
    pub fn new(processor: Arc<TextProcessor>, preset: ScoringPreset) -> Self {
        Self { processor, preset }
    }

    pub fn preset(&self) -> ScoringPreset {
        self.preset
    }

    /// Rank every candidate against one job. Sorted by final score, highest
    /// first; equal scores keep input order. Ranks run 1..=N without gaps.
    pub fn rank_candidates(&self, candidates: &[Candidate], job: &JobRequirement) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .map(|candidate| self.score(candidate, job))
            .collect();

        ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        for (idx, candidate) in ranked.iter_mut().enumerate() {
            candidate.rank = idx + 1;
        }

        debug!("Ranked {} candidates with {} preset", ranked.len(), self.preset);
        ranked
    }

    /// Rank all candidates independently for each job, in job order.
    pub fn rank_jobs(&self, candidates: &[Candidate], jobs: &[JobPosting]) -> Vec<JobRanking> {
        info!(
            "Ranking {} resumes against {} job descriptions",
            candidates.len(),
            jobs.len()
        );

        jobs.iter()
            .map(|job| JobRanking {
                job_id: job.id.clone(),
                job_skills: job.requirement.skills.clone(),
                candidates: self.rank_candidates(candidates, &job.requirement),
            })
            .collect()
    }

    fn score(&self, candidate: &Candidate, job: &JobRequirement) -> RankedCandidate {
        let record = &candidate.record;
        let resume_skills = lowercase_set(&record.skills);
        let job_skills = lowercase_set(&job.skills);

        let skill_match = skill_match_score(&resume_skills, &job_skills);
        let semantic = match self.preset.semantic_source() {
            SemanticSource::FullText => semantic_score(&self.processor, &record.full_text, &job.full_text),
            SemanticSource::SkillList => semantic_score(
                &self.processor,
                &skill_list_text(&resume_skills),
                &skill_list_text(&job_skills),
            ),
        };

        let (skill_weight, semantic_weight) = self.preset.weights();
        let final_score = skill_weight * skill_match + semantic_weight * semantic;

        RankedCandidate {
            resume_id: candidate.id.clone(),
            skill_match_score: skill_match,
            semantic_score: semantic,
            final_score,
            matching_skills: job_skills.intersection(&resume_skills).cloned().collect(),
            missing_skills: job_skills.difference(&resume_skills).cloned().collect(),
            rank: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn candidate(id: &str, skill_list: &[&str], text: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            record: ResumeRecord {
                skills: skills(skill_list),
                full_text: text.to_string(),
                ..ResumeRecord::default()
            },
        }
    }

    fn engine(preset: ScoringPreset) -> RankingEngine {
        RankingEngine::new(Arc::new(TextProcessor::new()), preset)
    }

    #[test]
    fn test_skill_match_score() {
        let job = skills(&["python", "sql", "java"]);
        let score = skill_match_score(&skills(&["python", "sql"]), &job);
        assert!((score - 66.67).abs() < 0.01);

        assert_eq!(skill_match_score(&skills(&["Python", "SQL", "Java", "go"]), &job), 100.0);
        assert_eq!(skill_match_score(&skills(&["python"]), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_semantic_score_bounds() {
        let processor = TextProcessor::new();
        let same = semantic_score(&processor, "rust backend services", "rust backend services");
        assert!((same - 100.0).abs() < 1e-9);

        assert_eq!(semantic_score(&processor, "rust backend", "marketing budget"), 0.0);
        assert_eq!(semantic_score(&processor, "", "rust"), 0.0);
        assert_eq!(semantic_score(&processor, "the and of", "rust"), 0.0);
    }

    #[test]
    fn test_empty_job_text_falls_back_to_skill_order() {
        let job = JobRequirement {
            skills: skills(&["python", "sql"]),
            full_text: String::new(),
        };
        let candidates = vec![
            candidate("a", &["python"], "python developer"),
            candidate("b", &["python", "sql"], "python and sql"),
            candidate("c", &[], "gardener"),
        ];

        let ranked = engine(ScoringPreset::Holistic).rank_candidates(&candidates, &job);
        let order: Vec<&str> = ranked.iter().map(|r| r.resume_id.as_str()).collect();

        assert_eq!(order, vec!["b", "a", "c"]);
        assert!(ranked.iter().all(|r| r.semantic_score == 0.0));
        assert_eq!(ranked[0].final_score, 50.0);
        assert_eq!(ranked[1].missing_skills, skills(&["sql"]));
        assert_eq!(ranked[1].matching_skills, skills(&["python"]));
    }

    #[test]
    fn test_ties_keep_input_order_and_ranks_are_dense() {
        let job = JobRequirement {
            skills: skills(&["rust"]),
            full_text: "rust engineer".to_string(),
        };
        let candidates = vec![
            candidate("first", &["rust"], "rust engineer"),
            candidate("second", &["rust"], "rust engineer"),
            candidate("third", &[], ""),
            candidate("fourth", &["rust"], "rust engineer"),
        ];

        let engine = engine(ScoringPreset::Holistic);
        let ranked = engine.rank_candidates(&candidates, &job);
        let order: Vec<&str> = ranked.iter().map(|r| r.resume_id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "fourth", "third"]);
        assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        assert_eq!(engine.rank_candidates(&candidates, &job), ranked);
    }

    #[test]
    fn test_input_order_does_not_change_scores() {
        let job = JobRequirement {
            skills: skills(&["rust", "sql", "docker"]),
            full_text: "rust services on docker with sql storage".to_string(),
        };
        let candidates = vec![
            candidate("a", &["rust"], "rust cli tools"),
            candidate("b", &["sql", "docker"], "docker deployments and sql tuning"),
            candidate("c", &[], "watercolour painting"),
            candidate("d", &["rust", "sql", "docker"], "rust services with sql on docker"),
        ];
        let reversed: Vec<Candidate> = candidates.iter().rev().cloned().collect();

        for preset in [ScoringPreset::Holistic, ScoringPreset::SkillQuota] {
            let engine = engine(preset);
            let forward = engine.rank_candidates(&candidates, &job);
            let backward = engine.rank_candidates(&reversed, &job);

            for ranked in &forward {
                let twin = backward.iter().find(|r| r.resume_id == ranked.resume_id).unwrap();
                assert_eq!(twin.skill_match_score, ranked.skill_match_score);
                assert_eq!(twin.semantic_score, ranked.semantic_score);
                assert_eq!(twin.final_score, ranked.final_score);
            }
        }
    }

    #[test]
    fn test_skill_quota_preset_uses_skill_lists() {
        let job = JobRequirement {
            skills: skills(&["python", "sql"]),
            full_text: "completely different words".to_string(),
        };
        let candidates = vec![candidate("a", &["python", "sql"], "nothing shared")];

        let ranked = engine(ScoringPreset::SkillQuota).rank_candidates(&candidates, &job);
        assert_eq!(ranked[0].skill_match_score, 100.0);
        assert!((ranked[0].semantic_score - 100.0).abs() < 1e-9);
        assert!((ranked[0].final_score - 100.0).abs() < 1e-9);

        let holistic = engine(ScoringPreset::Holistic).rank_candidates(&candidates, &job);
        assert_eq!(holistic[0].final_score, 50.0);
    }

    #[test]
    fn test_rank_jobs_restarts_ranks() {
        let candidates = vec![
            candidate("py", &["python"], "python"),
            candidate("rs", &["rust"], "rust"),
        ];
        let jobs = vec![
            JobPosting {
                id: "rust-job".to_string(),
                requirement: JobRequirement { skills: skills(&["rust"]), full_text: "rust".to_string() },
            },
            JobPosting {
                id: "python-job".to_string(),
                requirement: JobRequirement { skills: skills(&["python"]), full_text: "python".to_string() },
            },
        ];

        let rankings = engine(ScoringPreset::Holistic).rank_jobs(&candidates, &jobs);
        assert_eq!(rankings.len(), 2);
        assert_eq!(rankings[0].candidates[0].resume_id, "rs");
        assert_eq!(rankings[1].candidates[0].resume_id, "py");
        assert!(rankings.iter().all(|r| r.candidates[0].rank == 1));
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("holistic".parse::<ScoringPreset>().unwrap(), ScoringPreset::Holistic);
        assert_eq!("Skill-Quota".parse::<ScoringPreset>().unwrap(), ScoringPreset::SkillQuota);
        assert!("fancy".parse::<ScoringPreset>().is_err());
        assert_eq!(ScoringPreset::SkillQuota.to_string(), "skill-quota");
    }
}
