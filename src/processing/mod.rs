//! Text processing, extraction and ranking

pub mod experience;
pub mod extractors;
pub mod parser;
pub mod ranking;
pub mod sections;
pub mod skill_matcher;
pub mod text_processor;
pub mod vocabulary;

pub use parser::{JobRequirement, ResumeParser, ResumeRecord};
pub use ranking::{Candidate, JobPosting, JobRanking, RankedCandidate, RankingEngine, ScoringPreset};
pub use vocabulary::SkillVocabulary;
