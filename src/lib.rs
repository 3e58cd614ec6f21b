//! Resume ranker library
//!
//! Extracts structured fields from resume text and ranks resumes against job
//! descriptions by skill overlap and lexical similarity.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeRankerError};
