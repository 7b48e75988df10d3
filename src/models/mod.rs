//! Data models for the survey server.

pub mod submission;

pub use submission::{SurveyRecord, SurveySubmission};
