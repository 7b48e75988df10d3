//! Survey submission types.
//!
//! `SurveySubmission` is the wire shape: every field optional so that
//! presence can be checked explicitly. `SurveyRecord` is what gets
//! inserted into the store, built only from a valid submission.

use serde::{Deserialize, Serialize};

/// Incoming form payload. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveySubmission {
    pub country: Option<String>,
    pub satisfaction_level: Option<String>,
    pub strengths: Option<String>,
    pub improvement_recommendations: Option<String>,
    pub faced_challenges: Option<bool>,
    pub main_challenge: Option<String>,
    pub support_assessment: Option<String>,
    pub manager_discussion_quality: Option<String>,
}

/// One row of the `survey_responses` table.
///
/// Primary key and timestamps are owned by the store; this is only the
/// submitted data plus the derived client address. `main_challenge`
/// serializes as an explicit `null` when absent, so the column is
/// always written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyRecord {
    pub country: String,
    pub satisfaction_level: String,
    pub strengths: String,
    pub improvement_recommendations: String,
    pub faced_challenges: bool,
    pub main_challenge: Option<String>,
    pub support_assessment: String,
    pub manager_discussion_quality: String,
    pub ip_address: String,
}

impl SurveyRecord {
    /// Validate a submission and build the stored record.
    ///
    /// Required fields must be present and non-empty; `faced_challenges`
    /// only has to be present, since `false` is a legitimate answer.
    /// `main_challenge` is kept only when `faced_challenges` is true,
    /// regardless of what was supplied. Returns `None` if any required
    /// field is missing.
    pub fn from_submission(submission: SurveySubmission, ip_address: String) -> Option<Self> {
        let country = required(submission.country)?;
        let satisfaction_level = required(submission.satisfaction_level)?;
        let strengths = required(submission.strengths)?;
        let improvement_recommendations = required(submission.improvement_recommendations)?;
        let support_assessment = required(submission.support_assessment)?;
        let manager_discussion_quality = required(submission.manager_discussion_quality)?;
        let faced_challenges = submission.faced_challenges?;

        let main_challenge = if faced_challenges {
            submission.main_challenge
        } else {
            None
        };

        Some(SurveyRecord {
            country,
            satisfaction_level,
            strengths,
            improvement_recommendations,
            faced_challenges,
            main_challenge,
            support_assessment,
            manager_discussion_quality,
            ip_address,
        })
    }
}

/// Present and non-empty, mirroring the form's truthiness check.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_submission() -> SurveySubmission {
        SurveySubmission {
            country: Some("Kenya".to_string()),
            satisfaction_level: Some("satisfied".to_string()),
            strengths: Some("field visits".to_string()),
            improvement_recommendations: Some("more training".to_string()),
            faced_challenges: Some(true),
            main_challenge: Some("connectivity".to_string()),
            support_assessment: Some("good".to_string()),
            manager_discussion_quality: Some("excellent".to_string()),
        }
    }

    #[test]
    fn valid_submission_builds_record() {
        let record =
            SurveyRecord::from_submission(full_submission(), "203.0.113.5".to_string()).unwrap();

        assert_eq!(record.country, "Kenya");
        assert!(record.faced_challenges);
        assert_eq!(record.main_challenge.as_deref(), Some("connectivity"));
        assert_eq!(record.ip_address, "203.0.113.5");
    }

    #[test]
    fn main_challenge_dropped_when_no_challenges_faced() {
        let mut submission = full_submission();
        submission.faced_challenges = Some(false);
        submission.main_challenge = Some("should be discarded".to_string());

        let record =
            SurveyRecord::from_submission(submission, "unknown".to_string()).unwrap();
        assert!(!record.faced_challenges);
        assert_eq!(record.main_challenge, None);
    }

    #[test]
    fn main_challenge_not_required() {
        let mut submission = full_submission();
        submission.main_challenge = None;

        let record = SurveyRecord::from_submission(submission, "unknown".to_string()).unwrap();
        assert_eq!(record.main_challenge, None);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut submission = full_submission();
        submission.strengths = None;
        assert!(SurveyRecord::from_submission(submission, "unknown".to_string()).is_none());

        let mut submission = full_submission();
        submission.faced_challenges = None;
        assert!(SurveyRecord::from_submission(submission, "unknown".to_string()).is_none());
    }

    #[test]
    fn empty_string_fails_required_check() {
        let mut submission = full_submission();
        submission.country = Some(String::new());
        assert!(SurveyRecord::from_submission(submission, "unknown".to_string()).is_none());
    }

    #[test]
    fn faced_challenges_false_passes_presence_check() {
        let mut submission = full_submission();
        submission.faced_challenges = Some(false);
        assert!(SurveyRecord::from_submission(submission, "unknown".to_string()).is_some());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "country": "Peru",
            "satisfaction_level": "neutral",
            "strengths": "logistics",
            "improvement_recommendations": "none",
            "faced_challenges": false,
            "support_assessment": "fair",
            "manager_discussion_quality": "good",
            "honeypot": "bot-filler",
            "submitted_from": "landing-page"
        }"#;

        let submission: SurveySubmission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.country.as_deref(), Some("Peru"));
        assert_eq!(submission.faced_challenges, Some(false));
    }

    #[test]
    fn record_serializes_null_main_challenge() {
        let mut submission = full_submission();
        submission.faced_challenges = Some(false);

        let record = SurveyRecord::from_submission(submission, "unknown".to_string()).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["main_challenge"], serde_json::Value::Null);
        assert_eq!(json["faced_challenges"], serde_json::Value::Bool(false));
    }
}
