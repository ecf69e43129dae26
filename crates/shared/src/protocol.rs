use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{CourseResult, EmployeePlan, LeadershipEntry, MentorMatch};

/// Full map of employee email to generated plan, as served by `GET /plans`.
/// BTreeMap keeps catalogue iteration order deterministic (ascending email).
pub type PlanCatalogue = BTreeMap<String, EmployeePlan>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorsResponse {
    pub email: String,
    pub mentors: Vec<MentorMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorRequestPayload {
    pub mentee_email: String,
    pub mentor_email: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MentorRequestAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
}

/// Sparse course search parameters; absent fields must not appear on the
/// wire at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSearchResponse {
    pub total: u64,
    #[serde(default)]
    pub items: Vec<CourseResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionPayload {
    pub sender_email: String,
    pub recipient_email: String,
    pub psa_value: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_copy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackPayload {
    pub email: String,
    pub focus_area: String,
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadershipResponse {
    #[serde(default)]
    pub items: Vec<LeadershipEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
