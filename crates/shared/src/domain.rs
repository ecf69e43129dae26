use serde::{Deserialize, Serialize};

/// The employee's unique key is the email address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeIdentity {
    pub email: String,
    pub role: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextRole {
    pub role: String,
    pub fit: f64,
    #[serde(rename = "missing_skills_example", default)]
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpskillingItem {
    pub skill: String,
    pub function_area: String,
    pub specialization: String,
    pub suggested_learning: String,
}

/// Generated growth plan for one employee. Immutable once fetched; a refetch
/// replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeePlan {
    pub employee: EmployeeIdentity,
    #[serde(rename = "leadership_potential_index")]
    pub leadership_index: f64,
    #[serde(default)]
    pub next_roles: Vec<NextRole>,
    #[serde(default)]
    pub upskilling_plan: Vec<UpskillingItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorMatch {
    pub email: String,
    pub role: String,
    pub department: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseResult {
    pub title: String,
    pub provider: String,
    pub description: String,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadershipEntry {
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(rename = "leadership_potential_index")]
    pub leadership_index: f64,
    #[serde(default)]
    pub next_roles: Vec<String>,
}
