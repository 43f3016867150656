//! Shared record types for the org chart engine.
//!
//! This crate is the SINGLE SOURCE OF TRUTH for records crossing the host boundary.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐  records   ┌──────────────────┐  verdicts   ┌──────────────────┐
//! │  Host adapter    │ ─────────► │  orgchart engine │ ──────────► │  Layout / cards  │
//! │  (datasets)      │            │  (pure)          │             │  (rendering)     │
//! └──────────────────┘            └──────────────────┘             └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. Field names on the wire are the host dataset column names (`managerId`,
//!    `ag_userid`, `msfp_surveyid`, ...), Rust names are snake_case
//! 2. Optional host columns are `Option<T>`; engine-computed fields default
//! 3. Records are plain immutable snapshots; nothing here mutates itself

pub mod access;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use access::*;

// ============================================================================
// PEOPLE
// ============================================================================

/// One employee record, optionally carrying the subtree built for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Reference to the manager's `id`; unresolvable values make this person a root.
    #[serde(
        rename = "managerId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// External identity token (GUID-like) of the signed-in host user.
    #[serde(rename = "ag_userid", default, skip_serializing_if = "Option::is_none")]
    pub external_user_id: Option<String>,
    /// Depth in the forest (root = 0). Computed, never read from input.
    #[serde(default)]
    pub level: u32,
    /// Direct reports, populated only by the hierarchy builder.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Person>,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: None,
            manager_id: None,
            email: None,
            external_user_id: None,
            level: 0,
            children: Vec::new(),
        }
    }

    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_external_user_id(mut self, token: impl Into<String>) -> Self {
        self.external_user_id = Some(token.into());
        self
    }

    /// Copy of this record without any attached subtree.
    pub fn detached(&self) -> Self {
        Self {
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Manager reference, treating empty strings as absent.
    pub fn manager_ref(&self) -> Option<&str> {
        self.manager_id.as_deref().filter(|m| !m.is_empty())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

// ============================================================================
// SURVEYS
// ============================================================================

/// A survey definition. The stage marker lives inside `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    #[serde(rename = "msfp_surveyid")]
    pub id: String,
    #[serde(rename = "msfp_name")]
    pub name: String,
    #[serde(
        rename = "msfp_surveyurl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(
        rename = "msfp_description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        rename = "msfp_projectid",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<String>,
}

impl Survey {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
            description: None,
            project_id: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A submitted response for one respondent/target person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    #[serde(rename = "responseId")]
    pub response_id: String,
    #[serde(rename = "survey_id")]
    pub survey_id: String,
    #[serde(rename = "personId")]
    pub person_id: String,
    #[serde(
        rename = "responseUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_url: Option<String>,
    #[serde(
        rename = "responseDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_date: Option<DateTime<Utc>>,
}

impl SurveyResponse {
    pub fn new(
        response_id: impl Into<String>,
        survey_id: impl Into<String>,
        person_id: impl Into<String>,
    ) -> Self {
        Self {
            response_id: response_id.into(),
            survey_id: survey_id.into(),
            person_id: person_id.into(),
            response_url: None,
            response_date: None,
        }
    }

    /// A response is usable when it carries an id, or failing that a URL.
    pub fn has_content(&self) -> bool {
        !self.response_id.is_empty()
            || self
                .response_url
                .as_deref()
                .is_some_and(|url| !url.is_empty())
    }

    pub fn matches(&self, person_id: &str, survey_id: &str) -> bool {
        self.person_id == person_id && self.survey_id == survey_id
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// The three record sets of one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgSnapshot {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub surveys: Vec<Survey>,
    #[serde(default)]
    pub responses: Vec<SurveyResponse>,
}

impl OrgSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_reads_host_column_names() {
        let json = r#"{
            "id": "p1",
            "name": "Jane",
            "managerId": "m1",
            "ag_userid": "{ABC-123}",
            "email": "jane@co.com"
        }"#;
        let person: Person = serde_json::from_str(json).unwrap();
        assert_eq!(person.manager_id.as_deref(), Some("m1"));
        assert_eq!(person.external_user_id.as_deref(), Some("{ABC-123}"));
        assert_eq!(person.level, 0);
        assert!(person.children.is_empty());
    }

    #[test]
    fn empty_manager_is_absent() {
        let person = Person::new("p1", "Jane").with_manager("");
        assert_eq!(person.manager_ref(), None);
    }

    #[test]
    fn survey_reads_msfp_columns() {
        let json = r#"{"msfp_surveyid": "s1", "msfp_name": "Etap 2 - ocena"}"#;
        let survey: Survey = serde_json::from_str(json).unwrap();
        assert_eq!(survey.id, "s1");
        assert_eq!(survey.name, "Etap 2 - ocena");
        assert!(survey.url.is_none());
    }

    #[test]
    fn response_content_requires_id_or_url() {
        let mut response = SurveyResponse::new("", "s1", "p1");
        assert!(!response.has_content());
        response.response_url = Some("https://forms/r/1".into());
        assert!(response.has_content());
    }

    #[test]
    fn response_date_is_rfc3339() {
        let json = r#"{
            "responseId": "r1",
            "survey_id": "s1",
            "personId": "p1",
            "responseDate": "2026-03-01T10:00:00Z"
        }"#;
        let response: SurveyResponse = serde_json::from_str(json).unwrap();
        assert!(response.response_date.is_some());
        assert!(response.matches("p1", "s1"));
    }

    #[test]
    fn snapshot_defaults_missing_sets() {
        let snapshot = OrgSnapshot::from_json(r#"{"people": []}"#).unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.surveys.is_empty());
    }
}
