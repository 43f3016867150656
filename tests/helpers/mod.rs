//! Shared fixtures for the integration tests.
//!
//! The reference chart:
//!
//! ```text
//! CEO (1)
//! └── Mgr (2)                 token {0F8FAD5B-D9CB-469F-A165-70867728950E}
//!     ├── Worker (3)          12345@co.com   blue collar
//!     │   └── Apprentice (5)
//!     └── Employee (4)        jane@co.com    white collar
//! ```

#![allow(dead_code)]

use orgchart::{
    EngineConfig, OrgChartEngine, OrgSnapshot, Person, Survey, SurveyResponse, UserContext,
};

pub const MGR_TOKEN: &str = "{0F8FAD5B-D9CB-469F-A165-70867728950E}";

/// Scenario A person list.
pub fn scenario_people() -> Vec<Person> {
    vec![
        Person::new("1", "CEO"),
        Person::new("2", "Mgr")
            .with_manager("1")
            .with_external_user_id(MGR_TOKEN),
        Person::new("3", "Worker")
            .with_manager("2")
            .with_email("12345@co.com"),
        Person::new("4", "Employee")
            .with_manager("2")
            .with_email("jane@co.com"),
    ]
}

/// Scenario A plus an indirect report under Worker.
pub fn people_with_apprentice() -> Vec<Person> {
    let mut people = scenario_people();
    people.push(Person::new("5", "Apprentice").with_manager("3"));
    people
}

pub fn stage_surveys() -> Vec<Survey> {
    vec![
        Survey::new("s1", "Annual review - Stage 1"),
        Survey::new("s2", "Annual review - Etap 2"),
        Survey::new("s3", "Annual review - Stage 3"),
    ]
}

pub fn snapshot(responses: Vec<SurveyResponse>) -> OrgSnapshot {
    OrgSnapshot {
        people: people_with_apprentice(),
        surveys: stage_surveys(),
        responses,
    }
}

pub fn engine() -> OrgChartEngine {
    OrgChartEngine::new(EngineConfig::default().with_blue_collar_domain("co.com"))
        .expect("default config with co.com is valid")
}

pub fn mgr_context(engine: &OrgChartEngine, people: &[Person]) -> UserContext {
    engine.user_context(people, MGR_TOKEN)
}
