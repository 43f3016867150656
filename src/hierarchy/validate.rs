//! Data-quality checks over a person list.
//!
//! Nothing here blocks hierarchy construction; callers log or display the
//! issues and carry on. Checks:
//! 1. Empty person ids
//! 2. Duplicate person ids
//! 3. Manager references that do not resolve (orphans)
//! 4. Manager cycles (including self-management)

use std::collections::{HashMap, HashSet};

use orgchart_types::Person;
use serde::Serialize;
use thiserror::Error;

/// A problem found in the raw person records.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum HierarchyIssue {
    #[error("Person '{name}' has an empty id")]
    EmptyId { name: String },

    #[error("Duplicate person id '{id}' ({count} records)")]
    DuplicateId { id: String, count: usize },

    /// Permitted: the person is shown as a root.
    #[error("Person '{person_id}' references unknown manager '{manager_id}'")]
    UnknownManager {
        person_id: String,
        manager_id: String,
    },

    #[error("Manager cycle detected: {}", format_cycle(path))]
    CycleDetected { path: Vec<String> },
}

fn format_cycle(path: &[String]) -> String {
    path.join(" -> ")
}

impl HierarchyIssue {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyId { .. } => "EMPTY_ID",
            Self::DuplicateId { .. } => "DUPLICATE_ID",
            Self::UnknownManager { .. } => "UNKNOWN_MANAGER",
            Self::CycleDetected { .. } => "CYCLE_DETECTED",
        }
    }

    /// Blocking issues make the chart misleading (people silently missing or
    /// merged); the rest are tolerated data variance.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::EmptyId { .. } | Self::DuplicateId { .. })
    }
}

/// Result of validating a person list.
#[derive(Debug, Default, Serialize)]
pub struct HierarchyValidation {
    pub errors: Vec<HierarchyIssue>,
    pub warnings: Vec<HierarchyIssue>,
}

impl HierarchyValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_cycles(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, HierarchyIssue::CycleDetected { .. }))
    }

    pub fn add(&mut self, issue: HierarchyIssue) {
        if issue.is_blocking() {
            self.errors.push(issue);
        } else {
            self.warnings.push(issue);
        }
    }

    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }
}

/// Validate a flat person list.
pub fn validate(people: &[Person]) -> HierarchyValidation {
    let mut result = HierarchyValidation::new();

    let manager_of = validate_ids(people, &mut result);
    validate_managers(people, &manager_of, &mut result);
    validate_no_cycles(people, &manager_of, &mut result);

    for issue in &result.warnings {
        if let HierarchyIssue::CycleDetected { .. } = issue {
            tracing::warn!(code = issue.code(), "{}", issue);
        }
    }

    result
}

fn validate_ids<'a>(
    people: &'a [Person],
    result: &mut HierarchyValidation,
) -> HashMap<&'a str, Option<&'a str>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut manager_of: HashMap<&str, Option<&str>> = HashMap::new();

    for person in people {
        if person.id.is_empty() {
            result.add(HierarchyIssue::EmptyId {
                name: person.name.clone(),
            });
            continue;
        }
        *counts.entry(person.id.as_str()).or_default() += 1;
        manager_of
            .entry(person.id.as_str())
            .or_insert_with(|| person.manager_ref());
    }

    let mut duplicates: Vec<_> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();
    for (id, count) in duplicates {
        result.add(HierarchyIssue::DuplicateId {
            id: id.to_string(),
            count,
        });
    }

    manager_of
}

fn validate_managers(
    people: &[Person],
    manager_of: &HashMap<&str, Option<&str>>,
    result: &mut HierarchyValidation,
) {
    for person in people {
        if let Some(manager) = person.manager_ref() {
            if !manager_of.contains_key(manager) {
                result.add(HierarchyIssue::UnknownManager {
                    person_id: person.id.clone(),
                    manager_id: manager.to_string(),
                });
            }
        }
    }
}

/// Each person has at most one manager, so following manager pointers from
/// every unvisited person finds every cycle exactly once.
fn validate_no_cycles(
    people: &[Person],
    manager_of: &HashMap<&str, Option<&str>>,
    result: &mut HierarchyValidation,
) {
    let mut done: HashSet<&str> = HashSet::new();

    for person in people {
        let start = person.id.as_str();
        if done.contains(start) || !manager_of.contains_key(start) {
            continue;
        }

        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut current = Some(start);

        while let Some(id) = current {
            if done.contains(id) {
                break;
            }
            if on_path.contains(id) {
                if let Some(pos) = path.iter().position(|p| *p == id) {
                    let mut cycle: Vec<String> =
                        path[pos..].iter().map(|s| s.to_string()).collect();
                    cycle.push(id.to_string());
                    result.add(HierarchyIssue::CycleDetected { path: cycle });
                }
                break;
            }
            path.push(id);
            on_path.insert(id);
            current = manager_of.get(id).copied().flatten();
        }

        done.extend(path);
    }
}
