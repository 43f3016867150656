//! Viewer scope: who the signed-in user is and which part of the chart they see.
//!
//! Resolution order for an external identity token:
//! 1. exact match on `ag_userid`
//! 2. normalized (GUID-tolerant) match on `ag_userid`
//! 3. the token taken as an internal person id
//!
//! An unresolved viewer is a normal outcome: a warning is logged and the
//! scope is empty.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use orgchart_types::Person;
use serde::{Deserialize, Serialize};

use crate::hierarchy::{assemble, SubordinateIndex, MAX_TREE_LEVEL};
use crate::identity::IdentityNormalizer;

/// How far below the viewer the "my team" view reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamDepth {
    /// Viewer plus direct reports only.
    #[default]
    #[serde(rename = "direct", alias = "direct_reports")]
    DirectReports,
    /// Viewer plus every transitive report.
    #[serde(rename = "full", alias = "full_subtree")]
    FullSubtree,
}

impl TeamDepth {
    /// Deepest level below the viewer that is included, `None` for unbounded.
    pub fn max_levels(&self) -> Option<u32> {
        match self {
            TeamDepth::DirectReports => Some(1),
            TeamDepth::FullSubtree => None,
        }
    }
}

impl FromStr for TeamDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" | "direct_reports" | "1" => Ok(TeamDepth::DirectReports),
            "full" | "full_subtree" | "all" | "recursive" => Ok(TeamDepth::FullSubtree),
            other => Err(format!("unknown team depth '{}' (expected direct or full)", other)),
        }
    }
}

impl fmt::Display for TeamDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamDepth::DirectReports => write!(f, "direct"),
            TeamDepth::FullSubtree => write!(f, "full"),
        }
    }
}

/// Which rule matched the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Normalized,
    InternalId,
}

#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub person: &'a Person,
    pub matched_by: MatchKind,
}

/// The viewer's position in the hierarchy for one render cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserContext {
    pub external_user_id: String,
    pub resolved_person_id: Option<String>,
    pub direct_subordinate_ids: BTreeSet<String>,
    pub all_subordinate_ids: BTreeSet<String>,
}

impl UserContext {
    /// Context for a viewer that matched nobody.
    pub fn unresolved(external_user_id: impl Into<String>) -> Self {
        Self {
            external_user_id: external_user_id.into(),
            ..Self::default()
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_person_id.is_some()
    }

    pub fn is_self(&self, person_id: &str) -> bool {
        self.resolved_person_id.as_deref() == Some(person_id)
    }

    pub fn is_direct_subordinate(&self, person_id: &str) -> bool {
        self.direct_subordinate_ids.contains(person_id)
    }

    pub fn is_any_subordinate(&self, person_id: &str) -> bool {
        self.all_subordinate_ids.contains(person_id)
    }
}

/// Host-side filter switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyFilter {
    pub current_user_id: Option<String>,
    /// `None` falls back to the configured default.
    pub show_only_team: Option<bool>,
}

impl HierarchyFilter {
    pub fn for_viewer(current_user_id: impl Into<String>) -> Self {
        Self {
            current_user_id: Some(current_user_id.into()),
            show_only_team: None,
        }
    }

    pub fn full_hierarchy() -> Self {
        Self::default()
    }

    pub fn with_show_only_team(mut self, enabled: bool) -> Self {
        self.show_only_team = Some(enabled);
        self
    }
}

pub struct ScopeResolver<'a> {
    people: &'a [Person],
    index: SubordinateIndex<'a>,
    normalizer: &'a IdentityNormalizer,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(people: &'a [Person], normalizer: &'a IdentityNormalizer) -> Self {
        Self {
            people,
            index: SubordinateIndex::new(people),
            normalizer,
        }
    }

    pub fn index(&self) -> &SubordinateIndex<'a> {
        &self.index
    }

    pub fn resolve(&self, external_user_id: &str) -> Option<Resolution<'a>> {
        let resolution = self.find(external_user_id);
        match &resolution {
            Some(r) => tracing::debug!(
                external_user_id,
                person_id = %r.person.id,
                matched_by = ?r.matched_by,
                "viewer resolved"
            ),
            None => tracing::warn!(external_user_id, "viewer not found in person list"),
        }
        resolution
    }

    fn find(&self, external_user_id: &str) -> Option<Resolution<'a>> {
        if external_user_id.trim().is_empty() {
            return None;
        }

        if let Some(person) = self
            .people
            .iter()
            .find(|p| p.external_user_id.as_deref() == Some(external_user_id))
        {
            return Some(Resolution {
                person,
                matched_by: MatchKind::Exact,
            });
        }

        let wanted = self.normalizer.normalize(external_user_id);
        if !wanted.is_empty() {
            let normalized = self.people.iter().find(|p| {
                p.external_user_id
                    .as_deref()
                    .is_some_and(|token| self.normalizer.normalize(token) == wanted)
            });
            if let Some(person) = normalized {
                return Some(Resolution {
                    person,
                    matched_by: MatchKind::Normalized,
                });
            }
        }

        self.index.person(external_user_id).map(|person| Resolution {
            person,
            matched_by: MatchKind::InternalId,
        })
    }

    /// Viewer context with direct and transitive subordinate sets.
    pub fn user_context(&self, external_user_id: &str) -> UserContext {
        match self.resolve(external_user_id) {
            Some(resolution) => {
                let id = resolution.person.id.as_str();
                UserContext {
                    external_user_id: external_user_id.to_string(),
                    resolved_person_id: Some(id.to_string()),
                    direct_subordinate_ids: self.index.direct_report_ids(id),
                    all_subordinate_ids: self.index.all_subordinates_of(id),
                }
            }
            None => UserContext::unresolved(external_user_id),
        }
    }

    /// Single-root forest: `person` at level 0 with reports down to `depth`,
    /// never deeper than [`MAX_TREE_LEVEL`].
    pub fn filter_to_team(&self, person: &Person, depth: TeamDepth) -> Vec<Person> {
        let limit = depth.max_levels().unwrap_or(MAX_TREE_LEVEL).min(MAX_TREE_LEVEL);
        let mut visited: HashSet<&str> = HashSet::from([person.id.as_str()]);
        let mut truncated = false;

        let mut root = person.detached();
        root.level = 0;
        let root = assemble(
            person.id.as_str(),
            root,
            |id, level| {
                let mut node = self.index.person(id)?.detached();
                node.level = level;
                Some(node)
            },
            |id, level| {
                let reports = self.index.direct_reports_of(id);
                if level >= limit {
                    truncated |= !reports.is_empty() && depth.max_levels().is_none();
                    return Vec::new();
                }
                reports
                    .iter()
                    .copied()
                    .filter(|&report| visited.insert(report))
                    .collect()
            },
        );

        if truncated {
            tracing::warn!(
                person_id = %person.id,
                max_level = MAX_TREE_LEVEL,
                "team view cut at maximum tree depth"
            );
        }
        vec![root]
    }

    /// Resolve the viewer and build their team view; empty when unresolved.
    pub fn team_view(&self, external_user_id: &str, depth: TeamDepth) -> Vec<Person> {
        match self.resolve(external_user_id) {
            Some(resolution) => self.filter_to_team(resolution.person, depth),
            None => Vec::new(),
        }
    }

    /// The forest to lay out: team view when filtering applies, otherwise
    /// `full_forest` unchanged.
    pub fn view(
        &self,
        full_forest: &[Person],
        filter: &HierarchyFilter,
        team_view_default: bool,
        depth: TeamDepth,
    ) -> Vec<Person> {
        let show_only_team = filter.show_only_team.unwrap_or(team_view_default);
        match filter.current_user_id.as_deref() {
            Some(viewer) if show_only_team => self.team_view(viewer, depth),
            _ => full_forest.to_vec(),
        }
    }
}
