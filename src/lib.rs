//! Org chart hierarchy and staged survey access engine.
//!
//! Turns a flat list of employee records into a reporting forest, resolves
//! the signed-in viewer against it, and decides for every rendered person
//! whether the viewer may edit, view or not see that person's survey
//! response in a three-stage review chain.
//!
//! ## Architecture
//!
//! ```text
//! OrgSnapshot { people, surveys, responses }
//!      │
//!      ├─► HierarchyBuilder ──► forest / all_people ──► ScopeResolver ──► visible forest
//!      │                                                   │
//!      │                                                   └─► UserContext
//!      │                                                          │
//!      └─► SurveyRecords ───────────────────────────► AccessPolicy::decide ──► AccessResult
//!                                                                 │
//!                                                                 └─► pending counts
//! ```
//!
//! Everything is a synchronous function of the current snapshot. The only
//! state that outlives a call is the bounded identity normalization cache
//! owned by [`OrgChartEngine`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orgchart::{EngineConfig, HierarchyFilter, OrgChartEngine, OrgSnapshot};
//!
//! let snapshot = OrgSnapshot::from_json(r#"{"people": [{"id": "1", "name": "CEO"}]}"#)?;
//! let engine = OrgChartEngine::new(EngineConfig::default())?;
//! let view = engine.view(&snapshot.people, &HierarchyFilter::for_viewer("1"));
//! assert_eq!(view.visible[0].id, "1");
//! # Ok::<(), orgchart::OrgChartError>(())
//! ```

pub mod access;
pub mod config;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod hierarchy;
pub mod identity;
pub mod pending;
pub mod scope;
pub mod survey;

pub use orgchart_types::{
    AccessLevel, AccessReason, AccessResult, OrgSnapshot, Person, Survey, SurveyResponse,
};

pub use access::{is_stage_completed, AccessPolicy, AccessRequest, Relation};
pub use config::{EngineConfig, TeamViewConfig};
pub use engine::{OrgChartEngine, OrgChartView};
pub use error::{OrgChartError, Result};
pub use fingerprint::SnapshotFingerprint;
pub use hierarchy::{
    validate, HierarchyBuilder, HierarchyIssue, HierarchyStats, HierarchyValidation,
    OrgHierarchy, SubordinateIndex,
};
pub use identity::{canonicalize, is_valid_guid, IdentityNormalizer};
pub use pending::{count_pending, pending_by_survey, PendingMap};
pub use scope::{HierarchyFilter, MatchKind, Resolution, ScopeResolver, TeamDepth, UserContext};
pub use survey::{BlueCollarRule, SurveyRecords, SurveyStage, WorkerClass};
