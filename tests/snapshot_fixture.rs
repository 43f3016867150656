//! End-to-end checks against a host-shaped JSON snapshot and YAML config.
//!
//! Run with: cargo test --test snapshot_fixture

use std::io::Write;

use chrono::{TimeZone, Utc};
use orgchart::survey::find_response_for_person;
use orgchart::{
    AccessLevel, EngineConfig, HierarchyFilter, HierarchyIssue, MatchKind, OrgChartEngine,
    OrgSnapshot, SnapshotFingerprint, TeamDepth,
};
use pretty_assertions::assert_eq;

const FIXTURE: &str = include_str!("fixtures/org_snapshot.json");
const MANAGER_TOKEN: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

fn load() -> OrgSnapshot {
    OrgSnapshot::from_json(FIXTURE).expect("fixture parses")
}

fn engine() -> OrgChartEngine {
    OrgChartEngine::new(EngineConfig::default().with_blue_collar_domain("co.com"))
        .expect("valid config")
}

#[test]
fn host_field_names_deserialize() {
    let snap = load();
    assert_eq!(snap.people.len(), 9);
    assert_eq!(snap.people[1].manager_id.as_deref(), Some("100"));
    assert_eq!(
        snap.people[1].external_user_id.as_deref(),
        Some("{0F8FAD5B-D9CB-469F-A165-70867728950E}")
    );
    assert_eq!(snap.surveys[0].url.as_deref(), Some("https://forms.example/s1"));
    assert_eq!(snap.surveys[1].project_id.as_deref(), Some("proj-7"));
    assert_eq!(
        snap.responses[0].response_date,
        Some(Utc.with_ymd_and_hms(2026, 3, 2, 9, 15, 0).unwrap())
    );
    assert!(snap.responses[2].response_date.is_none());
    assert_eq!(
        find_response_for_person(&snap.responses, "111", "srv-1").map(|r| r.response_id.as_str()),
        Some("resp-1")
    );
}

#[test]
fn forest_and_data_quality_report() {
    let snap = load();
    let engine = engine();
    let h = engine.build(&snap.people);

    let roots: Vec<_> = h.forest.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(roots, vec!["100", "200"]);
    assert_eq!(h.stats.orphans, 1);
    assert_eq!(h.stats.max_depth, 3);

    let report = engine.validate(&snap.people);
    assert!(report.is_valid());
    assert!(report.has_cycles());
    assert!(report.warnings.contains(&HierarchyIssue::UnknownManager {
        person_id: "200".into(),
        manager_id: "999".into(),
    }));
    assert!(report.warnings.contains(&HierarchyIssue::CycleDetected {
        path: vec!["300".into(), "301".into(), "300".into()],
    }));
}

#[test]
fn manager_resolves_by_normalized_token() {
    let snap = load();
    let engine = engine();
    let resolution = engine
        .scope(&snap.people)
        .resolve(MANAGER_TOKEN)
        .expect("manager resolves");
    assert_eq!(resolution.person.id, "110");
    assert_eq!(resolution.matched_by, MatchKind::Normalized);

    let ctx = engine.user_context(&snap.people, MANAGER_TOKEN);
    let direct: Vec<_> = ctx.direct_subordinate_ids.iter().map(String::as_str).collect();
    let all: Vec<_> = ctx.all_subordinate_ids.iter().map(String::as_str).collect();
    assert_eq!(direct, vec!["111", "112"]);
    assert_eq!(all, vec!["111", "112", "113"]);
}

#[test]
fn pending_badges_for_manager() {
    let snap = load();
    let engine = engine();
    let ctx = engine.user_context(&snap.people, MANAGER_TOKEN);
    let pending = engine.pending_by_survey(&ctx, &snap);

    let counts: Vec<_> = pending.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(counts, vec![("srv-1", 0), ("srv-2", 1), ("srv-3", 1)]);
}

#[test]
fn indirect_operator_is_hidden_until_answered() {
    let snap = load();
    let engine = engine();
    let ctx = engine.user_context(&snap.people, MANAGER_TOKEN);
    let operator = snap.people.iter().find(|p| p.id == "113").unwrap();

    let result = engine.decide_for(&snap, &ctx, &snap.surveys[0], operator);
    assert_eq!(result.access_level, AccessLevel::None);
    assert!(!result.is_chain_blocked);
}

#[test]
fn team_view_depth_from_yaml_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "team_view:\n  enabled: true\n  depth: full\nblue_collar_domain: co.com\nidentity_cache_capacity: 32"
    )
    .unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.team_view.depth, TeamDepth::FullSubtree);
    assert_eq!(config.identity_cache_capacity, 32);

    let snap = load();
    let engine = OrgChartEngine::new(config).unwrap();
    let view = engine.view(&snap.people, &HierarchyFilter::for_viewer(MANAGER_TOKEN));
    let operator = &view.visible[0].children[0];
    assert_eq!(operator.id, "111");
    assert_eq!(operator.children[0].id, "113");
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(dir.path().join("absent.yaml")).unwrap_err();
    assert_eq!(err.code(), "IO");
}

#[test]
fn fingerprint_tracks_snapshot_changes() {
    let snap = load();
    let a = SnapshotFingerprint::compute(&snap, None);
    assert_eq!(a, SnapshotFingerprint::compute(&load(), None));

    let mut fewer = load();
    fewer.responses.pop();
    assert_ne!(a, SnapshotFingerprint::compute(&fewer, None));
}
