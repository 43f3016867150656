//! Exhaustive coverage of the access decision table.
//!
//! Every combination of stage, relation, worker class, existing response and
//! prerequisite completion is decided and checked against exactly one row of
//! the table below.

use std::collections::BTreeSet;

use orgchart::{
    AccessLevel, AccessPolicy, AccessRequest, Relation, Survey, SurveyRecords, SurveyResponse,
    SurveyStage, UserContext, WorkerClass,
};

use AccessLevel::{Edit, None as NoAccess, View};
use Relation::{Direct, Indirect, SelfNode, Unrelated};
use Stages::{One, TwoOrThree};
use WorkerClass::{BlueCollar, WhiteCollar};

/// Stage selector of a table row.
#[derive(Debug, Clone, Copy)]
enum Stages {
    One,
    TwoOrThree,
}

#[derive(Debug)]
struct Row {
    stages: Stages,
    relation: Relation,
    worker: Option<WorkerClass>,
    prerequisite_done: Option<bool>,
    answered: Option<bool>,
    level: AccessLevel,
    chain_blocked: bool,
}

const fn row(
    stages: Stages,
    relation: Relation,
    worker: Option<WorkerClass>,
    prerequisite_done: Option<bool>,
    answered: Option<bool>,
    level: AccessLevel,
    chain_blocked: bool,
) -> Row {
    Row {
        stages,
        relation,
        worker,
        prerequisite_done,
        answered,
        level,
        chain_blocked,
    }
}

const TABLE: &[Row] = &[
    row(One, SelfNode, None, None, Some(true), View, false),
    row(One, SelfNode, None, None, Some(false), Edit, false),
    row(One, Direct, Some(BlueCollar), None, Some(true), View, false),
    row(One, Direct, Some(BlueCollar), None, Some(false), Edit, false),
    row(One, Direct, Some(WhiteCollar), None, Some(true), View, false),
    row(One, Direct, Some(WhiteCollar), None, Some(false), NoAccess, true),
    row(One, Indirect, None, None, Some(true), View, false),
    row(One, Indirect, None, None, Some(false), NoAccess, false),
    row(One, Unrelated, None, None, None, NoAccess, false),
    row(TwoOrThree, SelfNode, None, None, Some(true), View, false),
    row(TwoOrThree, SelfNode, None, None, Some(false), NoAccess, false),
    row(TwoOrThree, Direct, None, Some(false), None, NoAccess, true),
    row(TwoOrThree, Direct, None, Some(true), Some(true), View, false),
    row(TwoOrThree, Direct, None, Some(true), Some(false), Edit, false),
    row(TwoOrThree, Indirect, None, None, Some(true), View, false),
    row(TwoOrThree, Indirect, None, None, Some(false), NoAccess, false),
    row(TwoOrThree, Unrelated, None, None, None, NoAccess, false),
];

impl Row {
    fn matches(
        &self,
        stage: SurveyStage,
        relation: Relation,
        worker: WorkerClass,
        prerequisite_done: bool,
        answered: bool,
    ) -> bool {
        let stage_ok = match self.stages {
            Stages::One => stage == SurveyStage::One,
            Stages::TwoOrThree => stage != SurveyStage::One,
        };
        stage_ok
            && self.relation == relation
            && self.worker.is_none_or(|w| w == worker)
            && self.prerequisite_done.is_none_or(|p| p == prerequisite_done)
            && self.answered.is_none_or(|a| a == answered)
    }
}

fn viewer() -> UserContext {
    UserContext {
        external_user_id: "viewer-token".into(),
        resolved_person_id: Some("viewer".into()),
        direct_subordinate_ids: BTreeSet::from(["direct".to_string()]),
        all_subordinate_ids: BTreeSet::from(["direct".to_string(), "indirect".to_string()]),
    }
}

fn target_id(relation: Relation) -> &'static str {
    match relation {
        SelfNode => "viewer",
        Direct => "direct",
        Indirect => "indirect",
        Unrelated => "stranger",
    }
}

fn email(worker: WorkerClass) -> &'static str {
    match worker {
        BlueCollar => "100200@co.com",
        WhiteCollar => "dana.scully@co.com",
    }
}

fn surveys() -> Vec<Survey> {
    vec![
        Survey::new("s1", "Stage 1"),
        Survey::new("s2", "Stage 2"),
        Survey::new("s3", "Stage 3"),
    ]
}

#[test]
fn every_combination_matches_exactly_one_row() {
    let policy = AccessPolicy::for_domain("co.com").unwrap();
    let ctx = viewer();
    let surveys = surveys();
    let mut decided = 0;

    for stage in SurveyStage::ALL {
        for relation in Relation::ALL {
            for worker in [BlueCollar, WhiteCollar] {
                for prerequisite_done in [false, true] {
                    for answered in [false, true] {
                        let target = target_id(relation);
                        let responses: Vec<SurveyResponse> = match stage.prerequisite() {
                            Some(pre) if prerequisite_done => vec![SurveyResponse::new(
                                "pre",
                                format!("s{}", pre.number()),
                                target,
                            )],
                            _ => vec![],
                        };
                        let request = AccessRequest::new(Some(stage), target)
                            .with_email(Some(email(worker)))
                            .with_existing_response(answered);
                        let result =
                            policy.decide(&request, &ctx, SurveyRecords::new(&surveys, &responses));

                        let rows: Vec<&Row> = TABLE
                            .iter()
                            .filter(|r| {
                                r.matches(stage, relation, worker, prerequisite_done, answered)
                            })
                            .collect();
                        let case = format!(
                            "{stage} {relation:?} {worker:?} prerequisite={prerequisite_done} answered={answered}"
                        );
                        assert_eq!(rows.len(), 1, "{case}: table rows {rows:?}");
                        assert_eq!(result.access_level, rows[0].level, "{case}");
                        assert_eq!(result.is_chain_blocked, rows[0].chain_blocked, "{case}");
                        assert_eq!(
                            result.disabled_reason.is_some(),
                            rows[0].chain_blocked,
                            "{case}"
                        );
                        decided += 1;
                    }
                }
            }
        }
    }

    assert_eq!(decided, 3 * 4 * 2 * 2 * 2);
}

#[test]
fn unmarked_survey_follows_stage_one_rows() {
    let policy = AccessPolicy::for_domain("co.com").unwrap();
    let ctx = viewer();

    for relation in Relation::ALL {
        for answered in [false, true] {
            let target = target_id(relation);
            let unmarked = AccessRequest::new(None, target)
                .with_email(Some(email(BlueCollar)))
                .with_existing_response(answered);
            let explicit = AccessRequest {
                stage: Some(SurveyStage::One),
                ..unmarked
            };
            assert_eq!(
                policy.decide(&unmarked, &ctx, SurveyRecords::default()),
                policy.decide(&explicit, &ctx, SurveyRecords::default()),
            );
        }
    }
}

#[test]
fn decisions_are_deterministic() {
    let policy = AccessPolicy::for_domain("co.com").unwrap();
    let ctx = viewer();
    let surveys = surveys();
    let responses = vec![SurveyResponse::new("r", "s1", "direct")];
    let request = AccessRequest::new(Some(SurveyStage::Two), "direct");
    let records = SurveyRecords::new(&surveys, &responses);

    let first = policy.decide(&request, &ctx, records);
    for _ in 0..10 {
        assert_eq!(policy.decide(&request, &ctx, records), first);
    }
}
