//! Survey access policy.
//!
//! [`AccessPolicy::decide`] maps one (viewer, target person, survey stage)
//! query to an [`AccessResult`]. It is a pure function of its inputs: no I/O,
//! no logging, no caching. Everything else that needs an access answer (the
//! button predicates, the pending-task counter) goes through it.
//!
//! ```text
//! stage 1 (self-assessment)
//!   self        response ? view : edit
//!   direct      response ? view : blue collar ? edit : none (chain blocked)
//!   indirect    response ? view : none
//!   unrelated   none
//!
//! stage 2 / 3 (manager evaluation)
//!   self        response ? view : none
//!   direct      prerequisite stage missing ? none (chain blocked)
//!                                          : response ? view : edit
//!   indirect    response ? view : none
//!   unrelated   none
//! ```

use orgchart_types::{AccessReason, AccessResult};
use serde::Serialize;

use crate::error::Result;
use crate::scope::UserContext;
use crate::survey::{BlueCollarRule, SurveyRecords, SurveyStage, WorkerClass};

const SELF_COMPLETION_REQUIRED: &str = "The employee must complete the self-assessment personally";

/// Viewer's relation to the target person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    #[serde(rename = "self")]
    SelfNode,
    Direct,
    Indirect,
    Unrelated,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Relation::SelfNode,
        Relation::Direct,
        Relation::Indirect,
        Relation::Unrelated,
    ];

    pub fn classify(ctx: &UserContext, target_person_id: &str) -> Self {
        if ctx.is_self(target_person_id) {
            Relation::SelfNode
        } else if ctx.is_direct_subordinate(target_person_id) {
            Relation::Direct
        } else if ctx.is_any_subordinate(target_person_id) {
            Relation::Indirect
        } else {
            Relation::Unrelated
        }
    }
}

/// One access query about a rendered person.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// Detected stage of the survey; `None` is handled as stage 1.
    pub stage: Option<SurveyStage>,
    pub target_person_id: &'a str,
    pub target_email: Option<&'a str>,
    /// Whether the target already has a response to this survey.
    pub has_existing_response: bool,
}

impl<'a> AccessRequest<'a> {
    pub fn new(stage: Option<SurveyStage>, target_person_id: &'a str) -> Self {
        Self {
            stage,
            target_person_id,
            target_email: None,
            has_existing_response: false,
        }
    }

    pub fn with_email(mut self, email: Option<&'a str>) -> Self {
        self.target_email = email;
        self
    }

    pub fn with_existing_response(mut self, has_existing_response: bool) -> Self {
        self.has_existing_response = has_existing_response;
        self
    }
}

/// Whether `person_id` has a response to the survey carrying `stage`'s
/// marker. No such survey means not completed.
pub fn is_stage_completed(stage: SurveyStage, person_id: &str, records: SurveyRecords<'_>) -> bool {
    records
        .survey_for_stage(stage)
        .is_some_and(|survey| records.has_response(person_id, &survey.id))
}

/// Warn when `stage` is gated on a stage no survey carries a marker for.
/// Such evaluations can never open.
pub(crate) fn warn_if_prerequisite_missing(
    stage: Option<SurveyStage>,
    survey_id: &str,
    records: SurveyRecords<'_>,
) {
    if let Some(prerequisite) = SurveyStage::effective(stage).prerequisite() {
        if records.survey_for_stage(prerequisite).is_none() {
            tracing::warn!(
                survey_id,
                prerequisite = prerequisite.number(),
                "no survey found for prerequisite stage; evaluations stay blocked"
            );
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    blue_collar: BlueCollarRule,
}

impl AccessPolicy {
    pub fn new(blue_collar: BlueCollarRule) -> Self {
        Self { blue_collar }
    }

    pub fn for_domain(blue_collar_domain: &str) -> Result<Self> {
        Ok(Self::new(BlueCollarRule::new(blue_collar_domain)?))
    }

    pub fn blue_collar_rule(&self) -> &BlueCollarRule {
        &self.blue_collar
    }

    pub fn decide(
        &self,
        request: &AccessRequest<'_>,
        ctx: &UserContext,
        records: SurveyRecords<'_>,
    ) -> AccessResult {
        let relation = Relation::classify(ctx, request.target_person_id);
        let stage = SurveyStage::effective(request.stage);
        let answered = request.has_existing_response;

        match stage.prerequisite() {
            None => {
                let worker = self.blue_collar.classify(request.target_email);
                decide_self_assessment(relation, worker, answered)
            }
            Some(prerequisite) => {
                let prerequisite_done = relation == Relation::Direct
                    && is_stage_completed(prerequisite, request.target_person_id, records);
                decide_evaluation(stage, prerequisite, relation, answered, prerequisite_done)
            }
        }
    }

    pub fn should_show_survey_button(
        &self,
        request: &AccessRequest<'_>,
        ctx: &UserContext,
        records: SurveyRecords<'_>,
    ) -> bool {
        self.decide(request, ctx, records).is_visible()
    }

    pub fn can_edit_survey(
        &self,
        request: &AccessRequest<'_>,
        ctx: &UserContext,
        records: SurveyRecords<'_>,
    ) -> bool {
        self.decide(request, ctx, records).is_editable()
    }
}

fn decide_self_assessment(relation: Relation, worker: WorkerClass, answered: bool) -> AccessResult {
    match (relation, answered) {
        (Relation::SelfNode, true) => AccessResult::view(AccessReason::OwnResponseSubmitted),
        (Relation::SelfNode, false) => AccessResult::edit(AccessReason::OwnSelfAssessmentOpen),
        (Relation::Direct, true) => match worker {
            WorkerClass::BlueCollar => AccessResult::view(AccessReason::BlueCollarSubmitted),
            WorkerClass::WhiteCollar => AccessResult::view(AccessReason::SubordinateSubmitted),
        },
        (Relation::Direct, false) => match worker {
            WorkerClass::BlueCollar => AccessResult::edit(AccessReason::BlueCollarOpen),
            WorkerClass::WhiteCollar => AccessResult::chain_blocked(
                AccessReason::AwaitingSelfAssessment,
                SELF_COMPLETION_REQUIRED,
            ),
        },
        (Relation::Indirect, true) => AccessResult::view(AccessReason::IndirectSubmitted),
        (Relation::Indirect, false) => AccessResult::none(AccessReason::IndirectRestricted),
        (Relation::Unrelated, _) => AccessResult::none(AccessReason::NoPermission),
    }
}

fn decide_evaluation(
    stage: SurveyStage,
    prerequisite: SurveyStage,
    relation: Relation,
    answered: bool,
    prerequisite_done: bool,
) -> AccessResult {
    match (relation, answered) {
        (Relation::SelfNode, true) => AccessResult::view(AccessReason::ManagerEvaluationSubmitted),
        (Relation::SelfNode, false) => AccessResult::none(AccessReason::ManagerEvaluationPending),
        (Relation::Direct, _) if !prerequisite_done => AccessResult::chain_blocked(
            AccessReason::AwaitingPrerequisite {
                prerequisite: prerequisite.number(),
                stage: stage.number(),
            },
            format!(
                "Stage {} must be completed before stage {}",
                prerequisite.number(),
                stage.number()
            ),
        ),
        (Relation::Direct, true) => AccessResult::view(AccessReason::EvaluationSubmitted),
        (Relation::Direct, false) => AccessResult::edit(AccessReason::EvaluationOpen {
            stage: stage.number(),
        }),
        (Relation::Indirect, true) => AccessResult::view(AccessReason::IndirectSubmitted),
        (Relation::Indirect, false) => AccessResult::none(AccessReason::EvaluatedByDirectManager),
        (Relation::Unrelated, _) => AccessResult::none(AccessReason::NoPermission),
    }
}
