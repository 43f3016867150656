//! Engine facade.
//!
//! Owns the configuration, the identity normalizer and the access policy.
//! Build one per process and share it by reference; every call takes the
//! current snapshot and derives its answer from scratch.

use orgchart_types::{AccessResult, OrgSnapshot, Person, Survey};
use serde::Serialize;

use crate::access::{warn_if_prerequisite_missing, AccessPolicy, AccessRequest};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::hierarchy::{self, HierarchyBuilder, HierarchyValidation, OrgHierarchy};
use crate::identity::IdentityNormalizer;
use crate::pending::{self, PendingMap};
use crate::scope::{HierarchyFilter, ScopeResolver, UserContext};
use crate::survey::{SurveyRecords, SurveyStage};

/// Both forests a layout pass needs, plus the viewer context used for them.
#[derive(Debug, Clone, Serialize)]
pub struct OrgChartView {
    pub hierarchy: OrgHierarchy,
    /// The forest to lay out: team view or the full forest.
    pub visible: Vec<Person>,
    pub user: Option<UserContext>,
}

#[derive(Debug)]
pub struct OrgChartEngine {
    config: EngineConfig,
    normalizer: IdentityNormalizer,
    policy: AccessPolicy,
}

impl OrgChartEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let policy = AccessPolicy::for_domain(&config.blue_collar_domain)?;
        let normalizer = IdentityNormalizer::new(config.identity_cache_capacity);
        tracing::debug!(
            team_view = config.team_view.enabled,
            depth = %config.team_view.depth,
            domain = %config.blue_collar_domain,
            "org chart engine configured"
        );
        Ok(Self {
            config,
            normalizer,
            policy,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &IdentityNormalizer {
        &self.normalizer
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn build(&self, people: &[Person]) -> OrgHierarchy {
        HierarchyBuilder::build(people)
    }

    pub fn validate(&self, people: &[Person]) -> HierarchyValidation {
        hierarchy::validate(people)
    }

    pub fn scope<'a>(&'a self, people: &'a [Person]) -> ScopeResolver<'a> {
        ScopeResolver::new(people, &self.normalizer)
    }

    /// Full and filtered forests for one render pass.
    pub fn view(&self, people: &[Person], filter: &HierarchyFilter) -> OrgChartView {
        let hierarchy = self.build(people);
        let (visible, user) = {
            let scope = self.scope(&hierarchy.all_people);
            let visible = scope.view(
                &hierarchy.forest,
                filter,
                self.config.team_view.enabled,
                self.config.team_view.depth,
            );
            let user = filter
                .current_user_id
                .as_deref()
                .map(|viewer| scope.user_context(viewer));
            (visible, user)
        };

        OrgChartView {
            hierarchy,
            visible,
            user,
        }
    }

    pub fn user_context(&self, people: &[Person], external_user_id: &str) -> UserContext {
        self.scope(people).user_context(external_user_id)
    }

    pub fn decide(
        &self,
        request: &AccessRequest<'_>,
        ctx: &UserContext,
        records: SurveyRecords<'_>,
    ) -> AccessResult {
        self.policy.decide(request, ctx, records)
    }

    /// Decision for `target` on `survey`, deriving the stage and the existing
    /// response from the snapshot.
    pub fn decide_for(
        &self,
        snapshot: &OrgSnapshot,
        ctx: &UserContext,
        survey: &Survey,
        target: &Person,
    ) -> AccessResult {
        let records = records_of(snapshot);
        let stage = SurveyStage::detect(&survey.name);
        warn_if_prerequisite_missing(stage, &survey.id, records);

        let request = AccessRequest::new(stage, &target.id)
            .with_email(target.email.as_deref())
            .with_existing_response(records.is_answered(&target.id, &survey.id));
        self.policy.decide(&request, ctx, records)
    }

    pub fn count_pending(&self, survey: &Survey, ctx: &UserContext, snapshot: &OrgSnapshot) -> usize {
        pending::count_pending(
            &self.policy,
            survey,
            ctx,
            &snapshot.people,
            records_of(snapshot),
        )
    }

    pub fn pending_by_survey(&self, ctx: &UserContext, snapshot: &OrgSnapshot) -> PendingMap {
        pending::pending_by_survey(&self.policy, ctx, &snapshot.people, records_of(snapshot))
    }
}

fn records_of(snapshot: &OrgSnapshot) -> SurveyRecords<'_> {
    SurveyRecords::new(&snapshot.surveys, &snapshot.responses)
}
