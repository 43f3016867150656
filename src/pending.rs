//! Notification counts for the survey panel.
//!
//! A pending task is a direct report the viewer could currently edit a
//! survey for. The count is a filter over [`AccessPolicy::decide`], so it
//! cannot disagree with the buttons shown on the chart.

use std::collections::BTreeMap;

use orgchart_types::{Person, Survey};

use crate::access::{warn_if_prerequisite_missing, AccessPolicy, AccessRequest};
use crate::hierarchy::SubordinateIndex;
use crate::scope::UserContext;
use crate::survey::{SurveyRecords, SurveyStage};

/// Survey id → number of direct reports awaiting the viewer's input.
pub type PendingMap = BTreeMap<String, usize>;

pub fn count_pending(
    policy: &AccessPolicy,
    survey: &Survey,
    ctx: &UserContext,
    people: &[Person],
    records: SurveyRecords<'_>,
) -> usize {
    let index = SubordinateIndex::new(people);
    count_with_index(policy, survey, ctx, &index, records)
}

/// Pending counts for every survey in `records`.
pub fn pending_by_survey(
    policy: &AccessPolicy,
    ctx: &UserContext,
    people: &[Person],
    records: SurveyRecords<'_>,
) -> PendingMap {
    let index = SubordinateIndex::new(people);
    records
        .surveys
        .iter()
        .map(|survey| {
            let count = count_with_index(policy, survey, ctx, &index, records);
            (survey.id.clone(), count)
        })
        .collect()
}

fn count_with_index(
    policy: &AccessPolicy,
    survey: &Survey,
    ctx: &UserContext,
    index: &SubordinateIndex<'_>,
    records: SurveyRecords<'_>,
) -> usize {
    let stage = SurveyStage::detect(&survey.name);

    warn_if_prerequisite_missing(stage, &survey.id, records);

    let count = ctx
        .direct_subordinate_ids
        .iter()
        .filter_map(|id| index.person(id))
        .filter(|report| {
            let answered = records.is_answered(&report.id, &survey.id);
            let request = AccessRequest::new(stage, &report.id)
                .with_email(report.email.as_deref())
                .with_existing_response(answered);
            !answered && policy.can_edit_survey(&request, ctx, records)
        })
        .count();

    tracing::debug!(
        survey_id = %survey.id,
        viewer = ?ctx.resolved_person_id,
        count,
        "pending tasks counted"
    );
    count
}
