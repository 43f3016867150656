//! Snapshot fingerprinting for caller-side memoization.
//!
//! The engine keeps no incremental state. Callers that cache engine results
//! key them by this fingerprint: any change to a field of the people, surveys
//! or responses, or to the stage, yields a different hash. Derived fields
//! (`level`, `children`) are not input and are not hashed.

use orgchart_types::OrgSnapshot;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::survey::SurveyStage;

/// Content-addressed fingerprint of one render-pass input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotFingerprint {
    /// SHA-256 of the snapshot, hex encoded.
    pub hash: String,
}

impl SnapshotFingerprint {
    pub fn compute(snapshot: &OrgSnapshot, stage: Option<SurveyStage>) -> Self {
        let mut hasher = Sha256::new();

        hasher.update((snapshot.people.len() as u64).to_le_bytes());
        for person in &snapshot.people {
            field(&mut hasher, &person.id);
            field(&mut hasher, &person.name);
            optional(&mut hasher, person.position.as_deref());
            optional(&mut hasher, person.manager_id.as_deref());
            optional(&mut hasher, person.email.as_deref());
            optional(&mut hasher, person.external_user_id.as_deref());
        }

        hasher.update((snapshot.surveys.len() as u64).to_le_bytes());
        for survey in &snapshot.surveys {
            field(&mut hasher, &survey.id);
            field(&mut hasher, &survey.name);
            optional(&mut hasher, survey.url.as_deref());
            optional(&mut hasher, survey.description.as_deref());
            optional(&mut hasher, survey.project_id.as_deref());
        }

        hasher.update((snapshot.responses.len() as u64).to_le_bytes());
        for response in &snapshot.responses {
            field(&mut hasher, &response.response_id);
            field(&mut hasher, &response.survey_id);
            field(&mut hasher, &response.person_id);
            optional(&mut hasher, response.response_url.as_deref());
            let date = response.response_date.map(|d| d.to_rfc3339());
            optional(&mut hasher, date.as_deref());
        }

        hasher.update([stage.map_or(0, |s| s.number())]);

        Self {
            hash: hex::encode(hasher.finalize()),
        }
    }

    /// First 16 hex chars, for logs.
    pub fn short(&self) -> &str {
        &self.hash[..16.min(self.hash.len())]
    }
}

// Length-prefixed so adjacent fields cannot run together.
fn field(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            field(hasher, v);
        }
        None => hasher.update([0u8]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use orgchart_types::{Person, SurveyResponse};

    fn snapshot() -> OrgSnapshot {
        OrgSnapshot {
            people: vec![
                Person::new("1", "CEO"),
                Person::new("2", "Mgr").with_manager("1"),
            ],
            surveys: vec![orgchart_types::Survey::new("s1", "Stage 1")],
            responses: vec![],
        }
    }

    #[test]
    fn deterministic() {
        let a = SnapshotFingerprint::compute(&snapshot(), None);
        let b = SnapshotFingerprint::compute(&snapshot(), None);
        assert_eq!(a, b);
        assert_eq!(a.hash.len(), 64);
        assert_eq!(a.short().len(), 16);
    }

    #[test]
    fn changes_with_responses_and_stage() {
        let base = SnapshotFingerprint::compute(&snapshot(), None);

        let mut answered = snapshot();
        answered.responses.push(SurveyResponse::new("r1", "s1", "2"));
        assert_ne!(base, SnapshotFingerprint::compute(&answered, None));

        assert_ne!(base, SnapshotFingerprint::compute(&snapshot(), Some(SurveyStage::Two)));
    }

    #[test]
    fn changes_with_survey_and_response_metadata() {
        let mut answered = snapshot();
        answered.responses.push(SurveyResponse::new("r1", "s1", "2"));
        let base = SnapshotFingerprint::compute(&answered, None);

        let mut dated = answered.clone();
        dated.responses[0].response_date =
            Some(Utc.with_ymd_and_hms(2026, 3, 2, 9, 15, 0).unwrap());
        assert_ne!(base, SnapshotFingerprint::compute(&dated, None));

        let mut linked = answered.clone();
        linked.surveys[0].url = Some("https://forms.example/s1".into());
        assert_ne!(base, SnapshotFingerprint::compute(&linked, None));

        let mut described = answered.clone();
        described.surveys[0].description = Some("Annual review".into());
        assert_ne!(base, SnapshotFingerprint::compute(&described, None));

        let mut moved = answered;
        moved.surveys[0].project_id = Some("proj-7".into());
        assert_ne!(base, SnapshotFingerprint::compute(&moved, None));
    }

    #[test]
    fn field_boundaries_matter() {
        let mut a = snapshot();
        a.people = vec![Person::new("12", "3")];
        let mut b = snapshot();
        b.people = vec![Person::new("1", "23")];
        assert_ne!(
            SnapshotFingerprint::compute(&a, None),
            SnapshotFingerprint::compute(&b, None)
        );
    }
}
