//! Lookups over the response and survey record sets.

use orgchart_types::{Survey, SurveyResponse};

use super::stage::SurveyStage;

/// Borrowed view of the survey-side records of one snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurveyRecords<'a> {
    pub surveys: &'a [Survey],
    pub responses: &'a [SurveyResponse],
}

impl<'a> SurveyRecords<'a> {
    pub fn new(surveys: &'a [Survey], responses: &'a [SurveyResponse]) -> Self {
        Self { surveys, responses }
    }

    /// First survey whose name carries the marker for `stage`.
    pub fn survey_for_stage(&self, stage: SurveyStage) -> Option<&'a Survey> {
        self.surveys
            .iter()
            .find(|s| SurveyStage::detect(&s.name) == Some(stage))
    }

    pub fn has_response(&self, person_id: &str, survey_id: &str) -> bool {
        has_response(self.responses, person_id, survey_id)
    }

    /// The response shown on the person's card, if it has content.
    pub fn response_for(&self, person_id: &str, survey_id: &str) -> Option<&'a SurveyResponse> {
        find_response_for_person(self.responses, person_id, survey_id)
    }

    /// Whether the card counts as answered: a matching response with content.
    pub fn is_answered(&self, person_id: &str, survey_id: &str) -> bool {
        self.response_for(person_id, survey_id).is_some()
    }

    pub fn first_survey(&self) -> Option<&'a Survey> {
        first_survey(self.surveys)
    }
}

/// Any matching record counts, placeholders included; duplicates are not
/// collapsed. Stage completion is judged this way.
pub fn has_response(responses: &[SurveyResponse], person_id: &str, survey_id: &str) -> bool {
    responses.iter().any(|r| r.matches(person_id, survey_id))
}

pub fn responses_for_survey<'a>(
    responses: &'a [SurveyResponse],
    survey_id: &str,
) -> Vec<&'a SurveyResponse> {
    responses.iter().filter(|r| r.survey_id == survey_id).collect()
}

/// The response shown on a person's card: first record with usable content.
pub fn find_response_for_person<'a>(
    responses: &'a [SurveyResponse],
    person_id: &str,
    survey_id: &str,
) -> Option<&'a SurveyResponse> {
    responses
        .iter()
        .find(|r| r.matches(person_id, survey_id) && r.has_content())
}

/// Default selection when the host has not picked a survey yet.
pub fn first_survey(surveys: &[Survey]) -> Option<&Survey> {
    surveys.first()
}
