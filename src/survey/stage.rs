//! Survey stage detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::OrgChartError;

/// Position of a survey in the three-step review chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum SurveyStage {
    /// Self-assessment.
    One,
    /// First manager evaluation, gated on stage 1.
    Two,
    /// Second manager evaluation, gated on stage 2.
    Three,
}

// Matched against the lowercased survey name.
const MARKERS: [(SurveyStage, [&str; 2]); 3] = [
    (SurveyStage::One, ["stage 1", "etap 1"]),
    (SurveyStage::Two, ["stage 2", "etap 2"]),
    (SurveyStage::Three, ["stage 3", "etap 3"]),
];

impl SurveyStage {
    pub const ALL: [SurveyStage; 3] = [SurveyStage::One, SurveyStage::Two, SurveyStage::Three];

    /// Stage marker in a survey name, `None` when the name carries none.
    pub fn detect(survey_name: &str) -> Option<SurveyStage> {
        let lower = survey_name.to_lowercase();
        MARKERS
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
            .map(|(stage, _)| *stage)
    }

    /// Unmarked surveys are treated as stage 1.
    pub fn effective(stage: Option<SurveyStage>) -> SurveyStage {
        stage.unwrap_or(SurveyStage::One)
    }

    pub fn number(&self) -> u8 {
        match self {
            SurveyStage::One => 1,
            SurveyStage::Two => 2,
            SurveyStage::Three => 3,
        }
    }

    /// The stage that must be completed for the same person first.
    pub fn prerequisite(&self) -> Option<SurveyStage> {
        match self {
            SurveyStage::One => None,
            SurveyStage::Two => Some(SurveyStage::One),
            SurveyStage::Three => Some(SurveyStage::Two),
        }
    }
}

impl TryFrom<i64> for SurveyStage {
    type Error = OrgChartError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SurveyStage::One),
            2 => Ok(SurveyStage::Two),
            3 => Ok(SurveyStage::Three),
            other => Err(OrgChartError::UnknownStage(other)),
        }
    }
}

impl From<SurveyStage> for u8 {
    fn from(stage: SurveyStage) -> Self {
        stage.number()
    }
}

impl fmt::Display for SurveyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {}", self.number())
    }
}
