//! Access verdicts returned to the rendering layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the viewer may do with a survey response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// May fill in / edit the survey.
    Edit,
    /// May only open the submitted response.
    View,
    /// No affordance; the button is hidden.
    None,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Edit => "edit",
            AccessLevel::View => "view",
            AccessLevel::None => "none",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a verdict was reached. Serializes as a machine code, displays as tooltip text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum AccessReason {
    OwnResponseSubmitted,
    OwnSelfAssessmentOpen,
    BlueCollarSubmitted,
    BlueCollarOpen,
    SubordinateSubmitted,
    AwaitingSelfAssessment,
    IndirectSubmitted,
    IndirectRestricted,
    NoPermission,
    ManagerEvaluationSubmitted,
    ManagerEvaluationPending,
    AwaitingPrerequisite { prerequisite: u8, stage: u8 },
    EvaluationSubmitted,
    EvaluationOpen { stage: u8 },
    EvaluatedByDirectManager,
}

impl AccessReason {
    /// Stable machine-usable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OwnResponseSubmitted => "own_response_submitted",
            Self::OwnSelfAssessmentOpen => "own_self_assessment_open",
            Self::BlueCollarSubmitted => "blue_collar_submitted",
            Self::BlueCollarOpen => "blue_collar_open",
            Self::SubordinateSubmitted => "subordinate_submitted",
            Self::AwaitingSelfAssessment => "awaiting_self_assessment",
            Self::IndirectSubmitted => "indirect_submitted",
            Self::IndirectRestricted => "indirect_restricted",
            Self::NoPermission => "no_permission",
            Self::ManagerEvaluationSubmitted => "manager_evaluation_submitted",
            Self::ManagerEvaluationPending => "manager_evaluation_pending",
            Self::AwaitingPrerequisite { .. } => "awaiting_prerequisite",
            Self::EvaluationSubmitted => "evaluation_submitted",
            Self::EvaluationOpen { .. } => "evaluation_open",
            Self::EvaluatedByDirectManager => "evaluated_by_direct_manager",
        }
    }
}

impl fmt::Display for AccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnResponseSubmitted => write!(f, "You can review your own response"),
            Self::OwnSelfAssessmentOpen => write!(f, "Fill in your self-assessment"),
            Self::BlueCollarSubmitted => {
                write!(f, "Review the employee's completed self-assessment")
            }
            Self::BlueCollarOpen => write!(
                f,
                "Fill in the self-assessment on behalf of the employee (blue collar)"
            ),
            Self::SubordinateSubmitted => write!(f, "Review your subordinate's self-assessment"),
            Self::AwaitingSelfAssessment => write!(
                f,
                "Waiting for the employee to complete the self-assessment"
            ),
            Self::IndirectSubmitted => write!(f, "Review the response (indirect subordinate)"),
            Self::IndirectRestricted => write!(
                f,
                "No access to an indirect subordinate's self-assessment"
            ),
            Self::NoPermission => write!(f, "You have no permission for this survey"),
            Self::ManagerEvaluationSubmitted => write!(f, "Review your manager's evaluation"),
            Self::ManagerEvaluationPending => {
                write!(f, "Your manager has not completed the evaluation yet")
            }
            Self::AwaitingPrerequisite { prerequisite, .. } => {
                write!(f, "Waiting for stage {} to be completed", prerequisite)
            }
            Self::EvaluationSubmitted => write!(f, "Review your subordinate's evaluation"),
            Self::EvaluationOpen { stage } => {
                write!(f, "Fill in your subordinate's evaluation (stage {})", stage)
            }
            Self::EvaluatedByDirectManager => {
                write!(f, "The evaluation is completed by the direct manager")
            }
        }
    }
}

/// Verdict for one (viewer, target person, survey stage) query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResult {
    pub access_level: AccessLevel,
    pub reason: AccessReason,
    /// Set when an earlier stage (or the employee's own step) is still outstanding.
    #[serde(default)]
    pub is_chain_blocked: bool,
    /// Tooltip text for a disabled affordance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_reason: Option<String>,
}

impl AccessResult {
    pub fn edit(reason: AccessReason) -> Self {
        Self::with_level(AccessLevel::Edit, reason)
    }

    pub fn view(reason: AccessReason) -> Self {
        Self::with_level(AccessLevel::View, reason)
    }

    pub fn none(reason: AccessReason) -> Self {
        Self::with_level(AccessLevel::None, reason)
    }

    /// No access because a preceding step in the workflow is not done yet.
    pub fn chain_blocked(reason: AccessReason, disabled_reason: impl Into<String>) -> Self {
        Self {
            access_level: AccessLevel::None,
            reason,
            is_chain_blocked: true,
            disabled_reason: Some(disabled_reason.into()),
        }
    }

    fn with_level(access_level: AccessLevel, reason: AccessReason) -> Self {
        Self {
            access_level,
            reason,
            is_chain_blocked: false,
            disabled_reason: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.access_level != AccessLevel::None
    }

    pub fn is_editable(&self) -> bool {
        self.access_level == AccessLevel::Edit
    }

    /// Human-readable explanation.
    pub fn reason_text(&self) -> String {
        self.reason.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_level_wire_format() {
        assert_eq!(serde_json::to_string(&AccessLevel::Edit).unwrap(), "\"edit\"");
        assert_eq!(serde_json::to_string(&AccessLevel::None).unwrap(), "\"none\"");
    }

    #[test]
    fn result_uses_camel_case_fields() {
        let result = AccessResult::chain_blocked(
            AccessReason::AwaitingPrerequisite {
                prerequisite: 1,
                stage: 2,
            },
            "Stage 1 must be completed before stage 2",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["accessLevel"], "none");
        assert_eq!(json["isChainBlocked"], true);
        assert_eq!(json["reason"]["code"], "awaiting_prerequisite");
        assert_eq!(json["reason"]["prerequisite"], 1);
    }

    #[test]
    fn reason_code_matches_serde_tag() {
        let reason = AccessReason::EvaluationOpen { stage: 3 };
        let json = serde_json::to_value(reason).unwrap();
        assert_eq!(json["code"], reason.code());
        assert_eq!(
            reason.to_string(),
            "Fill in your subordinate's evaluation (stage 3)"
        );
    }

    #[test]
    fn visibility_helpers() {
        assert!(AccessResult::view(AccessReason::SubordinateSubmitted).is_visible());
        assert!(!AccessResult::view(AccessReason::SubordinateSubmitted).is_editable());
        assert!(AccessResult::edit(AccessReason::BlueCollarOpen).is_editable());
        assert!(!AccessResult::none(AccessReason::NoPermission).is_visible());
    }
}
