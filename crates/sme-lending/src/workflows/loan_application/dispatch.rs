use serde::{Deserialize, Serialize};

use super::domain::WorkflowAction;

/// Action selected by a user, as submitted from the review screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: WorkflowAction,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ActionRequest {
    pub fn new(action: WorkflowAction) -> Self {
        Self {
            action,
            reason: None,
        }
    }

    pub fn with_reason(action: WorkflowAction, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: Some(reason.into()),
        }
    }

    /// Check the request is complete enough to hand to the workflow.
    ///
    /// Approvals and rejections need a non-blank reason. Reasons on other actions are kept as
    /// free-text notes, trimmed, and dropped when blank.
    pub fn validate(self) -> Result<ValidatedAction, DispatchError> {
        let reason = self
            .reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty());

        if self.action.requires_reason() && reason.is_none() {
            return Err(DispatchError::ReasonRequired(self.action));
        }

        Ok(ValidatedAction {
            action: self.action,
            reason,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAction {
    pub action: WorkflowAction,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("a reason is required to {0}")]
    ReasonRequired(WorkflowAction),
}
