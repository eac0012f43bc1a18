//! Transition table for the loan application workflow.
//!
//! The table is plain data: one row per status listing the actions offered in that status and
//! the status each action leads to. Terminal statuses carry an empty row.

use serde::Serialize;

use super::domain::{LoanApplicationStatus, WorkflowAction};

use LoanApplicationStatus as S;
use WorkflowAction as A;

/// One selectable action and the status it produces. `None` leaves the status unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: WorkflowAction,
    pub resulting_status: Option<LoanApplicationStatus>,
}

const fn to(action: WorkflowAction, status: LoanApplicationStatus) -> Transition {
    Transition {
        action,
        resulting_status: Some(status),
    }
}

const ADD_NOTE: Transition = Transition {
    action: A::AddNote,
    resulting_status: None,
};

/// Offered when the stored status does not parse into a known value.
pub const UNRECOGNIZED_STATUS_ACTIONS: &[Transition] = &[ADD_NOTE];

pub(crate) static TRANSITION_TABLE: [(LoanApplicationStatus, &[Transition]); 10] = [
    (S::Draft, &[to(A::Submit, S::Submitted)]),
    (
        S::Submitted,
        &[
            to(A::StartReview, S::UnderReview),
            to(A::RequestDocuments, S::Submitted),
        ],
    ),
    (
        S::UnderReview,
        &[
            to(A::Approve, S::Approved),
            to(A::Reject, S::Rejected),
            to(A::RequestDocuments, S::UnderReview),
        ],
    ),
    (S::Approved, &[to(A::SendOffer, S::OfferLetterSent)]),
    (S::OfferLetterSent, &[to(A::ResendOffer, S::OfferLetterSent)]),
    (S::OfferLetterSigned, &[to(A::Disburse, S::Disbursed)]),
    (
        S::OfferLetterDeclined,
        &[to(A::Approve, S::Approved), to(A::Reject, S::Rejected)],
    ),
    (S::Rejected, &[to(A::Resubmit, S::Submitted)]),
    (S::Disbursed, &[]),
    (S::Withdrawn, &[]),
];

/// Actions available for a status. Terminal statuses yield an empty slice.
pub fn available_actions(status: LoanApplicationStatus) -> &'static [Transition] {
    TRANSITION_TABLE
        .iter()
        .find(|(row_status, _)| *row_status == status)
        .map(|(_, transitions)| *transitions)
        .unwrap_or(&[])
}

/// Actions for a status as stored by the upstream API, which may hold values this build does
/// not know about. Those fall back to note-taking only.
pub fn actions_for_raw(raw: &str) -> &'static [Transition] {
    match raw.parse::<LoanApplicationStatus>() {
        Ok(status) => available_actions(status),
        Err(_) => UNRECOGNIZED_STATUS_ACTIONS,
    }
}

/// Resolve the outcome of `action` taken from `status`.
pub fn apply(
    status: LoanApplicationStatus,
    action: WorkflowAction,
) -> Result<Option<LoanApplicationStatus>, TransitionError> {
    available_actions(status)
        .iter()
        .find(|transition| transition.action == action)
        .map(|transition| transition.resulting_status)
        .ok_or(TransitionError::NotAvailable {
            from: status,
            action,
        })
}

/// Serializable action entry rendered next to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub resulting_status: Option<LoanApplicationStatus>,
}

impl From<&Transition> for ActionDescriptor {
    fn from(transition: &Transition) -> Self {
        Self {
            id: transition.action.id(),
            label: transition.action.label(),
            resulting_status: transition.resulting_status,
        }
    }
}

pub fn describe(transitions: &[Transition]) -> Vec<ActionDescriptor> {
    transitions.iter().map(ActionDescriptor::from).collect()
}

pub fn describe_actions(status: LoanApplicationStatus) -> Vec<ActionDescriptor> {
    describe(available_actions(status))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("action '{action}' is not available while the application is {from}")]
    NotAvailable {
        from: LoanApplicationStatus,
        action: WorkflowAction,
    },
}
