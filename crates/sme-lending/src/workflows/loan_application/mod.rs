//! Loan application status workflow.
//!
//! [`transitions`] holds the pure status → action table. The service layers request
//! validation, persistence, and applicant notifications on top of it, and the router exposes
//! both over HTTP.

pub mod dispatch;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod transitions;

#[cfg(test)]
mod tests;

pub use dispatch::{ActionRequest, DispatchError, ValidatedAction};
pub use domain::{
    LoanApplicationDraft, LoanApplicationId, LoanApplicationStatus, PipelineStatus,
    UnknownStatus, WorkflowAction, WorkflowEvent,
};
pub use repository::{
    LoanApplicationRecord, LoanApplicationRepository, LoanApplicationView, NotificationError,
    RepositoryError, WorkflowNotification, WorkflowNotifier,
};
pub use router::{loan_application_router, LoanApplicationRouterState};
pub use service::{LoanApplicationService, LoanApplicationServiceError};
pub use transitions::{
    actions_for_raw, apply, available_actions, describe, describe_actions, ActionDescriptor,
    Transition, TransitionError,
};
