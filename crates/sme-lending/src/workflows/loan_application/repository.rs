use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{LoanApplicationId, LoanApplicationStatus, WorkflowAction, WorkflowEvent};
use super::transitions::{describe_actions, ActionDescriptor};

/// Snapshot of a loan application as held by the upstream lending API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplicationRecord {
    pub application_id: LoanApplicationId,
    pub entrepreneur_id: String,
    pub loan_product: String,
    pub requested_amount: u64,
    pub status: LoanApplicationStatus,
    #[serde(default)]
    pub history: Vec<WorkflowEvent>,
}

impl LoanApplicationRecord {
    pub fn last_event(&self) -> Option<&WorkflowEvent> {
        self.history.last()
    }

    /// Number of recorded actions; every dispatch appends exactly one event.
    pub fn revision(&self) -> usize {
        self.history.len()
    }

    pub fn view(&self) -> LoanApplicationView {
        LoanApplicationView {
            application_id: self.application_id.clone(),
            entrepreneur_id: self.entrepreneur_id.clone(),
            status: self.status,
            status_label: self.status.label(),
            available_actions: describe_actions(self.status),
            last_reason: self.last_event().and_then(|event| event.reason.clone()),
        }
    }
}

/// Storage abstraction over the upstream API so the service can be exercised in isolation.
pub trait LoanApplicationRepository: Send + Sync {
    fn insert(&self, record: LoanApplicationRecord)
        -> Result<LoanApplicationRecord, RepositoryError>;
    /// Replace the stored record only if its revision still equals `expected_revision`.
    fn update(
        &self,
        record: LoanApplicationRecord,
        expected_revision: usize,
    ) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        id: &LoanApplicationId,
    ) -> Result<Option<LoanApplicationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("loan application already exists")]
    Conflict,
    #[error("loan application not found")]
    NotFound,
    #[error("loan application changed concurrently (revision {found}, expected {expected})")]
    StaleRevision { expected: usize, found: usize },
    #[error("lending API unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for applicant-facing side effects (offer letters, e-mails, disbursement).
pub trait WorkflowNotifier: Send + Sync {
    fn publish(&self, notification: WorkflowNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNotification {
    pub action: WorkflowAction,
    pub application_id: LoanApplicationId,
    pub entrepreneur_id: String,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Application state exposed to the dashboard, including the actions it can offer.
#[derive(Debug, Clone, Serialize)]
pub struct LoanApplicationView {
    pub application_id: LoanApplicationId,
    pub entrepreneur_id: String,
    pub status: LoanApplicationStatus,
    pub status_label: &'static str,
    pub available_actions: Vec<ActionDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reason: Option<String>,
}
