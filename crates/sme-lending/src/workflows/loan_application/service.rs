use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::dispatch::{ActionRequest, DispatchError};
use super::domain::{
    LoanApplicationDraft, LoanApplicationId, LoanApplicationStatus, WorkflowEvent,
};
use super::repository::{
    LoanApplicationRecord, LoanApplicationRepository, RepositoryError, WorkflowNotification,
    WorkflowNotifier,
};
use super::transitions::{self, ActionDescriptor, TransitionError};
use crate::identity::CurrentUser;

/// Service pairing the transition table with persistence and applicant notifications.
pub struct LoanApplicationService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> LoanApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LoanApplicationId(format!("loan-{id:06}"))
}

impl<R, N> LoanApplicationService<R, N>
where
    R: LoanApplicationRepository + 'static,
    N: WorkflowNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Open a draft application for an entrepreneur.
    pub fn open(
        &self,
        draft: LoanApplicationDraft,
        actor: &CurrentUser,
    ) -> Result<LoanApplicationRecord, LoanApplicationServiceError> {
        let record = LoanApplicationRecord {
            application_id: next_application_id(),
            entrepreneur_id: draft.entrepreneur_id,
            loan_product: draft.loan_product,
            requested_amount: draft.requested_amount,
            status: LoanApplicationStatus::Draft,
            history: Vec::new(),
        };

        let stored = self.repository.insert(record)?;
        info!(
            application_id = %stored.application_id,
            actor = %actor.user_id,
            "loan application draft opened"
        );
        Ok(stored)
    }

    pub fn get(
        &self,
        application_id: &LoanApplicationId,
    ) -> Result<LoanApplicationRecord, LoanApplicationServiceError> {
        let record = self
            .repository
            .fetch(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn actions(
        &self,
        application_id: &LoanApplicationId,
    ) -> Result<Vec<ActionDescriptor>, LoanApplicationServiceError> {
        let record = self.get(application_id)?;
        Ok(transitions::describe_actions(record.status))
    }

    /// Apply a user-selected action, persist the result, and notify the applicant when the
    /// action reaches them.
    pub fn dispatch(
        &self,
        application_id: &LoanApplicationId,
        request: ActionRequest,
        actor: &CurrentUser,
    ) -> Result<LoanApplicationRecord, LoanApplicationServiceError> {
        let validated = request.validate()?;
        let mut record = self.get(application_id)?;

        let from = record.status;
        let revision = record.revision();
        let resulting = transitions::apply(from, validated.action)?;
        if let Some(next) = resulting {
            record.status = next;
        }

        record.history.push(WorkflowEvent {
            action: validated.action,
            from,
            to: resulting,
            actor: actor.user_id.clone(),
            reason: validated.reason.clone(),
            recorded_at: Utc::now(),
        });

        self.repository.update(record.clone(), revision)?;

        info!(
            application_id = %record.application_id,
            action = %validated.action,
            from = %from,
            to = %record.status,
            actor = %actor.user_id,
            "workflow action dispatched"
        );

        if validated.action.notifies_applicant() {
            let mut details = BTreeMap::new();
            details.insert("status".to_string(), record.status.as_str().to_string());
            if let Some(reason) = validated.reason {
                details.insert("reason".to_string(), reason);
            }
            let published = self.notifier.publish(WorkflowNotification {
                action: validated.action,
                application_id: record.application_id.clone(),
                entrepreneur_id: record.entrepreneur_id.clone(),
                details,
            });
            // The status change is already committed; a lost notification must not undo it.
            if let Err(err) = published {
                warn!(
                    application_id = %record.application_id,
                    action = %validated.action,
                    error = %err,
                    "applicant notification failed"
                );
            }
        }

        Ok(record)
    }
}

/// Error raised by the loan application service.
#[derive(Debug, thiserror::Error)]
pub enum LoanApplicationServiceError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
