use metrics_exporter_prometheus::PrometheusHandle;
use sme_lending::config::IdentityConfig;
use sme_lending::identity::{CurrentUser, IdentityProvider};
use sme_lending::workflows::loan_application::{
    LoanApplicationId, LoanApplicationRecord, LoanApplicationRepository, NotificationError,
    RepositoryError, WorkflowNotification, WorkflowNotifier,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLoanApplicationRepository {
    records: Arc<Mutex<HashMap<LoanApplicationId, LoanApplicationRecord>>>,
}

impl LoanApplicationRepository for InMemoryLoanApplicationRepository {
    fn insert(
        &self,
        record: LoanApplicationRecord,
    ) -> Result<LoanApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(
        &self,
        record: LoanApplicationRecord,
        expected_revision: usize,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let existing = guard
            .get_mut(&record.application_id)
            .ok_or(RepositoryError::NotFound)?;
        if existing.revision() != expected_revision {
            return Err(RepositoryError::StaleRevision {
                expected: expected_revision,
                found: existing.revision(),
            });
        }
        *existing = record;
        Ok(())
    }

    fn fetch(
        &self,
        id: &LoanApplicationId,
    ) -> Result<Option<LoanApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Keeps applicant notifications in memory and logs them; stands in for the e-mail/SMS gateway.
#[derive(Default, Clone)]
pub(crate) struct InMemoryWorkflowNotifier {
    events: Arc<Mutex<Vec<WorkflowNotification>>>,
}

impl WorkflowNotifier for InMemoryWorkflowNotifier {
    fn publish(&self, notification: WorkflowNotification) -> Result<(), NotificationError> {
        info!(
            application_id = %notification.application_id,
            entrepreneur_id = %notification.entrepreneur_id,
            action = %notification.action,
            "applicant notification queued"
        );
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryWorkflowNotifier {
    pub(crate) fn events(&self) -> Vec<WorkflowNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

/// Resolves bearer tokens configured through `APP_API_TOKENS`.
#[derive(Debug, Clone, Default)]
pub(crate) struct StaticTokenIdentityProvider {
    users_by_token: HashMap<String, String>,
}

impl StaticTokenIdentityProvider {
    pub(crate) fn from_config(config: &IdentityConfig) -> Self {
        Self {
            users_by_token: config
                .api_tokens
                .iter()
                .map(|entry| (entry.token.clone(), entry.user_id.clone()))
                .collect(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.users_by_token.is_empty()
    }
}

impl IdentityProvider for StaticTokenIdentityProvider {
    fn resolve(&self, bearer_token: &str) -> Option<CurrentUser> {
        self.users_by_token
            .get(bearer_token)
            .map(|user_id| CurrentUser::new(user_id.clone()))
    }
}
