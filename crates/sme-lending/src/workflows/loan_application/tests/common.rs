use std::collections::HashMap;
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::identity::{CurrentUser, IdentityProvider};
use crate::workflows::loan_application::domain::{
    LoanApplicationDraft, LoanApplicationId, LoanApplicationStatus,
};
use crate::workflows::loan_application::repository::{
    LoanApplicationRecord, LoanApplicationRepository, NotificationError, RepositoryError,
    WorkflowNotification, WorkflowNotifier,
};
use crate::workflows::loan_application::{loan_application_router, LoanApplicationService};

pub(super) const OFFICER_TOKEN: &str = "officer-token";

pub(super) fn officer() -> CurrentUser {
    CurrentUser::new("credit-officer-7")
}

pub(super) fn draft() -> LoanApplicationDraft {
    LoanApplicationDraft {
        entrepreneur_id: "ent-0042".to_string(),
        loan_product: "working-capital-12m".to_string(),
        requested_amount: 2_500_000,
    }
}

pub(super) fn record_with_status(
    id: &str,
    status: LoanApplicationStatus,
) -> LoanApplicationRecord {
    LoanApplicationRecord {
        application_id: LoanApplicationId(id.to_string()),
        entrepreneur_id: "ent-0042".to_string(),
        loan_product: "working-capital-12m".to_string(),
        requested_amount: 2_500_000,
        status,
        history: Vec::new(),
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<LoanApplicationId, LoanApplicationRecord>>,
}

impl MemoryRepository {
    pub(super) fn seeded(records: Vec<LoanApplicationRecord>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("repository mutex poisoned");
            for record in records {
                guard.insert(record.application_id.clone(), record);
            }
        }
        repository
    }
}

impl LoanApplicationRepository for MemoryRepository {
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
        match guard.get_mut(&record.application_id) {
            Some(existing) if existing.revision() != expected_revision => {
                Err(RepositoryError::StaleRevision {
                    expected: expected_revision,
                    found: existing.revision(),
                })
            }
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(
        &self,
        id: &LoanApplicationId,
    ) -> Result<Option<LoanApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Holds every caller inside `fetch` until `readers` of them have read, so their dispatches
/// work from the same snapshot.
pub(super) struct RacingRepository {
    pub(super) inner: MemoryRepository,
    barrier: Barrier,
}

impl RacingRepository {
    pub(super) fn seeded(records: Vec<LoanApplicationRecord>, readers: usize) -> Self {
        Self {
            inner: MemoryRepository::seeded(records),
            barrier: Barrier::new(readers),
        }
    }
}

impl LoanApplicationRepository for RacingRepository {
    fn insert(
        &self,
        record: LoanApplicationRecord,
    ) -> Result<LoanApplicationRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(
        &self,
        record: LoanApplicationRecord,
        expected_revision: usize,
    ) -> Result<(), RepositoryError> {
        self.inner.update(record, expected_revision)
    }

    fn fetch(
        &self,
        id: &LoanApplicationId,
    ) -> Result<Option<LoanApplicationRecord>, RepositoryError> {
        let snapshot = self.inner.fetch(id);
        self.barrier.wait();
        snapshot
    }
}

pub(super) struct UnavailableRepository;

impl LoanApplicationRepository for UnavailableRepository {
    fn insert(
        &self,
        _record: LoanApplicationRecord,
    ) -> Result<LoanApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("lending API timed out".to_string()))
    }

    fn update(
        &self,
        _record: LoanApplicationRecord,
        _expected_revision: usize,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("lending API timed out".to_string()))
    }

    fn fetch(
        &self,
        _id: &LoanApplicationId,
    ) -> Result<Option<LoanApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("lending API timed out".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    events: Mutex<Vec<WorkflowNotification>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<WorkflowNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl WorkflowNotifier for MemoryNotifier {
    fn publish(&self, notification: WorkflowNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl WorkflowNotifier for OfflineNotifier {
    fn publish(&self, _notification: WorkflowNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) struct SingleTokenIdentity;

impl IdentityProvider for SingleTokenIdentity {
    fn resolve(&self, bearer_token: &str) -> Option<CurrentUser> {
        (bearer_token == OFFICER_TOKEN).then(officer)
    }
}

pub(super) fn service_with(
    records: Vec<LoanApplicationRecord>,
) -> (
    LoanApplicationService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::seeded(records));
    let notifier = Arc::new(MemoryNotifier::default());
    let service = LoanApplicationService::new(repository.clone(), notifier.clone());
    (service, repository, notifier)
}

pub(super) fn router_with(
    records: Vec<LoanApplicationRecord>,
) -> (axum::Router, Arc<MemoryNotifier>) {
    let (service, _repository, notifier) = service_with(records);
    let router = loan_application_router(Arc::new(service), Arc::new(SingleTokenIdentity));
    (router, notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
