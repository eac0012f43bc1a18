use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sme_lending::identity::CurrentUser;
use sme_lending::workflows::loan_application::{
    actions_for_raw, available_actions, describe_actions, ActionRequest, LoanApplicationDraft,
    LoanApplicationId, LoanApplicationRecord, LoanApplicationRepository, LoanApplicationService,
    LoanApplicationServiceError, LoanApplicationStatus, NotificationError, RepositoryError,
    WorkflowAction, WorkflowNotification, WorkflowNotifier,
};

#[derive(Default)]
struct Store {
    records: Mutex<HashMap<LoanApplicationId, LoanApplicationRecord>>,
}

impl LoanApplicationRepository for Store {
    fn insert(
        &self,
        record: LoanApplicationRecord,
    ) -> Result<LoanApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex");
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn update(
        &self,
        record: LoanApplicationRecord,
        expected_revision: usize,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex");
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
        Ok(self.records.lock().expect("store mutex").get(id).cloned())
    }
}

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<WorkflowNotification>>,
}

impl WorkflowNotifier for Outbox {
    fn publish(&self, notification: WorkflowNotification) -> Result<(), NotificationError> {
        self.sent.lock().expect("outbox mutex").push(notification);
        Ok(())
    }
}

fn officer() -> CurrentUser {
    CurrentUser::new("officer-42")
}

fn draft() -> LoanApplicationDraft {
    LoanApplicationDraft {
        entrepreneur_id: "ent-100".to_string(),
        loan_product: "asset_finance".to_string(),
        requested_amount: 2_400_000,
    }
}

#[test]
fn under_review_offers_the_decision_actions() {
    let actions = describe_actions(LoanApplicationStatus::UnderReview);
    let summary: Vec<_> = actions
        .iter()
        .map(|action| (action.id, action.resulting_status))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("approve", Some(LoanApplicationStatus::Approved)),
            ("reject", Some(LoanApplicationStatus::Rejected)),
            ("request_documents", Some(LoanApplicationStatus::UnderReview)),
        ]
    );
}

#[test]
fn terminal_statuses_have_nothing_to_do() {
    assert!(available_actions(LoanApplicationStatus::Disbursed).is_empty());
    assert!(available_actions(LoanApplicationStatus::Withdrawn).is_empty());
}

#[test]
fn unknown_raw_status_only_allows_notes() {
    let actions = actions_for_raw("on_hold");
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action, WorkflowAction::AddNote);
    assert_eq!(actions[0].resulting_status, None);
}

#[test]
fn application_runs_from_draft_to_offer_letter() {
    let outbox = Arc::new(Outbox::default());
    let service = LoanApplicationService::new(Arc::new(Store::default()), outbox.clone());
    let actor = officer();

    let record = service.open(draft(), &actor).expect("draft opens");
    let id = record.application_id.clone();

    for request in [
        ActionRequest::new(WorkflowAction::Submit),
        ActionRequest::new(WorkflowAction::StartReview),
        ActionRequest::with_reason(WorkflowAction::Approve, "strong cash flow"),
        ActionRequest::new(WorkflowAction::SendOffer),
    ] {
        service
            .dispatch(&id, request, &actor)
            .expect("action accepted");
    }

    let record = service.get(&id).expect("record stored");
    assert_eq!(record.status, LoanApplicationStatus::OfferLetterSent);
    assert_eq!(record.history.len(), 4);
    assert!(record
        .history
        .iter()
        .all(|event| event.actor == "officer-42"));

    let sent: Vec<_> = outbox
        .sent
        .lock()
        .expect("outbox mutex")
        .iter()
        .map(|notification| notification.action)
        .collect();
    assert_eq!(sent, vec![WorkflowAction::Approve, WorkflowAction::SendOffer]);
}

#[test]
fn rejection_without_reason_never_reaches_the_workflow() {
    let outbox = Arc::new(Outbox::default());
    let service = LoanApplicationService::new(Arc::new(Store::default()), outbox.clone());
    let actor = officer();
    let id = service
        .open(draft(), &actor)
        .expect("draft opens")
        .application_id;

    let result = service.dispatch(
        &id,
        ActionRequest::with_reason(WorkflowAction::Reject, "   "),
        &actor,
    );

    assert!(matches!(result, Err(LoanApplicationServiceError::Dispatch(_))));
    let record = service.get(&id).expect("record stored");
    assert_eq!(record.status, LoanApplicationStatus::Draft);
    assert!(record.history.is_empty());
    assert!(outbox.sent.lock().expect("outbox mutex").is_empty());
}

#[test]
fn actions_outside_the_table_are_refused() {
    let service = LoanApplicationService::new(
        Arc::new(Store::default()),
        Arc::new(Outbox::default()),
    );
    let actor = officer();
    let id = service
        .open(draft(), &actor)
        .expect("draft opens")
        .application_id;

    let result = service.dispatch(&id, ActionRequest::new(WorkflowAction::Disburse), &actor);
    assert!(matches!(
        result,
        Err(LoanApplicationServiceError::Transition(_))
    ));
}
