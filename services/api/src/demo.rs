use crate::infra::{InMemoryLoanApplicationRepository, InMemoryWorkflowNotifier};
use chrono::{Datelike, Local};
use clap::Args;
use sme_lending::error::AppError;
use sme_lending::identity::CurrentUser;
use sme_lending::workflows::loan_application::{
    actions_for_raw, describe, ActionRequest, LoanApplicationDraft, LoanApplicationService,
    LoanApplicationStatus, WorkflowAction,
};
use sme_lending::workflows::onboarding::{
    completion_breakdown, BusinessDetailsInput, BusinessProfile, CompletionBreakdown,
    DocumentType, FinancialsInput, LocationInput, OnboardingWizard, ProfileField,
    UploadedDocuments,
};
use sme_lending::workflows::roster::EntrepreneurRosterImporter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct StatusActionsArgs {
    /// Raw status value as stored on the loan application
    #[arg(long)]
    pub(crate) status: String,
    /// Print the action list as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Incorporation type from the business profile (e.g. private-limited-company)
    #[arg(long)]
    pub(crate) incorporation_type: String,
    /// Business profile as a JSON object keyed by field name
    #[arg(long, value_parser = parse_profile)]
    pub(crate) profile: Option<BusinessProfile>,
    /// Comma-separated list of uploaded document types
    #[arg(long, value_delimiter = ',')]
    pub(crate) documents: Vec<DocumentType>,
    /// Print the breakdown as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// Entrepreneur roster CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print the scored roster as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Stop after the onboarding portion of the demo.
    #[arg(long)]
    pub(crate) skip_application: bool,
}

fn parse_profile(raw: &str) -> Result<BusinessProfile, String> {
    serde_json::from_str(raw).map_err(|err| format!("profile must be a JSON object ({err})"))
}

pub(crate) fn run_status_actions(args: StatusActionsArgs) -> Result<(), AppError> {
    let StatusActionsArgs { status, json } = args;
    let actions = describe(actions_for_raw(&status));

    if json {
        println!("{}", serde_json::to_string_pretty(&actions)?);
        return Ok(());
    }

    match status.parse::<LoanApplicationStatus>() {
        Ok(parsed) => println!("Status: {} ({})", parsed.label(), parsed),
        Err(_) => println!("Status: '{}' (unrecognized)", status.trim()),
    }
    if actions.is_empty() {
        println!("- no actions available (terminal status)");
    }
    for action in &actions {
        match action.resulting_status {
            Some(next) => println!("- {} -> {}", action.label, next.label()),
            None => println!("- {} (status unchanged)", action.label),
        }
    }
    Ok(())
}

pub(crate) fn run_completion_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        incorporation_type,
        profile,
        documents,
        json,
    } = args;

    let uploaded: UploadedDocuments = documents.into_iter().collect();
    let breakdown = completion_breakdown(&incorporation_type, profile.as_ref(), &uploaded);

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        render_breakdown(&breakdown);
    }
    Ok(())
}

pub(crate) fn run_roster_report(args: RosterArgs) -> Result<(), AppError> {
    let RosterArgs { csv, json } = args;
    let entries = EntrepreneurRosterImporter::from_path(&csv)?;
    let scored: Vec<_> = entries.iter().map(|entry| entry.scored()).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&scored)?);
        return Ok(());
    }

    println!("Roster completion ({} entrepreneurs)", scored.len());
    for entry in &scored {
        println!(
            "- {} {}: {}% ({} missing fields, {} missing documents)",
            entry.entrepreneur_id,
            entry.business_name.as_deref().unwrap_or("(unnamed)"),
            entry.percentage,
            entry.breakdown.missing_fields.len(),
            entry.breakdown.missing_documents.len()
        );
        if !entry.unrecognized_documents.is_empty() {
            println!(
                "  unrecognized documents: {}",
                entry.unrecognized_documents.join(", ")
            );
        }
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let current_year = Local::now().year();

    println!("SME lending back office demo");
    println!("\nOnboarding wizard");
    let profile = OnboardingWizard::start(demo_business_details(), current_year)
        .and_then(|step| step.with_location(demo_location()))
        .and_then(|step| step.with_financials(demo_financials()))?;
    println!(
        "- profile captured with {} of {} fields",
        ProfileField::ordered().len() - profile.missing_fields().len(),
        ProfileField::ordered().len()
    );

    let incorporation_type = profile.incorporation_type().unwrap_or_default().to_string();
    let mut uploaded = UploadedDocuments::new();
    for document in [
        DocumentType::CertificateOfIncorporation,
        DocumentType::TaxPinCertificate,
        DocumentType::BankStatement,
    ] {
        uploaded.insert(document);
        let breakdown = completion_breakdown(&incorporation_type, Some(&profile), &uploaded);
        println!(
            "- uploaded {} -> {}% complete",
            document.label(),
            breakdown.percentage
        );
    }
    render_breakdown(&completion_breakdown(
        &incorporation_type,
        Some(&profile),
        &uploaded,
    ));

    if args.skip_application {
        return Ok(());
    }

    println!("\nLoan application workflow");
    let repository = Arc::new(InMemoryLoanApplicationRepository::default());
    let notifier = Arc::new(InMemoryWorkflowNotifier::default());
    let service = LoanApplicationService::new(repository, notifier.clone());
    let officer = CurrentUser::new("credit-officer-demo");

    let record = match service.open(
        LoanApplicationDraft {
            entrepreneur_id: "ent-demo-001".to_string(),
            loan_product: "working_capital".to_string(),
            requested_amount: 1_500_000,
        },
        &officer,
    ) {
        Ok(record) => record,
        Err(err) => {
            println!("  Draft rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- opened {} -> {}",
        record.application_id,
        record.status.label()
    );

    let steps = [
        ActionRequest::new(WorkflowAction::Submit),
        ActionRequest::new(WorkflowAction::StartReview),
        ActionRequest::new(WorkflowAction::RequestDocuments),
        ActionRequest::new(WorkflowAction::Approve),
        ActionRequest::with_reason(
            WorkflowAction::Approve,
            "Turnover and bank statements support the requested amount",
        ),
        ActionRequest::new(WorkflowAction::SendOffer),
    ];
    for request in steps {
        let action = request.action;
        match service.dispatch(&record.application_id, request, &officer) {
            Ok(updated) => {
                let view = updated.view();
                let next: Vec<_> = view
                    .available_actions
                    .iter()
                    .map(|action| action.label)
                    .collect();
                println!(
                    "- {} -> {} (next: {})",
                    action.label(),
                    view.status_label,
                    if next.is_empty() {
                        "none".to_string()
                    } else {
                        next.join(", ")
                    }
                );
            }
            Err(err) => println!("- {} refused: {}", action.label(), err),
        }
    }

    let notifications = notifier.events();
    println!("\nApplicant notifications ({})", notifications.len());
    for notification in notifications {
        println!(
            "- {} for {}",
            notification.action.label(),
            notification.entrepreneur_id
        );
    }

    Ok(())
}

fn render_breakdown(breakdown: &CompletionBreakdown) {
    println!(
        "Completion {}% | profile {}% | documents {}% ({} checklist{})",
        breakdown.percentage,
        breakdown.profile_score,
        breakdown.document_score,
        breakdown.family.label(),
        if breakdown.family_fallback {
            ", fallback"
        } else {
            ""
        }
    );
    if !breakdown.missing_fields.is_empty() {
        let fields: Vec<_> = breakdown
            .missing_fields
            .iter()
            .map(|field| field.key())
            .collect();
        println!("  Missing fields: {}", fields.join(", "));
    }
    if !breakdown.missing_documents.is_empty() {
        let documents: Vec<_> = breakdown
            .missing_documents
            .iter()
            .map(|document| document.label())
            .collect();
        println!("  Missing documents: {}", documents.join(", "));
    }
}

fn demo_business_details() -> BusinessDetailsInput {
    BusinessDetailsInput {
        name: "Kilimo Fresh Produce Ltd".to_string(),
        description: Some("Aggregates smallholder produce for urban retailers".to_string()),
        incorporation_type: "private-limited-company".to_string(),
        sector: Some("agribusiness".to_string()),
        year_of_registration: Some(2019),
    }
}

fn demo_location() -> LocationInput {
    LocationInput {
        country: "Kenya".to_string(),
        city: "Nakuru".to_string(),
        postal_code: Some("20100".to_string()),
        street_address: Some("Kenyatta Avenue 14".to_string()),
    }
}

fn demo_financials() -> FinancialsInput {
    FinancialsInput {
        yearly_turnover: Some(12_000_000.0),
        monthly_turnover: Some(1_000_000.0),
        has_prior_loans: false,
    }
}
