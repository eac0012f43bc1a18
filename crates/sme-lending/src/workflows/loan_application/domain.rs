use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for loan applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanApplicationId(pub String);

impl fmt::Display for LoanApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fine-grained status driving which actions credit officers can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    OfferLetterSent,
    OfferLetterSigned,
    OfferLetterDeclined,
    Disbursed,
    Withdrawn,
}

impl LoanApplicationStatus {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Draft,
            Self::Submitted,
            Self::UnderReview,
            Self::Approved,
            Self::Rejected,
            Self::OfferLetterSent,
            Self::OfferLetterSigned,
            Self::OfferLetterDeclined,
            Self::Disbursed,
            Self::Withdrawn,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::OfferLetterSent => "offer_letter_sent",
            Self::OfferLetterSigned => "offer_letter_signed",
            Self::OfferLetterDeclined => "offer_letter_declined",
            Self::Disbursed => "disbursed",
            Self::Withdrawn => "withdrawn",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::OfferLetterSent => "Offer Letter Sent",
            Self::OfferLetterSigned => "Offer Letter Signed",
            Self::OfferLetterDeclined => "Offer Letter Declined",
            Self::Disbursed => "Disbursed",
            Self::Withdrawn => "Withdrawn",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Disbursed | Self::Withdrawn)
    }
}

impl fmt::Display for LoanApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

/// Coarse pipeline status shown on the credit pipeline views.
///
/// This domain is tracked independently of [`LoanApplicationStatus`]; no mapping exists between
/// the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    KycKybVerification,
    CreditAnalysis,
    HeadOfCreditReview,
    Approved,
    Rejected,
    Disbursed,
    Cancelled,
}

impl PipelineStatus {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::KycKybVerification,
            Self::CreditAnalysis,
            Self::HeadOfCreditReview,
            Self::Approved,
            Self::Rejected,
            Self::Disbursed,
            Self::Cancelled,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KycKybVerification => "kyc_kyb_verification",
            Self::CreditAnalysis => "credit_analysis",
            Self::HeadOfCreditReview => "head_of_credit_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Disbursed => "disbursed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::KycKybVerification => "KYC/KYB Verification",
            Self::CreditAnalysis => "Credit Analysis",
            Self::HeadOfCreditReview => "Head of Credit Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Disbursed => "Disbursed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Disbursed | Self::Cancelled)
    }
}

impl FromStr for PipelineStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized status '{0}'")]
pub struct UnknownStatus(pub String);

/// Actions a back-office user can select on a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    Submit,
    StartReview,
    RequestDocuments,
    Approve,
    Reject,
    SendOffer,
    ResendOffer,
    Disburse,
    Resubmit,
    AddNote,
}

impl WorkflowAction {
    pub const fn id(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::StartReview => "start_review",
            Self::RequestDocuments => "request_documents",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::SendOffer => "send_offer",
            Self::ResendOffer => "resend_offer",
            Self::Disburse => "disburse",
            Self::Resubmit => "resubmit",
            Self::AddNote => "add_note",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Submit => "Submit Application",
            Self::StartReview => "Start Review",
            Self::RequestDocuments => "Request Documents",
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::SendOffer => "Send Offer Letter",
            Self::ResendOffer => "Resend Offer Letter",
            Self::Disburse => "Disburse Funds",
            Self::Resubmit => "Resubmit",
            Self::AddNote => "Add Note",
        }
    }

    /// Credit decisions must carry a free-text reason before they are dispatched.
    pub const fn requires_reason(self) -> bool {
        matches!(self, Self::Approve | Self::Reject)
    }

    /// Actions whose effects reach the applicant (letters, requests, funds).
    pub const fn notifies_applicant(self) -> bool {
        matches!(
            self,
            Self::RequestDocuments
                | Self::Approve
                | Self::Reject
                | Self::SendOffer
                | Self::ResendOffer
                | Self::Disburse
        )
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Request payload used to open a new draft application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplicationDraft {
    pub entrepreneur_id: String,
    pub loan_product: String,
    pub requested_amount: u64,
}

/// Audit entry appended whenever an action is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub action: WorkflowAction,
    pub from: LoanApplicationStatus,
    pub to: Option<LoanApplicationStatus>,
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
