//! Entrepreneur onboarding: business profile capture, KYC/KYB document checklists, and the
//! completion score that drives the dashboard progress bars.

pub mod completion;
pub mod documents;
pub mod profile;
pub mod wizard;

pub use completion::{
    completion_breakdown, completion_percentage, document_score, profile_score,
    CompletionBreakdown, BASE_SCORE,
};
pub use documents::{
    DocumentType, IncorporationFamily, RequiredDocument, ResolvedFamily, UnknownDocumentType,
    UploadedDocuments,
};
pub use profile::{BusinessProfile, FieldValue, ProfileField};
pub use wizard::{
    BusinessDetailsInput, DetailsCaptured, FinancialsInput, LocationCaptured, LocationInput,
    OnboardingError, OnboardingWizard,
};
