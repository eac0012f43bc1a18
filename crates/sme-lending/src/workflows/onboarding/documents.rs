use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// KYC/KYB document categories collected during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    NationalId,
    TaxPinCertificate,
    BusinessRegistrationCertificate,
    BusinessPermit,
    BankStatement,
    PartnershipDeed,
    CertificateOfIncorporation,
    MemorandumAndArticles,
    DirectorsRegister,
    DirectorsIdentification,
    AuditedFinancialStatements,
}

impl DocumentType {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::NationalId,
            Self::TaxPinCertificate,
            Self::BusinessRegistrationCertificate,
            Self::BusinessPermit,
            Self::BankStatement,
            Self::PartnershipDeed,
            Self::CertificateOfIncorporation,
            Self::MemorandumAndArticles,
            Self::DirectorsRegister,
            Self::DirectorsIdentification,
            Self::AuditedFinancialStatements,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NationalId => "national_id",
            Self::TaxPinCertificate => "tax_pin_certificate",
            Self::BusinessRegistrationCertificate => "business_registration_certificate",
            Self::BusinessPermit => "business_permit",
            Self::BankStatement => "bank_statement",
            Self::PartnershipDeed => "partnership_deed",
            Self::CertificateOfIncorporation => "certificate_of_incorporation",
            Self::MemorandumAndArticles => "memorandum_and_articles",
            Self::DirectorsRegister => "directors_register",
            Self::DirectorsIdentification => "directors_identification",
            Self::AuditedFinancialStatements => "audited_financial_statements",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NationalId => "National ID",
            Self::TaxPinCertificate => "Tax PIN Certificate",
            Self::BusinessRegistrationCertificate => "Business Registration Certificate",
            Self::BusinessPermit => "Business Permit",
            Self::BankStatement => "Bank Statement (6 months)",
            Self::PartnershipDeed => "Partnership Deed",
            Self::CertificateOfIncorporation => "Certificate of Incorporation",
            Self::MemorandumAndArticles => "Memorandum & Articles of Association",
            Self::DirectorsRegister => "Register of Directors",
            Self::DirectorsIdentification => "Directors' Identification",
            Self::AuditedFinancialStatements => "Audited Financial Statements",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ordered()
            .into_iter()
            .find(|doc| doc.as_str() == normalized)
            .ok_or_else(|| UnknownDocumentType(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized document type '{0}'")]
pub struct UnknownDocumentType(pub String);

/// Document types an entrepreneur has uploaded.
pub type UploadedDocuments = BTreeSet<DocumentType>;

/// A required document and its share of the document sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredDocument {
    pub document_type: DocumentType,
    pub weight: u32,
}

const fn req(document_type: DocumentType, weight: u32) -> RequiredDocument {
    RequiredDocument {
        document_type,
        weight,
    }
}

use DocumentType as D;

const SOLE_PROPRIETORSHIP_DOCUMENTS: &[RequiredDocument] = &[
    req(D::NationalId, 30),
    req(D::TaxPinCertificate, 20),
    req(D::BusinessRegistrationCertificate, 20),
    req(D::BusinessPermit, 10),
    req(D::BankStatement, 20),
];

const PARTNERSHIP_DOCUMENTS: &[RequiredDocument] = &[
    req(D::PartnershipDeed, 25),
    req(D::NationalId, 20),
    req(D::TaxPinCertificate, 15),
    req(D::BusinessRegistrationCertificate, 20),
    req(D::BusinessPermit, 10),
    req(D::BankStatement, 20),
];

const COMPANY_DOCUMENTS: &[RequiredDocument] = &[
    req(D::CertificateOfIncorporation, 25),
    req(D::MemorandumAndArticles, 15),
    req(D::DirectorsRegister, 15),
    req(D::DirectorsIdentification, 20),
    req(D::TaxPinCertificate, 15),
    req(D::BusinessPermit, 10),
    req(D::BankStatement, 20),
    req(D::AuditedFinancialStatements, 20),
];

/// Legal-entity families that share a document checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncorporationFamily {
    SoleProprietorship,
    Partnership,
    Company,
}

impl IncorporationFamily {
    pub const fn ordered() -> [Self; 3] {
        [Self::SoleProprietorship, Self::Partnership, Self::Company]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SoleProprietorship => "Sole Proprietorship",
            Self::Partnership => "Partnership",
            Self::Company => "Limited Company",
        }
    }

    pub const fn requirements(self) -> &'static [RequiredDocument] {
        match self {
            Self::SoleProprietorship => SOLE_PROPRIETORSHIP_DOCUMENTS,
            Self::Partnership => PARTNERSHIP_DOCUMENTS,
            Self::Company => COMPANY_DOCUMENTS,
        }
    }

    pub fn total_weight(self) -> u32 {
        self.requirements().iter().map(|doc| doc.weight).sum()
    }

    /// Classify an incorporation type as entered on the business profile.
    pub fn classify(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "sole-proprietorship" | "sole-proprietor" | "sole-trader" => {
                Some(Self::SoleProprietorship)
            }
            "partnership"
            | "general-partnership"
            | "limited-partnership"
            | "limited-liability-partnership"
            | "llp" => Some(Self::Partnership),
            "private-limited-company"
            | "public-limited-company"
            | "limited-company"
            | "company"
            | "company-limited-by-guarantee"
            | "ltd"
            | "plc" => Some(Self::Company),
            _ => None,
        }
    }

    /// Like [`classify`](Self::classify), falling back to the sole proprietorship checklist.
    pub fn resolve(raw: &str) -> ResolvedFamily {
        match Self::classify(raw) {
            Some(family) => ResolvedFamily {
                family,
                fallback: false,
            },
            None => {
                warn!(
                    incorporation_type = raw,
                    "unrecognized incorporation type, using sole proprietorship documents"
                );
                ResolvedFamily {
                    family: Self::SoleProprietorship,
                    fallback: true,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFamily {
    pub family: IncorporationFamily,
    pub fallback: bool,
}
