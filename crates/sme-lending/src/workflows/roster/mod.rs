//! Entrepreneur roster import.
//!
//! Reads the entrepreneur list exported from the dashboard and scores each row with the same
//! completion formula the detail view uses.

mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::workflows::onboarding::{
    completion_breakdown, BusinessProfile, CompletionBreakdown, DocumentType, FieldValue,
    ProfileField, UploadedDocuments,
};
use parser::{parse_amount, parse_flag, RosterRow};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One entrepreneur from the roster export.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub entrepreneur_id: String,
    pub incorporation_type: String,
    pub profile: BusinessProfile,
    pub documents: UploadedDocuments,
    pub unrecognized_documents: Vec<String>,
}

impl RosterEntry {
    pub fn completion(&self) -> CompletionBreakdown {
        completion_breakdown(&self.incorporation_type, Some(&self.profile), &self.documents)
    }

    pub fn scored(&self) -> ScoredRosterEntry {
        let breakdown = self.completion();
        ScoredRosterEntry {
            entrepreneur_id: self.entrepreneur_id.clone(),
            business_name: match self.profile.get(ProfileField::Name) {
                Some(FieldValue::Text(name)) => Some(name.clone()),
                _ => None,
            },
            percentage: breakdown.percentage,
            breakdown,
            unrecognized_documents: self.unrecognized_documents.clone(),
        }
    }
}

/// Row of the entrepreneur list view.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRosterEntry {
    pub entrepreneur_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    pub percentage: u8,
    pub breakdown: CompletionBreakdown,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unrecognized_documents: Vec<String>,
}

pub struct EntrepreneurRosterImporter;

impl EntrepreneurRosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RosterEntry>, RosterImportError> {
        let rows = parser::parse_rows(reader)?;
        Ok(rows.into_iter().map(entry_from_row).collect())
    }
}

fn entry_from_row(row: RosterRow) -> RosterEntry {
    let mut profile = BusinessProfile::new();

    let text_fields = [
        (ProfileField::Name, row.business_name),
        (ProfileField::Description, row.description),
        (ProfileField::IncorporationType, row.incorporation_type.clone()),
        (ProfileField::Sector, row.sector),
        (ProfileField::Country, row.country),
        (ProfileField::City, row.city),
        (ProfileField::PostalCode, row.postal_code),
        (ProfileField::StreetAddress, row.street_address),
    ];
    for (field, value) in text_fields {
        if let Some(value) = value {
            profile.set(field, value);
        }
    }

    let number_fields = [
        (ProfileField::YearlyTurnover, row.yearly_turnover),
        (ProfileField::MonthlyTurnover, row.monthly_turnover),
        (ProfileField::YearOfRegistration, row.year_of_registration),
    ];
    for (field, value) in number_fields {
        if let Some(raw) = value {
            profile.set(field, FieldValue::Number(parse_amount(&raw)));
        }
    }

    if let Some(flag) = row.has_prior_loans.as_deref().and_then(parse_flag) {
        profile.set(ProfileField::HasPriorLoans, flag);
    }

    let mut documents = UploadedDocuments::new();
    let mut unrecognized_documents = Vec::new();
    for raw in row
        .documents
        .as_deref()
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
    {
        match raw.parse::<DocumentType>() {
            Ok(document) => {
                documents.insert(document);
            }
            Err(_) => {
                warn!(
                    entrepreneur_id = %row.entrepreneur_id,
                    document = raw,
                    "skipping unrecognized roster document"
                );
                unrecognized_documents.push(raw.to_string());
            }
        }
    }

    RosterEntry {
        entrepreneur_id: row.entrepreneur_id,
        incorporation_type: row.incorporation_type.unwrap_or_default(),
        profile,
        documents,
        unrecognized_documents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = concat!(
        "Entrepreneur ID,Business Name,Description,Incorporation Type,Sector,Country,City,",
        "Postal Code,Yearly Turnover,Monthly Turnover,Year Of Registration,Street Address,",
        "Has Prior Loans,Documents\n"
    );

    #[test]
    fn imports_and_scores_each_row() {
        let csv = format!(
            "{HEADER}\
ent-1,Kilimo Fresh,Produce aggregator,private-limited-company,agribusiness,Kenya,Nakuru,20100,\
\"12,000,000\",1000000,2019,Kenyatta Ave 14,no,certificate_of_incorporation;bank_statement\n\
ent-2,,,,,,,,,,,,,\n"
        );

        let entries =
            EntrepreneurRosterImporter::from_reader(Cursor::new(csv)).expect("roster imports");
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert!(first.profile.missing_fields().is_empty());
        assert_eq!(first.documents.len(), 2);
        // 20 + 40 + round(45 / 140 * 100 * 0.4) = 20 + 40 + 13
        assert_eq!(first.completion().percentage, 73);

        let second = &entries[1];
        assert_eq!(second.incorporation_type, "");
        assert_eq!(second.completion().percentage, 20);
        assert!(second.completion().family_fallback);
    }

    #[test]
    fn unknown_documents_are_reported_not_fatal() {
        let csv = format!(
            "{HEADER}ent-3,Duka Letu,,sole-proprietorship,,,,,,,,,,\
national_id; selfie ;business-permit\n"
        );

        let entries =
            EntrepreneurRosterImporter::from_reader(Cursor::new(csv)).expect("roster imports");
        let entry = &entries[0];
        assert_eq!(entry.unrecognized_documents, vec!["selfie".to_string()]);
        assert!(entry.documents.contains(&DocumentType::NationalId));
        assert!(entry.documents.contains(&DocumentType::BusinessPermit));

        let scored = entry.scored();
        assert_eq!(scored.business_name.as_deref(), Some("Duka Letu"));
        assert_eq!(scored.percentage, scored.breakdown.percentage);
    }

    #[test]
    fn unparseable_turnover_does_not_count() {
        let csv = format!("{HEADER}ent-4,Duka Letu,,sole-proprietorship,,,,,n/a,,,,,\n");

        let entries =
            EntrepreneurRosterImporter::from_reader(Cursor::new(csv)).expect("roster imports");
        let profile = &entries[0].profile;
        assert!(profile.get(ProfileField::YearlyTurnover).is_some());
        assert!(!profile.is_satisfied(ProfileField::YearlyTurnover));
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        match EntrepreneurRosterImporter::from_path("/nonexistent/roster.csv") {
            Err(RosterImportError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
