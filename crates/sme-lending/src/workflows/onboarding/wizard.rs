//! Three-step onboarding wizard.
//!
//! Each step validates its own input and hands a typed value to the next, so a profile can only
//! be assembled once every step has passed:
//! `OnboardingWizard::start` -> [`DetailsCaptured::with_location`] ->
//! [`LocationCaptured::with_financials`] -> [`BusinessProfile`].

use serde::{Deserialize, Serialize};

use super::documents::IncorporationFamily;
use super::profile::{BusinessProfile, FieldValue, ProfileField};

const EARLIEST_REGISTRATION_YEAR: i32 = 1900;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessDetailsInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub incorporation_type: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub year_of_registration: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInput {
    pub country: String,
    pub city: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialsInput {
    #[serde(default)]
    pub yearly_turnover: Option<f64>,
    #[serde(default)]
    pub monthly_turnover: Option<f64>,
    pub has_prior_loans: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OnboardingError {
    #[error("business name must be at least two characters")]
    NameTooShort,
    #[error("incorporation type is required")]
    MissingIncorporationType,
    #[error("year of registration {year} must fall between 1900 and {current}")]
    InvalidRegistrationYear { year: i32, current: i32 },
    #[error("{field} is required")]
    MissingLocation { field: &'static str },
    #[error("{field} cannot be negative")]
    NegativeTurnover { field: &'static str },
    #[error("monthly turnover {monthly} exceeds yearly turnover {yearly}")]
    MonthlyExceedsYearly { monthly: f64, yearly: f64 },
}

/// Entry point of the wizard.
pub struct OnboardingWizard;

impl OnboardingWizard {
    /// Validate the business details step. `current_year` bounds the registration year.
    pub fn start(
        input: BusinessDetailsInput,
        current_year: i32,
    ) -> Result<DetailsCaptured, OnboardingError> {
        let name = input.name.trim().to_string();
        if name.chars().count() < 2 {
            return Err(OnboardingError::NameTooShort);
        }

        let incorporation_type = input.incorporation_type.trim().to_string();
        if incorporation_type.is_empty() {
            return Err(OnboardingError::MissingIncorporationType);
        }

        if let Some(year) = input.year_of_registration {
            if !(EARLIEST_REGISTRATION_YEAR..=current_year).contains(&year) {
                return Err(OnboardingError::InvalidRegistrationYear {
                    year,
                    current: current_year,
                });
            }
        }

        Ok(DetailsCaptured {
            name,
            description: non_blank(input.description),
            family: IncorporationFamily::classify(&incorporation_type),
            incorporation_type,
            sector: non_blank(input.sector),
            year_of_registration: input.year_of_registration,
        })
    }
}

/// Output of the business details step.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsCaptured {
    pub name: String,
    pub description: Option<String>,
    pub incorporation_type: String,
    /// `None` when the type is not one the document checklists know about.
    pub family: Option<IncorporationFamily>,
    pub sector: Option<String>,
    pub year_of_registration: Option<i32>,
}

impl DetailsCaptured {
    pub fn with_location(self, input: LocationInput) -> Result<LocationCaptured, OnboardingError> {
        let country = required(input.country, "country")?;
        let city = required(input.city, "city")?;

        Ok(LocationCaptured {
            details: self,
            country,
            city,
            postal_code: non_blank(input.postal_code),
            street_address: non_blank(input.street_address),
        })
    }
}

/// Output of the location step.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCaptured {
    pub details: DetailsCaptured,
    pub country: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub street_address: Option<String>,
}

impl LocationCaptured {
    /// Final step: validate financials and assemble the profile snapshot.
    pub fn with_financials(
        self,
        input: FinancialsInput,
    ) -> Result<BusinessProfile, OnboardingError> {
        let yearly = non_negative(input.yearly_turnover, "yearly turnover")?;
        let monthly = non_negative(input.monthly_turnover, "monthly turnover")?;
        if let (Some(monthly), Some(yearly)) = (monthly, yearly) {
            if monthly > yearly {
                return Err(OnboardingError::MonthlyExceedsYearly { monthly, yearly });
            }
        }

        let LocationCaptured {
            details,
            country,
            city,
            postal_code,
            street_address,
        } = self;

        let mut profile = BusinessProfile::new()
            .with(ProfileField::Name, details.name)
            .with(ProfileField::IncorporationType, details.incorporation_type)
            .with(ProfileField::Country, country)
            .with(ProfileField::City, city)
            .with(ProfileField::HasPriorLoans, input.has_prior_loans);

        let optional_text = [
            (ProfileField::Description, details.description),
            (ProfileField::Sector, details.sector),
            (ProfileField::PostalCode, postal_code),
            (ProfileField::StreetAddress, street_address),
        ];
        for (field, value) in optional_text {
            if let Some(value) = value {
                profile.set(field, value);
            }
        }

        if let Some(year) = details.year_of_registration {
            profile.set(ProfileField::YearOfRegistration, year);
        }
        if let Some(yearly) = yearly {
            profile.set(ProfileField::YearlyTurnover, FieldValue::Number(yearly));
        }
        if let Some(monthly) = monthly {
            profile.set(ProfileField::MonthlyTurnover, FieldValue::Number(monthly));
        }

        Ok(profile)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(value: String, field: &'static str) -> Result<String, OnboardingError> {
    non_blank(Some(value)).ok_or(OnboardingError::MissingLocation { field })
}

fn non_negative(value: Option<f64>, field: &'static str) -> Result<Option<f64>, OnboardingError> {
    match value {
        Some(amount) if amount.is_nan() => Ok(None),
        Some(amount) if amount < 0.0 => Err(OnboardingError::NegativeTurnover { field }),
        other => Ok(other),
    }
}
