use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Business profile fields that count towards onboarding completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Description,
    IncorporationType,
    Sector,
    Country,
    City,
    PostalCode,
    YearlyTurnover,
    MonthlyTurnover,
    YearOfRegistration,
    StreetAddress,
    HasPriorLoans,
}

impl ProfileField {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::Name,
            Self::Description,
            Self::IncorporationType,
            Self::Sector,
            Self::Country,
            Self::City,
            Self::PostalCode,
            Self::YearlyTurnover,
            Self::MonthlyTurnover,
            Self::YearOfRegistration,
            Self::StreetAddress,
            Self::HasPriorLoans,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::IncorporationType => "incorporation_type",
            Self::Sector => "sector",
            Self::Country => "country",
            Self::City => "city",
            Self::PostalCode => "postal_code",
            Self::YearlyTurnover => "yearly_turnover",
            Self::MonthlyTurnover => "monthly_turnover",
            Self::YearOfRegistration => "year_of_registration",
            Self::StreetAddress => "street_address",
            Self::HasPriorLoans => "has_prior_loans",
        }
    }

    pub const fn weight(self) -> u32 {
        match self {
            Self::Name | Self::IncorporationType => 4,
            Self::Description
            | Self::Sector
            | Self::Country
            | Self::YearlyTurnover
            | Self::MonthlyTurnover
            | Self::YearOfRegistration => 3,
            Self::City | Self::PostalCode | Self::StreetAddress | Self::HasPriorLoans => 2,
        }
    }

    pub fn total_weight() -> u32 {
        Self::ordered().into_iter().map(Self::weight).sum()
    }

    /// Postal codes are often short, so any non-blank value is accepted.
    const fn min_text_len(self) -> usize {
        match self {
            Self::PostalCode => 1,
            _ => 2,
        }
    }
}

/// A profile value as captured by the onboarding forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Empty,
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    /// Nested objects and anything else the forms send; kept but never counted.
    Other(serde_json::Value),
}

impl FieldValue {
    /// Whether the value fills `field`: flags always do, numbers unless NaN, text once it
    /// reaches the field's minimum length, lists when non-empty. Nested objects never do.
    pub fn satisfies(&self, field: ProfileField) -> bool {
        match self {
            FieldValue::Empty => false,
            FieldValue::Flag(_) => true,
            FieldValue::Number(value) => !value.is_nan(),
            FieldValue::Text(text) => text.trim().chars().count() >= field.min_text_len(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Other(_) => false,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Snapshot of an entrepreneur's business profile keyed by field id.
///
/// Keys outside [`ProfileField`] are kept so the snapshot round-trips, but they never count
/// towards completeness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessProfile {
    fields: BTreeMap<String, FieldValue>,
}

impl BusinessProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: ProfileField, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<FieldValue>) {
        self.fields.insert(field.key().to_string(), value.into());
    }

    pub fn get(&self, field: ProfileField) -> Option<&FieldValue> {
        self.fields.get(field.key())
    }

    pub fn is_satisfied(&self, field: ProfileField) -> bool {
        self.get(field)
            .map(|value| value.satisfies(field))
            .unwrap_or(false)
    }

    pub fn missing_fields(&self) -> Vec<ProfileField> {
        ProfileField::ordered()
            .into_iter()
            .filter(|field| !self.is_satisfied(*field))
            .collect()
    }

    pub fn incorporation_type(&self) -> Option<&str> {
        match self.get(ProfileField::IncorporationType) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }
}
