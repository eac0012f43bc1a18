use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct RosterRow {
    #[serde(rename = "Entrepreneur ID")]
    pub(crate) entrepreneur_id: String,
    #[serde(rename = "Business Name", default, deserialize_with = "empty_string_as_none")]
    pub(crate) business_name: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "empty_string_as_none")]
    pub(crate) description: Option<String>,
    #[serde(
        rename = "Incorporation Type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) incorporation_type: Option<String>,
    #[serde(rename = "Sector", default, deserialize_with = "empty_string_as_none")]
    pub(crate) sector: Option<String>,
    #[serde(rename = "Country", default, deserialize_with = "empty_string_as_none")]
    pub(crate) country: Option<String>,
    #[serde(rename = "City", default, deserialize_with = "empty_string_as_none")]
    pub(crate) city: Option<String>,
    #[serde(rename = "Postal Code", default, deserialize_with = "empty_string_as_none")]
    pub(crate) postal_code: Option<String>,
    #[serde(
        rename = "Yearly Turnover",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) yearly_turnover: Option<String>,
    #[serde(
        rename = "Monthly Turnover",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) monthly_turnover: Option<String>,
    #[serde(
        rename = "Year Of Registration",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) year_of_registration: Option<String>,
    #[serde(
        rename = "Street Address",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) street_address: Option<String>,
    #[serde(
        rename = "Has Prior Loans",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) has_prior_loans: Option<String>,
    #[serde(rename = "Documents", default, deserialize_with = "empty_string_as_none")]
    pub(crate) documents: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RosterRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    csv_reader.deserialize::<RosterRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Parse a spreadsheet number, tolerating thousands separators. Unparseable values become NaN
/// so they stay visible as "present but invalid".
pub(crate) fn parse_amount(raw: &str) -> f64 {
    raw.trim().replace(',', "").parse::<f64>().unwrap_or(f64::NAN)
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}
