//! Weighted onboarding completeness score.
//!
//! The score starts from a base of 20 and adds 40% of the profile sub-score and 40% of the
//! document sub-score, capped at 100. This is the only completion formula in the crate; list
//! views and detail views both use it.

use serde::Serialize;

use super::documents::{DocumentType, IncorporationFamily, UploadedDocuments};
use super::profile::{BusinessProfile, ProfileField};

pub const BASE_SCORE: u32 = 20;
const SUB_SCORE_SHARE: f64 = 0.4;

/// Percentage of the weighted profile fields that are filled, rounded.
pub fn profile_score(profile: Option<&BusinessProfile>) -> u32 {
    let Some(profile) = profile else {
        return 0;
    };

    let satisfied: u32 = ProfileField::ordered()
        .into_iter()
        .filter(|field| profile.is_satisfied(*field))
        .map(ProfileField::weight)
        .sum();

    (f64::from(satisfied) / f64::from(ProfileField::total_weight()) * 100.0).round() as u32
}

/// Percentage of the family's required document weight that has been uploaded.
pub fn document_score(family: IncorporationFamily, uploaded: &UploadedDocuments) -> f64 {
    let total = family.total_weight();
    if total == 0 {
        return 0.0;
    }

    let satisfied: u32 = family
        .requirements()
        .iter()
        .filter(|doc| uploaded.contains(&doc.document_type))
        .map(|doc| doc.weight)
        .sum();

    f64::from(satisfied) / f64::from(total) * 100.0
}

fn combine(profile_score: u32, document_score: f64) -> u8 {
    let profile_share = (f64::from(profile_score) * SUB_SCORE_SHARE).round() as u32;
    let document_share = (document_score * SUB_SCORE_SHARE).round() as u32;
    (BASE_SCORE + profile_share + document_share).min(100) as u8
}

/// Onboarding completeness for an entrepreneur, from 0 to 100.
pub fn completion_percentage(
    incorporation_type: &str,
    profile: Option<&BusinessProfile>,
    uploaded: &UploadedDocuments,
) -> u8 {
    let family = IncorporationFamily::resolve(incorporation_type).family;
    combine(profile_score(profile), document_score(family, uploaded))
}

/// Completion score with the inputs that produced it, for progress bars and checklists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionBreakdown {
    pub family: IncorporationFamily,
    pub family_fallback: bool,
    pub profile_score: u32,
    pub document_score: u32,
    pub percentage: u8,
    pub missing_fields: Vec<ProfileField>,
    pub missing_documents: Vec<DocumentType>,
}

pub fn completion_breakdown(
    incorporation_type: &str,
    profile: Option<&BusinessProfile>,
    uploaded: &UploadedDocuments,
) -> CompletionBreakdown {
    let resolved = IncorporationFamily::resolve(incorporation_type);
    let profile_score = profile_score(profile);
    let document_score = document_score(resolved.family, uploaded);

    let missing_fields = match profile {
        Some(profile) => profile.missing_fields(),
        None => ProfileField::ordered().to_vec(),
    };
    let missing_documents = resolved
        .family
        .requirements()
        .iter()
        .map(|doc| doc.document_type)
        .filter(|doc| !uploaded.contains(doc))
        .collect();

    CompletionBreakdown {
        family: resolved.family,
        family_fallback: resolved.fallback,
        profile_score,
        document_score: document_score.round() as u32,
        percentage: combine(profile_score, document_score),
        missing_fields,
        missing_documents,
    }
}
