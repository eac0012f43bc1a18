//! Property tests for the onboarding completion score.

use proptest::prelude::*;

use sme_lending::workflows::onboarding::{
    completion_percentage, BusinessProfile, DocumentType, FieldValue, ProfileField,
    UploadedDocuments,
};

const INCORPORATION_TYPES: &[&str] = &[
    "sole-proprietorship",
    "partnership",
    "private-limited-company",
    "cooperative",
    "",
];

fn incorporation_type() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(INCORPORATION_TYPES).prop_map(str::to_string),
        "[a-z -]{0,24}",
    ]
}

fn field_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        Just(FieldValue::Empty),
        any::<bool>().prop_map(FieldValue::Flag),
        any::<f64>().prop_map(FieldValue::Number),
        ".{0,12}".prop_map(FieldValue::Text),
        proptest::collection::vec(".{0,4}".prop_map(FieldValue::Text), 0..3)
            .prop_map(FieldValue::List),
    ]
}

fn profile() -> impl Strategy<Value = BusinessProfile> {
    proptest::collection::vec(proptest::option::of(field_value()), 12).prop_map(|values| {
        let mut profile = BusinessProfile::new();
        for (field, value) in ProfileField::ordered().into_iter().zip(values) {
            if let Some(value) = value {
                profile.set(field, value);
            }
        }
        profile
    })
}

fn documents() -> impl Strategy<Value = UploadedDocuments> {
    proptest::sample::subsequence(DocumentType::ordered().to_vec(), 0..=11)
        .prop_map(|docs| docs.into_iter().collect())
}

fn satisfying_value(field: ProfileField) -> FieldValue {
    match field {
        ProfileField::HasPriorLoans => FieldValue::Flag(true),
        ProfileField::YearlyTurnover
        | ProfileField::MonthlyTurnover
        | ProfileField::YearOfRegistration => FieldValue::Number(2020.0),
        _ => FieldValue::Text("Nairobi".to_string()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the score always lands between the base score and 100.
    #[test]
    fn property_score_is_bounded(
        incorporation in incorporation_type(),
        profile in proptest::option::of(profile()),
        uploaded in documents(),
    ) {
        let percentage = completion_percentage(&incorporation, profile.as_ref(), &uploaded);
        prop_assert!((20..=100).contains(&percentage), "got {percentage}");
    }

    /// PROPERTY: satisfying one more profile field never lowers the score.
    #[test]
    fn property_filling_a_field_never_lowers_the_score(
        incorporation in incorporation_type(),
        profile in profile(),
        uploaded in documents(),
        field_index in 0usize..12,
    ) {
        let field = ProfileField::ordered()[field_index];
        let before = completion_percentage(&incorporation, Some(&profile), &uploaded);

        let improved = profile.clone().with(field, satisfying_value(field));
        let after = completion_percentage(&incorporation, Some(&improved), &uploaded);

        prop_assert!(after >= before, "{field:?}: {before} -> {after}");
    }

    /// PROPERTY: uploading one more document never lowers the score.
    #[test]
    fn property_uploading_a_document_never_lowers_the_score(
        incorporation in incorporation_type(),
        profile in proptest::option::of(profile()),
        uploaded in documents(),
        document_index in 0usize..11,
    ) {
        let document = DocumentType::ordered()[document_index];
        let before = completion_percentage(&incorporation, profile.as_ref(), &uploaded);

        let mut more = uploaded.clone();
        more.insert(document);
        let after = completion_percentage(&incorporation, profile.as_ref(), &more);

        prop_assert!(after >= before, "{document}: {before} -> {after}");
    }

    /// PROPERTY: arbitrary incorporation strings never panic.
    #[test]
    fn property_any_incorporation_type_is_scored(raw in ".{0,64}") {
        let percentage = completion_percentage(&raw, None, &UploadedDocuments::new());
        prop_assert_eq!(percentage, 20);
    }
}
