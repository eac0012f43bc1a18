//! Property tests for the loan application transition table.

use proptest::prelude::*;

use sme_lending::workflows::loan_application::{
    actions_for_raw, apply, available_actions, LoanApplicationStatus, WorkflowAction,
};

fn status() -> impl Strategy<Value = LoanApplicationStatus> {
    proptest::sample::select(LoanApplicationStatus::ordered().to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `actions_for_raw` never panics and always offers something for unknown input.
    #[test]
    fn property_raw_status_lookup_is_total(raw in ".{0,32}") {
        let actions = actions_for_raw(&raw);
        match raw.parse::<LoanApplicationStatus>() {
            Ok(status) => {
                prop_assert_eq!(actions, available_actions(status));
            }
            Err(_) => {
                prop_assert_eq!(actions.len(), 1);
                prop_assert_eq!(actions[0].action, WorkflowAction::AddNote);
            }
        }
    }

    /// PROPERTY: `apply` agrees with the table for every offered action.
    #[test]
    fn property_apply_matches_offered_actions(status in status()) {
        for transition in available_actions(status) {
            prop_assert_eq!(
                apply(status, transition.action).ok(),
                Some(transition.resulting_status)
            );
        }
    }

    /// PROPERTY: padded or upper-cased status strings resolve to the same row.
    #[test]
    fn property_status_parsing_ignores_case_and_padding(status in status(), pad in " {0,3}") {
        let raw = format!("{pad}{}{pad}", status.as_str().to_ascii_uppercase());
        prop_assert_eq!(actions_for_raw(&raw), available_actions(status));
    }
}
