pub mod loan_application;
pub mod onboarding;
pub mod roster;
