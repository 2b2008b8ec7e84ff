use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::super::domain::{Decision, Proposal, ValidationMode};
use super::super::validator::EXPIRED_KEY;

/// Applicants at or below this age are never decided automatically.
pub const AUTOMATIC_DECISION_AGE_CEILING: i32 = 20;
/// Applicants older than this are validated in [`ValidationMode::Fast`].
pub const FAST_VALIDATION_AGE_THRESHOLD: i32 = 30;
/// Gross monthly income at or above this value is accepted outright.
pub const INCOME_UPPER_LIMIT: Decimal = dec!(100000);
/// Gross monthly income below this value is refused once the card checks out.
pub const INCOME_LOWER_LIMIT: Decimal = dec!(20000);

/// Rule that settled an evaluation, carried into the decision log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    HighIncome,
    ExpiredKey,
    InvalidCardNumber,
    ValidatorFailure,
    AgeCeiling,
    LowIncome,
    Fallthrough,
}

impl Rule {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Rule::HighIncome => "high_income",
            Rule::ExpiredKey => "expired_key",
            Rule::InvalidCardNumber => "invalid_card_number",
            Rule::ValidatorFailure => "validator_failure",
            Rule::AgeCeiling => "age_ceiling",
            Rule::LowIncome => "low_income",
            Rule::Fallthrough => "fallthrough",
        }
    }
}

pub(crate) fn accepts_on_income(proposal: &Proposal) -> bool {
    proposal.gross_monthly_income >= INCOME_UPPER_LIMIT
}

pub(crate) fn mode_for_age(age: i32) -> ValidationMode {
    if age > FAST_VALIDATION_AGE_THRESHOLD {
        ValidationMode::Fast
    } else {
        ValidationMode::Detailed
    }
}

pub(crate) fn is_expired_key(key: &str) -> bool {
    key == EXPIRED_KEY
}

/// Remaining rules once the card number has been checked.
pub(crate) fn decide_after_validation(proposal: &Proposal, card_valid: bool) -> (Decision, Rule) {
    if !card_valid {
        return (Decision::ManualReview, Rule::InvalidCardNumber);
    }

    if proposal.applicant_age <= AUTOMATIC_DECISION_AGE_CEILING {
        return (Decision::ManualReview, Rule::AgeCeiling);
    }

    if proposal.gross_monthly_income < INCOME_LOWER_LIMIT {
        return (Decision::AutomaticRefusal, Rule::LowIncome);
    }

    (Decision::ManualReview, Rule::Fallthrough)
}

pub(crate) fn record(proposal: &Proposal, decision: Decision, rule: Rule) -> Decision {
    debug!(
        proposal_id = %proposal.id,
        decision = decision.label(),
        rule = rule.label(),
        "proposal evaluated"
    );
    decision
}
