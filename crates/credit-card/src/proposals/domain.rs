use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted proposals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub i32);

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proposal-{:06}", self.0)
    }
}

/// Applicant snapshot handed to the evaluator.
///
/// Nothing is enforced at construction: an unset age or income stays at zero and an
/// unset card number stays empty, and the evaluator works through those values like
/// any others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub applicant_name: String,
    pub applicant_age: i32,
    pub gross_monthly_income: Decimal,
    pub card_number: String,
}

impl Proposal {
    pub fn new(id: i32, applicant_name: impl Into<String>) -> Self {
        Self {
            id: ProposalId(id),
            applicant_name: applicant_name.into(),
            ..Self::default()
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.applicant_age = age;
        self
    }

    pub fn with_income(mut self, income: impl Into<Decimal>) -> Self {
        self.gross_monthly_income = income.into();
        self
    }

    pub fn with_card_number(mut self, card_number: impl Into<String>) -> Self {
        self.card_number = card_number.into();
        self
    }
}

/// Outcome of a single evaluation.
///
/// `Unknown` only exists as an initialization sentinel; no rule produces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    #[default]
    Unknown,
    AutomaticAcceptance,
    AutomaticRefusal,
    ManualReview,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::Unknown => "unknown",
            Decision::AutomaticAcceptance => "automatic_acceptance",
            Decision::AutomaticRefusal => "automatic_refusal",
            Decision::ManualReview => "manual_review",
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Decision::Unknown => "decision not yet made".to_string(),
            Decision::AutomaticAcceptance => "proposal accepted automatically".to_string(),
            Decision::AutomaticRefusal => "proposal refused automatically".to_string(),
            Decision::ManualReview => "requires manual review".to_string(),
        }
    }

    pub fn is_automatic(self) -> bool {
        matches!(
            self,
            Decision::AutomaticAcceptance | Decision::AutomaticRefusal
        )
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hint written to the validator before a card number is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    Fast,
    Detailed,
}

impl ValidationMode {
    pub const fn label(self) -> &'static str {
        match self {
            ValidationMode::Fast => "fast",
            ValidationMode::Detailed => "detailed",
        }
    }
}
