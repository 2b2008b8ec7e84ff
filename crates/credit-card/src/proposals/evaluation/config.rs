use serde::{Deserialize, Serialize};

/// Call shape picked by `ProposalEvaluator::evaluate_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationVariant {
    Standard,
    Guarded,
}

/// Dials selecting how an evaluator consumes its validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSettings {
    /// Map validator failures to manual review instead of returning them.
    pub guard_validator_failures: bool,
}

impl EvaluationSettings {
    pub fn guarded() -> Self {
        Self {
            guard_validator_failures: true,
        }
    }

    pub fn default_variant(&self) -> EvaluationVariant {
        if self.guard_validator_failures {
            EvaluationVariant::Guarded
        } else {
            EvaluationVariant::Standard
        }
    }
}
