//! Credit card proposal intake and evaluation.
//!
//! Evaluators consume a caller-supplied card-number validator; the validator's
//! algorithm and the origin of its access key stay outside this crate.

pub mod domain;
pub mod evaluation;
pub mod validator;


pub use domain::{Decision, Proposal, ProposalId, ValidationMode};
pub use evaluation::{
    AccessKeyEvaluator, EvaluationError, EvaluationSettings, EvaluationVariant,
    ProposalEvaluator, AUTOMATIC_DECISION_AGE_CEILING, FAST_VALIDATION_AGE_THRESHOLD,
    INCOME_LOWER_LIMIT, INCOME_UPPER_LIMIT,
};
pub use validator::{
    AccessKey, CardNumberValidator, CardValidator, ListenerId, ValidationListener,
    ValidationListeners, ValidatorError, EXPIRED_KEY,
};
