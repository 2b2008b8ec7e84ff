mod config;
mod policy;

pub use config::{EvaluationSettings, EvaluationVariant};
pub use policy::{
    AUTOMATIC_DECISION_AGE_CEILING, FAST_VALIDATION_AGE_THRESHOLD, INCOME_LOWER_LIMIT,
    INCOME_UPPER_LIMIT,
};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use policy::{
    accepts_on_income, decide_after_validation, is_expired_key, mode_for_age, record, Rule,
};
use tracing::{debug, warn};

use super::domain::{Decision, Proposal};
use super::validator::{CardNumberValidator, CardValidator, ListenerId, ValidatorError};

/// Error raised while building or running an evaluator.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("a card number validator is required")]
    MissingValidator,
    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

/// Evaluator bound to a flat [`CardNumberValidator`].
///
/// On construction it subscribes to the validator's completion notification and
/// counts every notification until it is detached or dropped.
pub struct ProposalEvaluator<V: CardNumberValidator + ?Sized> {
    validator: Arc<V>,
    validations: Arc<AtomicU64>,
    subscription: Option<ListenerId>,
}

impl<V: CardNumberValidator + ?Sized> ProposalEvaluator<V> {
    pub fn new(validator: Arc<V>) -> Self {
        let validations = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&validations);
        let subscription = validator.subscribe(Arc::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        }));

        Self {
            validator,
            validations,
            subscription,
        }
    }

    pub fn try_new(validator: Option<Arc<V>>) -> Result<Self, EvaluationError> {
        validator
            .map(Self::new)
            .ok_or(EvaluationError::MissingValidator)
    }

    pub fn validator(&self) -> &Arc<V> {
        &self.validator
    }

    /// Number of completion notifications received while subscribed.
    pub fn validation_count(&self) -> u64 {
        self.validations.load(Ordering::Relaxed)
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop counting notifications. The count reached so far is kept.
    pub fn detach(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.validator.unsubscribe(id);
        }
    }

    /// Evaluate a proposal, returning any validator failure to the caller.
    pub fn evaluate(&self, proposal: &Proposal) -> Result<Decision, ValidatorError> {
        if let Some(decision) = self.screen(proposal) {
            return Ok(decision);
        }

        let card_valid = self.validator.is_card_number_valid(&proposal.card_number)?;
        let (decision, rule) = decide_after_validation(proposal, card_valid);
        Ok(record(proposal, decision, rule))
    }

    /// Evaluate a proposal, sending it to manual review when the validator returns an error.
    ///
    /// Only `Err` results are recovered; a validator that panics still unwinds through here.
    pub fn evaluate_guarded(&self, proposal: &Proposal) -> Decision {
        if let Some(decision) = self.screen(proposal) {
            return decision;
        }

        match self.validator.is_card_number_valid(&proposal.card_number) {
            Ok(card_valid) => {
                let (decision, rule) = decide_after_validation(proposal, card_valid);
                record(proposal, decision, rule)
            }
            Err(err) => {
                warn!(
                    proposal_id = %proposal.id,
                    error = %err,
                    "card validation failed; routing proposal to manual review"
                );
                record(proposal, Decision::ManualReview, Rule::ValidatorFailure)
            }
        }
    }

    /// Evaluate through the validator's output-slot entry point.
    ///
    /// Mode assignment and the key check are not part of this path.
    pub fn evaluate_reported(&self, proposal: &Proposal) -> Result<Decision, ValidatorError> {
        if accepts_on_income(proposal) {
            return Ok(record(proposal, Decision::AutomaticAcceptance, Rule::HighIncome));
        }

        let mut card_valid = false;
        self.validator
            .report_validity(&proposal.card_number, &mut card_valid)?;
        let (decision, rule) = decide_after_validation(proposal, card_valid);
        Ok(record(proposal, decision, rule))
    }

    /// Dispatch to [`evaluate`](Self::evaluate) or
    /// [`evaluate_guarded`](Self::evaluate_guarded) per the settings.
    pub fn evaluate_with(
        &self,
        settings: &EvaluationSettings,
        proposal: &Proposal,
    ) -> Result<Decision, ValidatorError> {
        match settings.default_variant() {
            EvaluationVariant::Standard => self.evaluate(proposal),
            EvaluationVariant::Guarded => Ok(self.evaluate_guarded(proposal)),
        }
    }

    // Income screen, mode assignment and key check shared by the standard and guarded paths.
    fn screen(&self, proposal: &Proposal) -> Option<Decision> {
        if accepts_on_income(proposal) {
            return Some(record(proposal, Decision::AutomaticAcceptance, Rule::HighIncome));
        }

        let mode = mode_for_age(proposal.applicant_age);
        debug!(proposal_id = %proposal.id, mode = mode.label(), "validation mode assigned");
        self.validator.set_mode(mode);

        if is_expired_key(&self.validator.current_key()) {
            return Some(record(proposal, Decision::ManualReview, Rule::ExpiredKey));
        }

        None
    }
}

impl<V: CardNumberValidator + ?Sized> Drop for ProposalEvaluator<V> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Evaluator bound to a [`CardValidator`] whose key sits behind a nested access key.
///
/// No validation mode is written on this path.
pub struct AccessKeyEvaluator<C: CardValidator + ?Sized> {
    validator: Arc<C>,
}

impl<C: CardValidator + ?Sized> AccessKeyEvaluator<C> {
    pub fn new(validator: Arc<C>) -> Self {
        Self { validator }
    }

    pub fn try_new(validator: Option<Arc<C>>) -> Result<Self, EvaluationError> {
        validator
            .map(Self::new)
            .ok_or(EvaluationError::MissingValidator)
    }

    pub fn validator(&self) -> &Arc<C> {
        &self.validator
    }

    pub fn evaluate(&self, proposal: &Proposal) -> Result<Decision, ValidatorError> {
        if accepts_on_income(proposal) {
            return Ok(record(proposal, Decision::AutomaticAcceptance, Rule::HighIncome));
        }

        if is_expired_key(&self.validator.current_key()) {
            return Ok(record(proposal, Decision::ManualReview, Rule::ExpiredKey));
        }

        let card_valid = self.validator.is_card_number_valid(&proposal.card_number)?;
        let (decision, rule) = decide_after_validation(proposal, card_valid);
        Ok(record(proposal, decision, rule))
    }
}
