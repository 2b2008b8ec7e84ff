use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use crate::proposals::domain::{Proposal, ValidationMode};
use crate::proposals::evaluation::ProposalEvaluator;
use crate::proposals::validator::{
    AccessKey, CardNumberValidator, CardValidator, ListenerId, ValidationListener,
    ValidationListeners, ValidatorError,
};

pub(super) fn proposal(age: i32, income: impl Into<Decimal>, card_number: &str) -> Proposal {
    Proposal::new(1, "Maria Souza")
        .with_age(age)
        .with_income(income)
        .with_card_number(card_number)
}

/// How the recording validator answers `is_card_number_valid`.
#[derive(Clone)]
pub(super) enum Answer {
    Always(bool),
    Only(Vec<String>),
    Fail(ValidatorError),
}

#[derive(Default)]
struct Calls {
    checked: Vec<String>,
    reported: Vec<String>,
    key_reads: usize,
    modes: Vec<ValidationMode>,
}

/// Hand-rolled validator double recording every interaction with the evaluator.
pub(super) struct RecordingValidator {
    key: String,
    answer: Answer,
    sequence: Mutex<VecDeque<Result<bool, ValidatorError>>>,
    report: Option<bool>,
    notify_on_check: bool,
    supports_notifications: bool,
    listeners: ValidationListeners,
    calls: Mutex<Calls>,
}

impl Default for RecordingValidator {
    fn default() -> Self {
        Self {
            key: "OK".to_string(),
            answer: Answer::Always(true),
            sequence: Mutex::new(VecDeque::new()),
            report: None,
            notify_on_check: false,
            supports_notifications: true,
            listeners: ValidationListeners::new(),
            calls: Mutex::new(Calls::default()),
        }
    }
}

impl RecordingValidator {
    pub(super) fn valid() -> Self {
        Self::default()
    }

    pub(super) fn invalid() -> Self {
        Self::default().answering(Answer::Always(false))
    }

    pub(super) fn failing(message: &str) -> Self {
        Self::default().answering(Answer::Fail(ValidatorError::Unavailable(
            message.to_string(),
        )))
    }

    pub(super) fn answering(mut self, answer: Answer) -> Self {
        self.answer = answer;
        self
    }

    pub(super) fn accepting(self, numbers: &[&str]) -> Self {
        self.answering(Answer::Only(
            numbers.iter().map(|number| number.to_string()).collect(),
        ))
    }

    pub(super) fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// Queue answers consumed one per check before falling back to `answer`.
    pub(super) fn with_sequence(self, answers: Vec<Result<bool, ValidatorError>>) -> Self {
        *self.sequence.lock().expect("sequence mutex poisoned") = answers.into();
        self
    }

    /// Value written by `report_validity`; `None` leaves the slot untouched.
    pub(super) fn reporting(mut self, valid: Option<bool>) -> Self {
        self.report = valid;
        self
    }

    pub(super) fn notifying(mut self) -> Self {
        self.notify_on_check = true;
        self
    }

    pub(super) fn without_notifications(mut self) -> Self {
        self.supports_notifications = false;
        self
    }

    pub(super) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Raise the completion notification as the real validator would.
    pub(super) fn raise_validation_completed(&self) {
        self.listeners.notify();
    }

    pub(super) fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(super) fn checked_numbers(&self) -> Vec<String> {
        self.calls().checked.clone()
    }

    pub(super) fn reported_numbers(&self) -> Vec<String> {
        self.calls().reported.clone()
    }

    pub(super) fn key_reads(&self) -> usize {
        self.calls().key_reads
    }

    pub(super) fn modes(&self) -> Vec<ValidationMode> {
        self.calls().modes.clone()
    }

    pub(super) fn mode(&self) -> Option<ValidationMode> {
        self.calls().modes.last().copied()
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
        self.calls.lock().expect("calls mutex poisoned")
    }
}

impl CardNumberValidator for RecordingValidator {
    fn is_card_number_valid(&self, card_number: &str) -> Result<bool, ValidatorError> {
        self.calls().checked.push(card_number.to_string());

        let queued = self
            .sequence
            .lock()
            .expect("sequence mutex poisoned")
            .pop_front();
        let result = match queued {
            Some(result) => result,
            None => match &self.answer {
                Answer::Always(valid) => Ok(*valid),
                Answer::Only(numbers) => Ok(numbers.iter().any(|number| number == card_number)),
                Answer::Fail(err) => Err(err.clone()),
            },
        };

        if self.notify_on_check {
            self.listeners.notify();
        }
        result
    }

    fn report_validity(&self, card_number: &str, valid: &mut bool) -> Result<(), ValidatorError> {
        self.calls().reported.push(card_number.to_string());
        if let Answer::Fail(err) = &self.answer {
            return Err(err.clone());
        }
        if let Some(report) = self.report {
            *valid = report;
        }
        Ok(())
    }

    fn current_key(&self) -> String {
        self.calls().key_reads += 1;
        self.key.clone()
    }

    fn set_mode(&self, mode: ValidationMode) {
        self.calls().modes.push(mode);
    }

    fn subscribe(&self, listener: ValidationListener) -> Option<ListenerId> {
        if self.supports_notifications {
            Some(self.listeners.register(listener))
        } else {
            None
        }
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

pub(super) fn evaluator(
    validator: &Arc<RecordingValidator>,
) -> ProposalEvaluator<RecordingValidator> {
    ProposalEvaluator::new(Arc::clone(validator))
}

pub(super) struct StaticKey(pub(super) String);

impl AccessKey for StaticKey {
    fn key(&self) -> String {
        self.0.clone()
    }
}

/// Validator double whose key is reachable only through its access key object.
pub(super) struct NestedKeyValidator {
    access_key: StaticKey,
    valid: Result<bool, ValidatorError>,
    checked: Mutex<Vec<String>>,
}

impl NestedKeyValidator {
    pub(super) fn new(key: &str, valid: Result<bool, ValidatorError>) -> Self {
        Self {
            access_key: StaticKey(key.to_string()),
            valid,
            checked: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn checked_numbers(&self) -> Vec<String> {
        self.checked.lock().expect("checked mutex poisoned").clone()
    }
}

impl CardValidator for NestedKeyValidator {
    fn is_card_number_valid(&self, card_number: &str) -> Result<bool, ValidatorError> {
        self.checked
            .lock()
            .expect("checked mutex poisoned")
            .push(card_number.to_string());
        self.valid.clone()
    }

    fn access_key(&self) -> &dyn AccessKey {
        &self.access_key
    }
}
