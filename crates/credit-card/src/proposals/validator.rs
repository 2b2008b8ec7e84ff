use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::ValidationMode;

/// Literal key value reported by a validator whose access key has expired.
pub const EXPIRED_KEY: &str = "EXPIRED";

/// Error raised by a card-number validator while checking a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidatorError {
    #[error("card validator unavailable: {0}")]
    Unavailable(String),
    #[error("card validator rejected the request: {0}")]
    Rejected(String),
    #[error("card validator failed: {0}")]
    Other(String),
}

/// Callback invoked each time a validator finishes a validation.
pub type ValidationListener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`CardNumberValidator::subscribe`] so the subscriber can detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Card-number validation capability consumed by
/// [`ProposalEvaluator`](super::evaluation::ProposalEvaluator).
///
/// The evaluator never inspects the mode after writing it and treats the key as
/// read-only. Notification support is optional: the default `subscribe` returns
/// `None` and the evaluator's counter then never moves.
pub trait CardNumberValidator: Send + Sync {
    fn is_card_number_valid(&self, card_number: &str) -> Result<bool, ValidatorError>;

    /// Output-slot form of [`is_card_number_valid`](Self::is_card_number_valid).
    fn report_validity(&self, card_number: &str, valid: &mut bool) -> Result<(), ValidatorError> {
        *valid = self.is_card_number_valid(card_number)?;
        Ok(())
    }

    fn current_key(&self) -> String;

    fn set_mode(&self, mode: ValidationMode);

    fn subscribe(&self, _listener: ValidationListener) -> Option<ListenerId> {
        None
    }

    fn unsubscribe(&self, _id: ListenerId) {}
}

/// Key holder exposed by validators that keep their access key in a nested object.
pub trait AccessKey: Send + Sync {
    fn key(&self) -> String;
}

/// Validator shape consumed by
/// [`AccessKeyEvaluator`](super::evaluation::AccessKeyEvaluator): the key lives
/// behind [`access_key`](Self::access_key) instead of on the validator itself.
pub trait CardValidator: Send + Sync {
    fn is_card_number_valid(&self, card_number: &str) -> Result<bool, ValidatorError>;

    fn report_validity(&self, card_number: &str, valid: &mut bool) -> Result<(), ValidatorError> {
        *valid = self.is_card_number_valid(card_number)?;
        Ok(())
    }

    fn access_key(&self) -> &dyn AccessKey;

    fn current_key(&self) -> String {
        self.access_key().key()
    }
}

/// Listener registry validator implementations embed to back `subscribe`/`unsubscribe`.
#[derive(Default)]
pub struct ValidationListeners {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<ListenerId, ValidationListener>>,
}

impl ValidationListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: ValidationListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().insert(id, listener);
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        self.lock().remove(&id).is_some()
    }

    /// Invoke every registered listener once, in registration order.
    pub fn notify(&self) {
        // Snapshot so a listener may unsubscribe without deadlocking.
        let listeners: Vec<ValidationListener> = self.lock().values().cloned().collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ListenerId, ValidationListener>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ValidationListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationListeners")
            .field("registered", &self.len())
            .finish()
    }
}
