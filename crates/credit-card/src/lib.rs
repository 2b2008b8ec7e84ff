//! Credit card proposal classifier.
//!
//! [`proposals::ProposalEvaluator`] maps a [`proposals::Proposal`] to a
//! [`proposals::Decision`] using fixed income and age thresholds plus an injected
//! card-number validator.

pub mod config;
pub mod error;
pub mod proposals;
pub mod telemetry;
