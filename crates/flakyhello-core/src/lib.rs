//! flakyhello core: transport-agnostic error types and the outcome decision.
//!
//! This crate defines what a greeting request resolves to (success or a
//! simulated failure) and the error surface shared with the server crate. It
//! carries no HTTP or runtime dependencies so the decision logic can be tested
//! on its own.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod outcome;

/// Shared result type.
pub use error::{HelloError, Result};
pub use outcome::{FixedOutcome, Outcome, OutcomeSource, RandomOutcome, FAILURE_RATE};
