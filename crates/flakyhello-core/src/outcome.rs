//! Outcome decision for greeting requests.
//!
//! A request either succeeds or hits a simulated failure. The decision is
//! behind [`OutcomeSource`] so the server can be driven deterministically in
//! tests while production draws from a uniform RNG.

use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Fraction of requests that fail on purpose.
pub const FAILURE_RATE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    SimulatedFailure,
}

impl Outcome {
    /// Failure iff `sample` falls strictly below `threshold`.
    pub fn from_sample(sample: f64, threshold: f64) -> Self {
        if sample < threshold {
            Outcome::SimulatedFailure
        } else {
            Outcome::Success
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::SimulatedFailure)
    }
}

/// Decides the outcome of one request.
pub trait OutcomeSource: Send + Sync {
    fn draw(&self) -> Outcome;
}

/// Uniform draw in `[0, 1)` compared against a threshold.
pub struct RandomOutcome {
    threshold: f64,
    rng: Mutex<StdRng>,
}

impl RandomOutcome {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic sequence, for statistical tests.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            threshold: FAILURE_RATE,
            rng: Mutex::new(rng),
        }
    }

    fn sample(&self) -> f64 {
        // A poisoned lock still holds a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen::<f64>()
    }
}

impl Default for RandomOutcome {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeSource for RandomOutcome {
    fn draw(&self) -> Outcome {
        Outcome::from_sample(self.sample(), self.threshold)
    }
}

/// Always yields the same outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub Outcome);

impl OutcomeSource for FixedOutcome {
    fn draw(&self) -> Outcome {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_boundary_is_success() {
        assert_eq!(Outcome::from_sample(0.2, FAILURE_RATE), Outcome::Success);
        assert_eq!(Outcome::from_sample(0.0, FAILURE_RATE), Outcome::SimulatedFailure);
        assert_eq!(Outcome::from_sample(0.1999, FAILURE_RATE), Outcome::SimulatedFailure);
        assert_eq!(Outcome::from_sample(0.9999, FAILURE_RATE), Outcome::Success);
    }

    #[test]
    fn seeded_failure_rate_converges() {
        let src = RandomOutcome::seeded(42);
        let n = 10_000;
        let failures = (0..n).filter(|_| src.draw().is_failure()).count();
        let rate = failures as f64 / n as f64;
        assert!((rate - FAILURE_RATE).abs() < 0.02, "rate was {rate}");
    }

    #[test]
    fn threshold_extremes() {
        let never = RandomOutcome::seeded(1).with_threshold(0.0);
        let always = RandomOutcome::seeded(1).with_threshold(1.0);
        for _ in 0..1_000 {
            assert_eq!(never.draw(), Outcome::Success);
            assert_eq!(always.draw(), Outcome::SimulatedFailure);
        }
    }

    #[test]
    fn fixed_source_repeats() {
        let src = FixedOutcome(Outcome::SimulatedFailure);
        assert!(src.draw().is_failure());
        assert!(src.draw().is_failure());
        assert_eq!(RandomOutcome::new().threshold(), FAILURE_RATE);
    }
}
