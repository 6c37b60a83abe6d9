use thiserror::Error;

use crate::evaluator::Outcome;

/// Rejected input to the normalizer or one of the market evaluators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OddsError {
    #[error("invalid odds for {outcome}: {odd} (decimal odds must be finite and greater than 0)")]
    InvalidOdds { outcome: String, odd: f64 },
}

impl OddsError {
    pub(crate) fn invalid(outcome: impl Into<String>, odd: f64) -> Self {
        OddsError::InvalidOdds {
            outcome: outcome.into(),
            odd,
        }
    }

    pub(crate) fn invalid_outcome(outcome: Outcome, odd: f64) -> Self {
        Self::invalid(outcome.label(), odd)
    }
}

/// Failure talking to API-Football.
///
/// Everything other than a missing key collapses into `Failed`, which keeps
/// the underlying cause (and its context chain) attached.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("missing API-Football key: set API_FOOTBALL_KEY or mount a secret at {secret_path}")]
    MissingCredential { secret_path: String },

    #[error("fetch failed: {0:#}")]
    Failed(#[from] anyhow::Error),
}

impl FetchError {
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, FetchError::MissingCredential { .. })
    }
}
