//! Football Value - odds normalization and expected-value evaluation
//!
//! This library provides:
//! - Margin-free 1X2 probabilities from decimal odds
//! - Over 2.5 goals, Both-Teams-To-Score and 1X2 expected-value evaluators
//! - An API-Football client for fixtures, odds and team statistics
//! - Typed match-winner markets and top-pick selection
//!
//! # Example
//!
//! ```
//! use football_value::evaluator::{evaluate_over25, Over25Input};
//!
//! let eval = evaluate_over25(&Over25Input {
//!     home_goals: 2.0,
//!     away_goals: 2.0,
//!     over25_pct: 50.0,
//!     odd: 1.9,
//!     offensive_absences: false,
//! })
//! .unwrap();
//! assert!(eval.is_favorable());
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod markets;
pub mod picks;
pub mod server;

// Re-export commonly used types
pub use api::{ApiFootballClient, FixtureRecord, OddsOffer, TeamStatistics};
pub use config::Config;
pub use error::{FetchError, OddsError};
pub use evaluator::{
    evaluate_btts, evaluate_over25, evaluate_result, evaluate_result_from_odds, normalize,
    BetEvaluation, BttsInput, OddsTriple, Outcome, Over25Input, ProbabilityTriple,
};
pub use markets::{top_picks, MatchWinnerOdds, Pick, PricedOutcome};
