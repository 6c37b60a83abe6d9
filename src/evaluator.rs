//! Odds normalization and expected-value evaluation
//!
//! Decimal odds are turned into implied probabilities (1 / odd), the
//! bookmaker margin is removed by rescaling the three 1X2 probabilities so
//! they sum to 1, and each market is scored with:
//!
//! ```text
//! EV = p * odd - 1
//!
//! Where:
//!     p   = estimated probability of the outcome (clamped to [0, 1])
//!     odd = decimal odds (e.g. 2.0 pays back twice the stake)
//! ```
//!
//! A positive EV marks a bet that wins on average under the assumed
//! probability. The Over 2.5 and BTTS probabilities come from fixed-weight
//! heuristics; their constants are empirical and kept as-is.
//!
//! Every function here is pure and synchronous.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::OddsError;

/// Goal average above which a matchup counts as high scoring.
pub const HIGH_SCORING_AVERAGE: f64 = 1.8;
pub const HIGH_SCORING_BONUS: f64 = 0.05;
pub const OFFENSIVE_ABSENCE_PENALTY: f64 = 0.07;
pub const LOW_SCORING_PENALTY: f64 = 0.07;
pub const STRONG_DEFENSE_PENALTY: f64 = 0.05;
pub const OPEN_DEFENSE_BONUS: f64 = 0.03;

pub const OVER25_LABEL: &str = "Over 2.5";
pub const BTTS_LABEL: &str = "BTTS";

/// One of the three mutually exclusive 1X2 outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// Fixed evaluation order.
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Home => "Home",
            Outcome::Draw => "Draw",
            Outcome::Away => "Away",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated home/draw/away decimal odds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OddsTriple {
    home: f64,
    draw: f64,
    away: f64,
}

impl OddsTriple {
    /// Fails with `InvalidOdds` on the first odd that is not a finite
    /// number greater than 0, or whose implied probability overflows.
    pub fn new(home: f64, draw: f64, away: f64) -> Result<Self, OddsError> {
        for (outcome, odd) in Outcome::ALL.into_iter().zip([home, draw, away]) {
            if !is_valid_odd(odd) {
                return Err(OddsError::invalid_outcome(outcome, odd));
            }
        }
        let odds = Self { home, draw, away };
        // Reciprocals near f64::MAX can still overflow once summed
        if !odds.implied_total().is_finite() {
            let shortest = Outcome::ALL
                .into_iter()
                .min_by(|a, b| odds.get(*a).total_cmp(&odds.get(*b)))
                .unwrap_or(Outcome::Home);
            return Err(OddsError::invalid_outcome(shortest, odds.get(shortest)));
        }
        Ok(odds)
    }

    pub fn home(&self) -> f64 {
        self.home
    }

    pub fn draw(&self) -> f64 {
        self.draw
    }

    pub fn away(&self) -> f64 {
        self.away
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    /// Sum of raw implied probabilities.
    pub fn implied_total(&self) -> f64 {
        1.0 / self.home + 1.0 / self.draw + 1.0 / self.away
    }

    /// Bookmaker margin: how far the implied probabilities exceed 1.
    pub fn overround(&self) -> f64 {
        self.implied_total() - 1.0
    }

    /// Margin-free probabilities, same order as the odds.
    pub fn normalize(&self) -> ProbabilityTriple {
        let total = self.implied_total();
        ProbabilityTriple {
            home: (1.0 / self.home) / total,
            draw: (1.0 / self.draw) / total,
            away: (1.0 / self.away) / total,
        }
    }
}

/// Home/draw/away probabilities summing to 1. Only obtainable by
/// normalizing an [`OddsTriple`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityTriple {
    home: f64,
    draw: f64,
    away: f64,
}

impl ProbabilityTriple {
    pub fn home(&self) -> f64 {
        self.home
    }

    pub fn draw(&self) -> f64 {
        self.draw
    }

    pub fn away(&self) -> f64 {
        self.away
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }
}

/// Scored bet: what was evaluated, at which probability and odd, and its EV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetEvaluation {
    pub label: String,
    pub probability: f64,
    pub odd: f64,
    pub expected_value: f64,
}

impl BetEvaluation {
    fn new(label: impl Into<String>, probability: f64, odd: f64) -> Self {
        Self {
            label: label.into(),
            probability,
            odd,
            expected_value: expected_value(probability, odd),
        }
    }

    pub fn is_favorable(&self) -> bool {
        self.expected_value > 0.0
    }
}

/// Inputs for the Over 2.5 goals heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Over25Input {
    /// Home side's average goals.
    pub home_goals: f64,
    /// Away side's average goals.
    pub away_goals: f64,
    /// Share of matches with more than 2.5 goals, 0-100.
    pub over25_pct: f64,
    pub odd: f64,
    #[serde(default)]
    pub offensive_absences: bool,
}

/// Inputs for the Both-Teams-To-Score heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BttsInput {
    /// Share of home matches in which the home side scored, 0-100.
    pub home_pct: f64,
    /// Share of away matches in which the away side scored, 0-100.
    pub away_pct: f64,
    pub odd: f64,
    #[serde(default)]
    pub low_scoring: bool,
    #[serde(default)]
    pub strong_defense: bool,
}

/// Finite, positive, and with a finite implied probability.
fn is_valid_odd(odd: f64) -> bool {
    odd.is_finite() && odd > 0.0 && (1.0 / odd).is_finite()
}

/// Clamp to [0, 1]; NaN counts as 0.
fn clamp_probability(prob: f64) -> f64 {
    if prob.is_nan() {
        0.0
    } else {
        prob.clamp(0.0, 1.0)
    }
}

fn validate_odd(label: &str, odd: f64) -> Result<f64, OddsError> {
    if is_valid_odd(odd) {
        Ok(odd)
    } else {
        Err(OddsError::invalid(label, odd))
    }
}

/// EV per unit staked.
///
/// # Examples
/// ```
/// use football_value::evaluator::expected_value;
/// let ev = expected_value(0.5, 2.5);
/// assert!((ev - 0.25).abs() < 1e-12);
/// ```
pub fn expected_value(probability: f64, odd: f64) -> f64 {
    probability * odd - 1.0
}

/// Normalize raw 1X2 odds into fair probabilities.
///
/// # Examples
/// ```
/// use football_value::evaluator::normalize;
/// let probs = normalize(2.0, 3.0, 4.0).unwrap();
/// assert!((probs.home() - 0.4615).abs() < 1e-4);
/// ```
pub fn normalize(home: f64, draw: f64, away: f64) -> Result<ProbabilityTriple, OddsError> {
    Ok(OddsTriple::new(home, draw, away)?.normalize())
}

/// Over 2.5 goals heuristic.
pub fn evaluate_over25(input: &Over25Input) -> Result<BetEvaluation, OddsError> {
    let odd = validate_odd(OVER25_LABEL, input.odd)?;

    let goal_average = (input.home_goals + input.away_goals) / 2.0;
    let mut prob = input.over25_pct / 100.0;

    if goal_average > HIGH_SCORING_AVERAGE {
        prob += HIGH_SCORING_BONUS;
    }
    if input.offensive_absences {
        prob -= OFFENSIVE_ABSENCE_PENALTY;
    }

    Ok(BetEvaluation::new(OVER25_LABEL, clamp_probability(prob), odd))
}

/// Both-Teams-To-Score heuristic.
pub fn evaluate_btts(input: &BttsInput) -> Result<BetEvaluation, OddsError> {
    let odd = validate_odd(BTTS_LABEL, input.odd)?;

    let mut prob = ((input.home_pct + input.away_pct) / 2.0) / 100.0;

    if input.low_scoring {
        prob -= LOW_SCORING_PENALTY;
    }
    // Exactly one of the defensive adjustments always applies
    if input.strong_defense {
        prob -= STRONG_DEFENSE_PENALTY;
    } else {
        prob += OPEN_DEFENSE_BONUS;
    }

    Ok(BetEvaluation::new(BTTS_LABEL, clamp_probability(prob), odd))
}

/// Score each 1X2 outcome, in home/draw/away order.
pub fn evaluate_result(probs: &ProbabilityTriple, odds: &OddsTriple) -> Vec<BetEvaluation> {
    Outcome::ALL
        .into_iter()
        .map(|outcome| BetEvaluation::new(outcome.label(), probs.get(outcome), odds.get(outcome)))
        .collect()
}

/// Normalize then score; the usual path when all you have is the odds.
pub fn evaluate_result_from_odds(
    home: f64,
    draw: f64,
    away: f64,
) -> Result<Vec<BetEvaluation>, OddsError> {
    let odds = OddsTriple::new(home, draw, away)?;
    Ok(evaluate_result(&odds.normalize(), &odds))
}
