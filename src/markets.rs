//! Typed 1X2 markets built from raw bookmaker offers, and the
//! "top picks" selection over them.

use serde::Serialize;
use std::cmp::Ordering;

use crate::api::{Bet, OddsOffer};
use crate::error::OddsError;
use crate::evaluator::{evaluate_result, BetEvaluation, OddsTriple, Outcome};

/// Market names API-Football uses for the three-way result market
pub const MATCH_WINNER_MARKETS: [&str; 2] = ["Match Winner", "1X2"];

pub fn is_match_winner_bet(name: &str) -> bool {
    MATCH_WINNER_MARKETS.iter().any(|market| *market == name)
}

/// An outcome label and its decimal odd
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedOutcome {
    pub label: String,
    pub odd: f64,
}

/// A complete home/draw/away market.
///
/// Labels are the team names (or "Draw"), whatever the bookmaker called
/// the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchWinnerOdds {
    pub home: PricedOutcome,
    pub draw: PricedOutcome,
    pub away: PricedOutcome,
}

impl MatchWinnerOdds {
    /// Build from one bet. Values may be labeled with the team names or
    /// with "Home"/"Away". `None` unless all three outcomes carry a
    /// parseable odd.
    pub fn from_bet(bet: &Bet, home_team: &str, away_team: &str) -> Option<Self> {
        if !is_match_winner_bet(&bet.name) {
            return None;
        }

        // First matching value wins if a label is ever repeated
        let find = |aliases: &[&str], display: &str| {
            bet.values
                .iter()
                .find(|v| aliases.iter().any(|alias| *alias == v.value))
                .and_then(|v| v.odd)
                .map(|odd| PricedOutcome {
                    label: display.to_string(),
                    odd,
                })
        };

        Some(Self {
            home: find(&[home_team, "Home"], home_team)?,
            draw: find(&["Draw"], "Draw")?,
            away: find(&[away_team, "Away"], away_team)?,
        })
    }

    pub fn get(&self, outcome: Outcome) -> &PricedOutcome {
        match outcome {
            Outcome::Home => &self.home,
            Outcome::Draw => &self.draw,
            Outcome::Away => &self.away,
        }
    }

    pub fn odds_triple(&self) -> Result<OddsTriple, OddsError> {
        OddsTriple::new(self.home.odd, self.draw.odd, self.away.odd)
    }

    /// Normalize and score the three outcomes, labeled by team name
    pub fn evaluate(&self) -> Result<Vec<BetEvaluation>, OddsError> {
        let odds = self.odds_triple()?;
        let mut evaluations = evaluate_result(&odds.normalize(), &odds);
        for (evaluation, outcome) in evaluations.iter_mut().zip(Outcome::ALL) {
            evaluation.label = self.get(outcome).label.clone();
        }
        Ok(evaluations)
    }
}

/// Complete 1X2 markets, one per bookmaker that quotes it
pub fn match_winner_markets(
    offers: &[OddsOffer],
    home_team: &str,
    away_team: &str,
) -> Vec<(String, MatchWinnerOdds)> {
    offers
        .iter()
        .flat_map(move |offer| {
            offer
                .bets
                .iter()
                .filter_map(move |bet| MatchWinnerOdds::from_bet(bet, home_team, away_team))
                .map(move |market| (offer.bookmaker.clone(), market))
        })
        .collect()
}

/// A bookmaker-attributed evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    pub bookmaker: String,
    #[serde(flatten)]
    pub evaluation: BetEvaluation,
}

/// The `limit` most probable 1X2 outcomes at or above `min_probability`,
/// across every bookmaker's market, most probable first.
///
/// Fails if a bookmaker quotes a non-positive odd.
pub fn top_picks(
    offers: &[OddsOffer],
    home_team: &str,
    away_team: &str,
    min_probability: f64,
    limit: usize,
) -> Result<Vec<Pick>, OddsError> {
    let mut picks = Vec::new();

    for (bookmaker, market) in match_winner_markets(offers, home_team, away_team) {
        for evaluation in market.evaluate()? {
            if evaluation.probability >= min_probability {
                picks.push(Pick {
                    bookmaker: bookmaker.clone(),
                    evaluation,
                });
            }
        }
    }

    // Stable sort keeps bookmaker order among ties
    picks.sort_by(|a, b| {
        b.evaluation
            .probability
            .partial_cmp(&a.evaluation.probability)
            .unwrap_or(Ordering::Equal)
    });
    picks.truncate(limit);
    Ok(picks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BetValue;

    fn value(label: &str, odd: f64) -> BetValue {
        BetValue {
            value: label.to_string(),
            odd: Some(odd),
        }
    }

    fn bet(name: &str, values: Vec<BetValue>) -> Bet {
        Bet {
            id: 1,
            name: name.to_string(),
            values,
        }
    }

    fn offer(bookmaker: &str, bets: Vec<Bet>) -> OddsOffer {
        OddsOffer {
            id: 0,
            bookmaker: bookmaker.to_string(),
            bets,
        }
    }

    #[test]
    fn test_from_bet_with_team_names() {
        let b = bet(
            "Match Winner",
            vec![
                value("Paris Saint-Germain", 1.15),
                value("Draw", 7.5),
                value("Brest", 15.0),
            ],
        );
        let market = MatchWinnerOdds::from_bet(&b, "Paris Saint-Germain", "Brest").unwrap();
        assert_eq!(market.home.odd, 1.15);
        assert_eq!(market.draw.label, "Draw");
        assert_eq!(market.away.label, "Brest");
    }

    #[test]
    fn test_from_bet_repeated_label_keeps_first() {
        let b = bet(
            "Match Winner",
            vec![
                value("Home", 2.1),
                value("Draw", 3.4),
                value("Away", 3.2),
                value("Home", 2.4),
            ],
        );
        let market = MatchWinnerOdds::from_bet(&b, "Arsenal", "Chelsea").unwrap();
        assert_eq!(market.home.odd, 2.1);
    }

    #[test]
    fn test_from_bet_with_generic_labels() {
        let b = bet(
            "1X2",
            vec![value("Away", 3.2), value("Home", 2.1), value("Draw", 3.4)],
        );
        let market = MatchWinnerOdds::from_bet(&b, "Arsenal", "Chelsea").unwrap();
        assert_eq!(market.home.label, "Arsenal");
        assert_eq!(market.home.odd, 2.1);
        assert_eq!(market.away.odd, 3.2);
    }

    #[test]
    fn test_from_bet_incomplete_or_other_market() {
        let missing_draw = bet("Match Winner", vec![value("Home", 2.1), value("Away", 3.2)]);
        assert!(MatchWinnerOdds::from_bet(&missing_draw, "A", "B").is_none());

        let other = bet(
            "Double Chance",
            vec![value("Home", 1.2), value("Draw", 1.3), value("Away", 1.4)],
        );
        assert!(MatchWinnerOdds::from_bet(&other, "A", "B").is_none());

        let unparsed = bet(
            "Match Winner",
            vec![
                value("Home", 2.1),
                BetValue {
                    value: "Draw".to_string(),
                    odd: None,
                },
                value("Away", 3.2),
            ],
        );
        assert!(MatchWinnerOdds::from_bet(&unparsed, "A", "B").is_none());
    }

    #[test]
    fn test_evaluate_labels_by_team() {
        let b = bet(
            "Match Winner",
            vec![value("Home", 2.0), value("Draw", 3.0), value("Away", 4.0)],
        );
        let market = MatchWinnerOdds::from_bet(&b, "Lyon", "Nice").unwrap();
        let evals = market.evaluate().unwrap();
        let labels: Vec<&str> = evals.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Lyon", "Draw", "Nice"]);
        assert!((evals[0].probability - 0.4615).abs() < 1e-4);
    }

    #[test]
    fn test_match_winner_markets_skips_incomplete_offers() {
        let offers = vec![
            offer(
                "Bet365",
                vec![bet(
                    "Match Winner",
                    vec![value("Home", 2.0), value("Draw", 3.0), value("Away", 4.0)],
                )],
            ),
            offer("Bwin", vec![bet("Match Winner", vec![value("Home", 2.0)])]),
        ];
        let markets = match_winner_markets(&offers, "A", "B");
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].0, "Bet365");
    }

    #[test]
    fn test_top_picks_threshold_sort_and_limit() {
        let offers = vec![
            offer(
                "Bet365",
                vec![bet(
                    "Match Winner",
                    vec![value("Home", 1.10), value("Draw", 9.0), value("Away", 21.0)],
                )],
            ),
            offer(
                "Pinnacle",
                vec![bet(
                    "Match Winner",
                    vec![value("Home", 1.05), value("Draw", 15.0), value("Away", 34.0)],
                )],
            ),
            offer(
                "Bwin",
                vec![bet(
                    "Match Winner",
                    vec![value("Home", 2.5), value("Draw", 3.2), value("Away", 2.9)],
                )],
            ),
        ];

        let picks = top_picks(&offers, "PSG", "Brest", 0.8, 3).unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].bookmaker, "Pinnacle");
        assert_eq!(picks[0].evaluation.label, "PSG");
        assert!(picks[0].evaluation.probability >= picks[1].evaluation.probability);
        assert!(picks.iter().all(|p| p.evaluation.probability >= 0.8));

        let one = top_picks(&offers, "PSG", "Brest", 0.8, 1).unwrap();
        assert_eq!(one.len(), 1);

        let none = top_picks(&offers, "PSG", "Brest", 0.99, 3).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_top_picks_rejects_bad_odds() {
        let offers = vec![offer(
            "Broken",
            vec![bet(
                "Match Winner",
                vec![value("Home", 0.0), value("Draw", 3.0), value("Away", 4.0)],
            )],
        )];
        assert!(top_picks(&offers, "A", "B", 0.0, 3).is_err());
    }

    #[test]
    fn test_pick_serializes_flat() {
        let pick = Pick {
            bookmaker: "Bet365".to_string(),
            evaluation: BetEvaluation {
                label: "Draw".to_string(),
                probability: 0.25,
                odd: 3.6,
                expected_value: -0.1,
            },
        };
        let json = serde_json::to_value(&pick).unwrap();
        assert_eq!(json["bookmaker"], "Bet365");
        assert_eq!(json["label"], "Draw");
    }
}
