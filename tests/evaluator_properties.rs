use football_value::evaluator::{
    evaluate_btts, evaluate_over25, evaluate_result, normalize, BttsInput, OddsTriple, Over25Input,
};
use football_value::OddsError;
use proptest::prelude::*;

/// Mostly realistic percentages, sometimes any f64 at all (NaN and infinities included)
fn any_pct() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -50.0..150.0f64,
        1 => proptest::num::f64::ANY,
        1 => prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
    ]
}

proptest! {
    #[test]
    fn normalized_probabilities_sum_to_one(
        home in 1.01..50.0f64,
        draw in 1.01..50.0f64,
        away in 1.01..50.0f64,
    ) {
        let probs = normalize(home, draw, away).unwrap();
        prop_assert!((probs.sum() - 1.0).abs() < 1e-9);
        for p in [probs.home(), probs.draw(), probs.away()] {
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn normalization_is_scale_invariant(
        home in 1.01..50.0f64,
        draw in 1.01..50.0f64,
        away in 1.01..50.0f64,
        scale in 0.1..10.0f64,
    ) {
        let base = normalize(home, draw, away).unwrap();
        let scaled = normalize(home * scale, draw * scale, away * scale).unwrap();
        prop_assert!((base.home() - scaled.home()).abs() < 1e-9);
        prop_assert!((base.draw() - scaled.draw()).abs() < 1e-9);
        prop_assert!((base.away() - scaled.away()).abs() < 1e-9);
    }

    #[test]
    fn shorter_odds_mean_higher_probability(
        home in 1.01..50.0f64,
        draw in 1.01..50.0f64,
        away in 1.01..50.0f64,
    ) {
        let probs = normalize(home, draw, away).unwrap();
        if home < away {
            prop_assert!(probs.home() >= probs.away());
        }
    }

    #[test]
    fn over25_probability_is_clamped(
        home_goals in any_pct(),
        away_goals in any_pct(),
        over25_pct in any_pct(),
        odd in 1.01..20.0f64,
        offensive_absences in any::<bool>(),
    ) {
        let eval = evaluate_over25(&Over25Input {
            home_goals,
            away_goals,
            over25_pct,
            odd,
            offensive_absences,
        }).unwrap();
        prop_assert!((0.0..=1.0).contains(&eval.probability));
        prop_assert_eq!(eval.expected_value, eval.probability * eval.odd - 1.0);
    }

    #[test]
    fn btts_probability_is_clamped(
        home_pct in any_pct(),
        away_pct in any_pct(),
        odd in 1.01..20.0f64,
        low_scoring in any::<bool>(),
        strong_defense in any::<bool>(),
    ) {
        let eval = evaluate_btts(&BttsInput {
            home_pct,
            away_pct,
            odd,
            low_scoring,
            strong_defense,
        }).unwrap();
        prop_assert!((0.0..=1.0).contains(&eval.probability));
        prop_assert_eq!(eval.expected_value, eval.probability * eval.odd - 1.0);
    }

    #[test]
    fn result_ev_matches_formula(
        home in 1.01..50.0f64,
        draw in 1.01..50.0f64,
        away in 1.01..50.0f64,
    ) {
        let odds = OddsTriple::new(home, draw, away).unwrap();
        let evals = evaluate_result(&odds.normalize(), &odds);
        prop_assert_eq!(evals.len(), 3);
        for eval in &evals {
            prop_assert_eq!(eval.expected_value, eval.probability * eval.odd - 1.0);
        }
    }

    #[test]
    fn any_accepted_odds_normalize_to_one(
        home in proptest::num::f64::POSITIVE,
        draw in proptest::num::f64::POSITIVE,
        away in proptest::num::f64::POSITIVE,
    ) {
        if let Ok(probs) = normalize(home, draw, away) {
            prop_assert!((probs.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn non_positive_odds_are_rejected(
        bad in -10.0..=0.0f64,
        good in 1.01..50.0f64,
        position in 0usize..3,
    ) {
        let mut odds = [good, good, good];
        odds[position] = bad;
        let result = normalize(odds[0], odds[1], odds[2]);
        let is_invalid = matches!(result, Err(OddsError::InvalidOdds { .. }));
        prop_assert!(is_invalid);
    }
}

#[test]
fn documented_examples() {
    let probs = normalize(2.0, 3.0, 4.0).unwrap();
    assert!((probs.home() - 0.4615).abs() < 1e-4);
    assert!((probs.draw() - 0.3077).abs() < 1e-4);
    assert!((probs.away() - 0.2308).abs() < 1e-4);

    let over = evaluate_over25(&Over25Input {
        home_goals: 2.0,
        away_goals: 2.0,
        over25_pct: 50.0,
        odd: 1.9,
        offensive_absences: false,
    })
    .unwrap();
    assert!((over.probability - 0.55).abs() < 1e-9);
    assert!((over.expected_value - 0.045).abs() < 1e-9);

    let btts = evaluate_btts(&BttsInput {
        home_pct: 60.0,
        away_pct: 40.0,
        odd: 1.8,
        low_scoring: false,
        strong_defense: true,
    })
    .unwrap();
    assert!((btts.probability - 0.45).abs() < 1e-9);
    assert!((btts.expected_value + 0.19).abs() < 1e-9);
}
