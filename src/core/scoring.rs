//! Carrier scoring
//!
//! Assigns each matched carrier a heuristic desirability score between 0 and
//! 100 and ranks the candidates:
//!
//! | Component | Points |
//! |---|---|
//! | rating × 10 | 0–50 |
//! | equipment type matches exactly | 20 |
//! | rate competitiveness, `max(0, 20 − |base − requested| / 100)` | 0–20 |
//! | auto-booking enabled | 10 |
//!
//! Scores are computed on copies; the registry's carriers are never touched.

use crate::types::{Carrier, Shipment};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const RATING_WEIGHT: Decimal = Decimal::TEN;
const EQUIPMENT_BONUS: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
const MAX_RATE_POINTS: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
const AUTO_BOOKING_BONUS: Decimal = Decimal::TEN;
const MAX_SCORE: u32 = 100;

/// A carrier paired with the score it earned for one shipment
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCarrier {
    pub carrier: Carrier,
    pub score: u32,
}

/// Points for how close the carrier's base rate is to the requested rate
///
/// One point is lost per 100 currency units of difference.
pub fn rate_competitiveness(base_rate: Decimal, requested_rate: Decimal) -> Decimal {
    let penalty = (base_rate - requested_rate).abs() / Decimal::ONE_HUNDRED;
    (MAX_RATE_POINTS - penalty).max(Decimal::ZERO)
}

/// Score one carrier for a shipment
pub fn score_carrier(carrier: &Carrier, shipment: &Shipment) -> u32 {
    score_with_rate_points(
        carrier,
        shipment,
        rate_competitiveness(carrier.base_rate, shipment.requested_rate),
    )
}

/// Score one carrier with an explicit rate-competitiveness term
///
/// The term is clamped to 0–20. The total is rounded half away from zero.
pub fn score_with_rate_points(carrier: &Carrier, shipment: &Shipment, rate_points: Decimal) -> u32 {
    let mut score = carrier.rating * RATING_WEIGHT;
    if carrier.has_equipment(&shipment.equipment_type) {
        score += EQUIPMENT_BONUS;
    }
    score += rate_points.clamp(Decimal::ZERO, MAX_RATE_POINTS);
    if carrier.auto_booking_enabled {
        score += AUTO_BOOKING_BONUS;
    }

    score
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
        .min(MAX_SCORE)
}

/// Score and rank candidates, best first
///
/// The sort is stable, so equal scores keep the order the candidates came in.
pub fn rank_carriers(shipment: &Shipment, candidates: &[Carrier]) -> Vec<ScoredCarrier> {
    let mut scored: Vec<ScoredCarrier> = candidates
        .iter()
        .map(|carrier| ScoredCarrier {
            carrier: carrier.clone(),
            score: score_carrier(carrier, shipment),
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// The highest-scoring candidate, or `None` for an empty candidate list
pub fn select_best(shipment: &Shipment, candidates: &[Carrier]) -> Option<ScoredCarrier> {
    rank_carriers(shipment, candidates).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn carrier(id: &str, rating: Decimal, base_rate: Decimal) -> Carrier {
        Carrier {
            id: id.to_string(),
            name: format!("Carrier {}", id),
            rating,
            equipment_types: vec!["Dry Van".to_string()],
            coverage_regions: vec!["Midwest".to_string()],
            auto_booking_enabled: true,
            base_rate,
        }
    }

    fn shipment(requested_rate: Decimal) -> Shipment {
        Shipment {
            id: "LD1".to_string(),
            origin: "Chicago, IL".to_string(),
            destination: "Miami, FL".to_string(),
            weight: Decimal::new(40000, 0),
            equipment_type: "Dry Van".to_string(),
            requested_rate,
            ..Default::default()
        }
    }

    #[rstest]
    #[case::identical(1500, 1500, Decimal::new(20, 0))]
    #[case::hundred_apart(1500, 1600, Decimal::new(19, 0))]
    #[case::symmetric(1600, 1500, Decimal::new(19, 0))]
    #[case::partial(1500, 1550, Decimal::new(195, 1))]
    #[case::far_apart(1000, 4000, Decimal::ZERO)]
    fn test_rate_competitiveness(
        #[case] base: i64,
        #[case] requested: i64,
        #[case] expected: Decimal,
    ) {
        assert_eq!(
            rate_competitiveness(Decimal::new(base, 0), Decimal::new(requested, 0)),
            expected
        );
    }

    #[test]
    fn test_reference_scenario_score() {
        // 48 + 20 + 19 + 10
        let score = score_carrier(
            &carrier("CAR001", Decimal::new(48, 1), Decimal::new(1500, 0)),
            &shipment(Decimal::new(1600, 0)),
        );
        assert_eq!(score, 97);
    }

    #[test]
    fn test_perfect_score_is_capped_at_100() {
        let score = score_carrier(
            &carrier("CAR001", Decimal::new(5, 0), Decimal::new(1600, 0)),
            &shipment(Decimal::new(1600, 0)),
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn test_missing_equipment_and_auto_booking_lose_points() {
        let mut c = carrier("CAR001", Decimal::new(4, 0), Decimal::new(1600, 0));
        c.equipment_types = vec!["Flatbed".to_string()];
        c.auto_booking_enabled = false;

        assert_eq!(score_carrier(&c, &shipment(Decimal::new(1600, 0))), 60);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 45 + 20 + 19.5 + 10 = 94.5
        let score = score_carrier(
            &carrier("CAR001", Decimal::new(45, 1), Decimal::new(1500, 0)),
            &shipment(Decimal::new(1550, 0)),
        );
        assert_eq!(score, 95);
    }

    #[test]
    fn test_injected_rate_points_are_clamped() {
        let c = carrier("CAR001", Decimal::new(4, 0), Decimal::new(1500, 0));
        let s = shipment(Decimal::new(1600, 0));

        assert_eq!(score_with_rate_points(&c, &s, Decimal::new(50, 0)), 90);
        assert_eq!(score_with_rate_points(&c, &s, Decimal::new(-5, 0)), 70);
    }

    #[test]
    fn test_identical_carriers_score_identically() {
        let s = shipment(Decimal::new(1700, 0));
        let a = carrier("CAR001", Decimal::new(42, 1), Decimal::new(1650, 0));
        let b = Carrier {
            id: "CAR002".to_string(),
            ..a.clone()
        };

        assert_eq!(score_carrier(&a, &s), score_carrier(&b, &s));
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let candidates = vec![
            carrier("CAR001", Decimal::new(30, 1), Decimal::new(1600, 0)),
            carrier("CAR002", Decimal::new(49, 1), Decimal::new(1600, 0)),
            carrier("CAR003", Decimal::new(40, 1), Decimal::new(1600, 0)),
        ];

        let ranked = rank_carriers(&shipment(Decimal::new(1600, 0)), &candidates);
        let ids: Vec<&str> = ranked.iter().map(|s| s.carrier.id.as_str()).collect();
        assert_eq!(ids, vec!["CAR002", "CAR003", "CAR001"]);
    }

    #[test]
    fn test_ties_keep_registry_order() {
        let candidates = vec![
            carrier("CAR007", Decimal::new(40, 1), Decimal::new(1600, 0)),
            carrier("CAR003", Decimal::new(40, 1), Decimal::new(1600, 0)),
        ];

        let best = select_best(&shipment(Decimal::new(1600, 0)), &candidates).unwrap();
        assert_eq!(best.carrier.id, "CAR007");
    }

    #[test]
    fn test_select_best_on_empty_candidates() {
        assert!(select_best(&shipment(Decimal::new(1600, 0)), &[]).is_none());
    }
}
