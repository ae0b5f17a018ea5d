use rand::{Rng, RngCore};

use crate::request::DriftFactor;
use crate::response::{RadarPoint, RiskTrendPoint, SimulationResponse, SimulationResults, CONFIDENCE};

pub const BASE_ALIGNMENT: f64 = 75.0;
pub const RISK_TREND_PERIODS: usize = 6;

/// Radar axes in chart order with their fixed baseline (`B`) values.
pub const RADAR_BASELINES: [(&str, u32); 5] = [
    ("Alignment", 70),
    ("Risk", 40),
    ("Velocity", 30),
    ("Cost", 50),
    ("Resilience", 60),
];

/// Produces the raw scores for one run. Clamping of the headline scores is
/// applied by the service afterwards, so implementations may return values
/// outside [0, 100].
pub trait ScoringStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, drift: DriftFactor, rng: &mut dyn RngCore) -> SimulationResponse;
}

/// Closed-interval uniform draw.
fn uniform(rng: &mut dyn RngCore, low: f64, high: f64) -> f64 {
    rng.gen_range(low..=high)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Placeholder formulas: bounded noise around a drift-weighted baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockScoring;

impl ScoringStrategy for MockScoring {
    fn name(&self) -> &str {
        "mock"
    }

    fn score(&self, drift: DriftFactor, rng: &mut dyn RngCore) -> SimulationResponse {
        let drift = drift.value();

        let predicted_alignment = BASE_ALIGNMENT + uniform(rng, -10.0, 10.0) * drift;
        let predicted_risk = (1.0 - drift) * 100.0 + uniform(rng, 0.0, 15.0);

        let risk_trend = (1..=RISK_TREND_PERIODS)
            .map(|i| RiskTrendPoint {
                name: format!("P{i}"),
                val: predicted_risk + uniform(rng, -5.0, 5.0),
            })
            .collect();

        let [alignment, risk, velocity, cost, resilience] = RADAR_BASELINES;
        let radar_data = vec![
            RadarPoint::new(alignment.0, predicted_alignment, alignment.1),
            RadarPoint::new(risk.0, predicted_risk, risk.1),
            RadarPoint::new(velocity.0, uniform(rng, 50.0, 95.0), velocity.1),
            RadarPoint::new(cost.0, uniform(rng, 40.0, 80.0), cost.1),
            RadarPoint::new(resilience.0, uniform(rng, 60.0, 95.0), resilience.1),
        ];

        let roi_multiplier = round_to_cents(uniform(rng, 2.5, 4.5));

        SimulationResponse {
            predicted_alignment,
            predicted_risk,
            results: SimulationResults {
                risk_trend,
                radar_data,
                roi_multiplier,
                confidence: CONFIDENCE,
            },
        }
    }
}
