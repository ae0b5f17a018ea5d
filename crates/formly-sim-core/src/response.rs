use serde::{Deserialize, Serialize};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;
pub const CONFIDENCE: u32 = 94;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTrendPoint {
    pub name: String,
    pub val: f64,
}

/// One axis of the radar chart: `A` is the simulated scenario, `B` the
/// fixed baseline it is drawn against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub subject: String,
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: u32,
}

impl RadarPoint {
    pub fn new(subject: &str, a: f64, b: u32) -> Self {
        Self {
            subject: subject.to_string(),
            a,
            b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    #[serde(rename = "riskTrend")]
    pub risk_trend: Vec<RiskTrendPoint>,
    #[serde(rename = "radarData")]
    pub radar_data: Vec<RadarPoint>,
    pub roi_multiplier: f64,
    pub confidence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub predicted_alignment: f64,
    pub predicted_risk: f64,
    pub results: SimulationResults,
}

impl SimulationResponse {
    /// Headline scores pinned to [0, 100]. Chart data keeps the raw values.
    pub fn clamped(mut self) -> Self {
        self.predicted_alignment = clamp_score(self.predicted_alignment);
        self.predicted_risk = clamp_score(self.predicted_risk);
        self
    }
}

pub fn clamp_score(value: f64) -> f64 {
    value.clamp(SCORE_MIN, SCORE_MAX)
}
