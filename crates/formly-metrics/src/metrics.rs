use formly_sim_core::SimulationResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Ok,
    BadRequest,
    Unprocessable,
    InternalError,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
}

impl RequestOutcome {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::BadRequest => "bad_request",
            Self::Unprocessable => "unprocessable",
            Self::InternalError => "internal_error",
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::PayloadTooLarge => "payload_too_large",
        }
    }

    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => Self::Ok,
            400 => Self::BadRequest,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            413 => Self::PayloadTooLarge,
            422 => Self::Unprocessable,
            _ => Self::InternalError,
        }
    }
}

fn score_buckets() -> Vec<f64> {
    (0..=10).map(|i| f64::from(i) * 10.0).collect()
}

/// Per-process simulation metrics, kept in a private registry so several
/// instances can coexist in one test binary.
pub struct SimulationMetrics {
    registry: Registry,
    pub requests_total: IntCounterVec,
    pub predicted_alignment: Histogram,
    pub predicted_risk: Histogram,
}

impl SimulationMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "formly_simulation_requests_total",
                "Simulation requests by outcome",
            ),
            &["outcome"],
        )?;

        let predicted_alignment = Histogram::with_opts(
            HistogramOpts::new(
                "formly_predicted_alignment",
                "Clamped alignment score returned to callers",
            )
            .buckets(score_buckets()),
        )?;

        let predicted_risk = Histogram::with_opts(
            HistogramOpts::new(
                "formly_predicted_risk",
                "Clamped risk score returned to callers",
            )
            .buckets(score_buckets()),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(predicted_alignment.clone()))?;
        registry.register(Box::new(predicted_risk.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            predicted_alignment,
            predicted_risk,
        })
    }

    pub fn record_outcome(&self, outcome: RequestOutcome) {
        self.requests_total
            .with_label_values(&[outcome.as_label()])
            .inc();
    }

    pub fn observe_response(&self, response: &SimulationResponse) {
        self.predicted_alignment.observe(response.predicted_alignment);
        self.predicted_risk.observe(response.predicted_risk);
    }

    pub fn outcome_count(&self, outcome: RequestOutcome) -> u64 {
        self.requests_total
            .with_label_values(&[outcome.as_label()])
            .get()
    }

    /// Prometheus text exposition of every registered family.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formly_sim_core::{SimulationRequest, SimulationService};

    #[test]
    fn outcomes_are_counted_per_label() {
        let metrics = SimulationMetrics::new().unwrap();
        metrics.record_outcome(RequestOutcome::Ok);
        metrics.record_outcome(RequestOutcome::Ok);
        metrics.record_outcome(RequestOutcome::from_status(400));

        assert_eq!(metrics.outcome_count(RequestOutcome::Ok), 2);
        assert_eq!(metrics.outcome_count(RequestOutcome::BadRequest), 1);
        assert_eq!(metrics.outcome_count(RequestOutcome::InternalError), 0);
    }

    #[test]
    fn status_codes_map_to_outcomes() {
        assert_eq!(RequestOutcome::from_status(200), RequestOutcome::Ok);
        assert_eq!(RequestOutcome::from_status(404), RequestOutcome::NotFound);
        assert_eq!(RequestOutcome::from_status(405), RequestOutcome::MethodNotAllowed);
        assert_eq!(RequestOutcome::from_status(413), RequestOutcome::PayloadTooLarge);
        assert_eq!(RequestOutcome::from_status(422), RequestOutcome::Unprocessable);
        assert_eq!(RequestOutcome::from_status(500), RequestOutcome::InternalError);
    }

    #[test]
    fn render_includes_observed_scores() {
        let metrics = SimulationMetrics::new().unwrap();
        let response = SimulationService::default()
            .run(&SimulationRequest::new(Default::default(), Default::default()))
            .unwrap();
        metrics.observe_response(&response);
        metrics.record_outcome(RequestOutcome::Ok);

        let text = metrics.render().unwrap();
        assert!(text.contains("formly_simulation_requests_total{outcome=\"ok\"} 1"));
        assert!(text.contains("formly_predicted_alignment_count 1"));
        assert!(text.contains("formly_predicted_risk_count 1"));
    }
}
