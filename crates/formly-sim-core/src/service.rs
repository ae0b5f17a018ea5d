use std::sync::Arc;

use rand::RngCore;

use crate::error::SimulationError;
use crate::request::{DriftFactor, SimulationRequest};
use crate::response::SimulationResponse;
use crate::scoring::{MockScoring, ScoringStrategy};

/// Stateless simulation entry point. Cheap to share behind an `Arc`; each
/// call draws from the caller's thread-local generator.
#[derive(Clone)]
pub struct SimulationService {
    strategy: Arc<dyn ScoringStrategy>,
}

impl SimulationService {
    pub fn new(strategy: Arc<dyn ScoringStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationResponse, SimulationError> {
        self.run_with_rng(request, &mut rand::thread_rng())
    }

    pub fn run_with_rng(
        &self,
        request: &SimulationRequest,
        rng: &mut dyn RngCore,
    ) -> Result<SimulationResponse, SimulationError> {
        let budget_autonomy = request.budget_autonomy()?;
        let drift = DriftFactor::from_budget_autonomy(budget_autonomy);
        Ok(self.strategy.score(drift, rng).clamped())
    }
}

impl Default for SimulationService {
    fn default() -> Self {
        Self::new(Arc::new(MockScoring))
    }
}

impl std::fmt::Debug for SimulationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationService")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
