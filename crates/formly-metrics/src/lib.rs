mod metrics;

pub use metrics::{RequestOutcome, SimulationMetrics};
