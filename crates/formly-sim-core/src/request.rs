use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::SimulationError;

pub const BUDGET_AUTONOMY_KEY: &str = "budgetAutonomy";
pub const DEFAULT_BUDGET_AUTONOMY: f64 = 50.0;
pub const DEFAULT_ITERATIONS: i128 = 1000;

fn default_iterations() -> i128 {
    DEFAULT_ITERATIONS
}

fn whole_float(value: f64) -> Option<i128> {
    // 2^127 is exactly representable, anything below it fits
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i128::MAX as f64 {
        Some(value as i128)
    } else {
        None
    }
}

/// Integer-valued JSON: plain integers, floats without a fractional part,
/// and strings holding an integer.
fn iterations_from_value(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| n.as_f64().and_then(whole_float)),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    }
}

fn deserialize_iterations<'de, D>(deserializer: D) -> Result<i128, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    iterations_from_value(&value).ok_or_else(|| {
        de::Error::custom(format!("iterations must be a valid integer, got {value}"))
    })
}

/// Body of `POST /run`.
///
/// Only `variables["budgetAutonomy"]` feeds the scoring. `weights` and
/// `iterations` are part of the contract and are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub variables: Map<String, Value>,
    pub weights: Map<String, Value>,
    #[serde(default = "default_iterations", deserialize_with = "deserialize_iterations")]
    pub iterations: i128,
}

impl SimulationRequest {
    pub fn new(variables: Map<String, Value>, weights: Map<String, Value>) -> Self {
        Self {
            variables,
            weights,
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// `budgetAutonomy` coerced to a float, 50 when absent.
    pub fn budget_autonomy(&self) -> Result<f64, SimulationError> {
        match self.variables.get(BUDGET_AUTONOMY_KEY) {
            None => Ok(DEFAULT_BUDGET_AUTONOMY),
            Some(value) => coerce_numeric(BUDGET_AUTONOMY_KEY, value),
        }
    }
}

/// Numbers pass through, numeric strings are parsed, booleans count as 1/0.
/// Non-finite results are rejected so they never reach the JSON encoder.
pub fn coerce_numeric(key: &str, value: &Value) -> Result<f64, SimulationError> {
    let parsed = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| SimulationError::invalid_variable(key, format!("unrepresentable number {n}")))?,
        Value::String(s) => strip_digit_separators(s.trim())
            .and_then(|cleaned| cleaned.parse::<f64>().ok())
            .ok_or_else(|| {
                SimulationError::invalid_variable(key, format!("could not convert string to float: '{s}'"))
            })?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null => return Err(SimulationError::invalid_variable(key, "got null")),
        Value::Array(_) => return Err(SimulationError::invalid_variable(key, "got an array")),
        Value::Object(_) => return Err(SimulationError::invalid_variable(key, "got an object")),
    };

    if !parsed.is_finite() {
        return Err(SimulationError::invalid_variable(
            key,
            format!("value {value} is not finite"),
        ));
    }
    Ok(parsed)
}

/// Drops `_` separators, which are only legal between two digits
/// (`"1_000"`). `None` for a misplaced one.
fn strip_digit_separators(s: &str) -> Option<String> {
    if !s.contains('_') {
        return Some(s.to_string());
    }

    let chars: Vec<char> = s.chars().collect();
    let mut cleaned = String::with_capacity(s.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let before = i.checked_sub(1).and_then(|j| chars.get(j));
            let after = chars.get(i + 1);
            match (before, after) {
                (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit() => continue,
                _ => return None,
            }
        }
        cleaned.push(c);
    }
    Some(cleaned)
}

/// `budgetAutonomy / 100`, the single scalar perturbing the scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftFactor(f64);

impl DriftFactor {
    pub fn from_budget_autonomy(budget_autonomy: f64) -> Self {
        Self(budget_autonomy / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}
