//! Run state shared between the engine and its handlers

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recorded parameter values: param name -> one snapshot per apply, each
/// snapshot holding one value per parameter group.
pub type ParamHistory = BTreeMap<String, Vec<Vec<f64>>>;

/// What the last iteration step produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Output {
    /// A single scalar, typically the loss
    Scalar(f64),
    /// Named scalars
    Map(BTreeMap<String, f64>),
}

impl Output {
    /// Scalar value, if this is a scalar output
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Map(_) => None,
        }
    }

    /// Flatten into `(name, value)` pairs; a scalar is named `"output"`
    pub fn into_pairs(self) -> Vec<(String, f64)> {
        match self {
            Self::Scalar(v) => vec![("output".to_string(), v)],
            Self::Map(map) => map.into_iter().collect(),
        }
    }
}

impl From<f64> for Output {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

/// State of a run, visible to every handler
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    /// Global iteration count (1-based once the first iteration starts)
    pub iteration: usize,
    /// Current epoch (1-based once the first epoch starts)
    pub epoch: usize,
    /// Epochs requested for this run
    pub max_epochs: usize,
    /// Iterations per epoch
    pub epoch_length: usize,
    /// Named metrics written by evaluators or handlers
    pub metrics: BTreeMap<String, f64>,
    /// Output of the most recent iteration step
    pub output: Option<Output>,
    /// Parameter history, present once a schedule records a snapshot
    pub param_history: Option<ParamHistory>,
    should_terminate: bool,
}

impl EngineState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a metric, failing if it was never written
    pub fn metric(&self, name: &str) -> Result<f64> {
        self.metrics
            .get(name)
            .copied()
            .ok_or_else(|| Error::missing(format!("metric '{name}' not found in engine state")))
    }

    /// The last iteration output, failing if there is none yet
    pub fn output(&self) -> Result<&Output> {
        self.output
            .as_ref()
            .ok_or_else(|| Error::missing("engine state has no output"))
    }

    /// Append a snapshot for `param_name`, creating the history on first use
    pub fn record_param(&mut self, param_name: &str, snapshot: Vec<f64>) {
        self.param_history
            .get_or_insert_with(ParamHistory::new)
            .entry(param_name.to_string())
            .or_default()
            .push(snapshot);
    }

    /// Recorded snapshots for one parameter
    pub fn history_of(&self, param_name: &str) -> Option<&[Vec<f64>]> {
        self.param_history
            .as_ref()
            .and_then(|h| h.get(param_name))
            .map(Vec::as_slice)
    }

    /// Ask the engine to stop after the current iteration
    pub fn terminate(&mut self) {
        self.should_terminate = true;
    }

    /// Whether termination was requested
    pub fn should_terminate(&self) -> bool {
        self.should_terminate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_created_lazily() {
        let mut state = EngineState::new();
        assert!(state.param_history.is_none());
        assert!(state.history_of("lr").is_none());

        state.record_param("lr", vec![0.1, 0.1]);
        state.record_param("lr", vec![0.2, 0.2]);
        state.record_param("momentum", vec![0.9]);

        assert_eq!(state.history_of("lr").unwrap(), &[vec![0.1, 0.1], vec![0.2, 0.2]]);
        assert_eq!(state.param_history.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_metric_and_output() {
        let mut state = EngineState::new();
        assert!(matches!(state.metric("accuracy"), Err(Error::MissingData(_))));
        assert!(matches!(state.output(), Err(Error::MissingData(_))));

        state.metrics.insert("accuracy".into(), 0.75);
        state.output = Some(Output::Scalar(0.3));
        assert_eq!(state.metric("accuracy").unwrap(), 0.75);
        assert_eq!(state.output().unwrap().as_scalar(), Some(0.3));
    }

    #[test]
    fn test_output_pairs() {
        assert_eq!(Output::Scalar(1.5).into_pairs(), vec![("output".to_string(), 1.5)]);

        let map = BTreeMap::from([("loss".to_string(), 0.4), ("acc".to_string(), 0.9)]);
        let pairs = Output::Map(map).into_pairs();
        assert_eq!(pairs, vec![("acc".to_string(), 0.9), ("loss".to_string(), 0.4)]);
    }

    #[test]
    fn test_terminate_flag() {
        let mut state = EngineState::new();
        assert!(!state.should_terminate());
        state.terminate();
        assert!(state.should_terminate());
    }
}
