use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Key used when observation fields are concatenated into one entry.
pub const FLAT_OBSERVATION_KEY: &str = "observations";

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Ordered set of named f32 vectors describing environment state.
///
/// Field order is insertion order and is preserved by [`flatten`](Self::flatten).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    fields: Vec<(String, Vec<f32>)>,
}

impl Observation {
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder: append a named field.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, values: Vec<f32>) -> Self {
        self.insert(name, values);
        self
    }

    /// Insert a field, replacing an existing one with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f32>) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = values;
        } else {
            self.fields.push((name, values));
        }
    }

    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Number of named fields.
    pub const fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Total number of scalars across all fields.
    pub fn dim(&self) -> usize {
        self.fields.iter().map(|(_, v)| v.len()).sum()
    }

    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Concatenate every field in order.
    pub fn flatten(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.dim());
        for (_, v) in &self.fields {
            out.extend_from_slice(v);
        }
        out
    }

    /// Collapse into a single [`FLAT_OBSERVATION_KEY`] field.
    #[must_use]
    pub fn into_flat(self) -> Self {
        let flat = self.flatten();
        Self::new().with(FLAT_OBSERVATION_KEY, flat)
    }

    /// True if every scalar is finite.
    pub fn is_finite(&self) -> bool {
        self.fields
            .iter()
            .all(|(_, v)| v.iter().all(|x| x.is_finite()))
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Control command sent to the environment: one value per actuator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    data: Vec<f32>,
}

impl Action {
    pub const fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    /// All zeros except `1.0` at `index`. An out-of-range index yields zeros.
    pub fn one_hot(len: usize, index: usize) -> Self {
        let mut data = vec![0.0; len];
        if let Some(v) = data.get_mut(index) {
            *v = 1.0;
        }
        Self { data }
    }

    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Validate action data (no NaN, no Inf).
    pub fn validate(&self) -> Result<(), ValidationError> {
        for val in &self.data {
            if val.is_nan() {
                return Err(ValidationError::ActionContainsNan);
            }
            if val.is_infinite() {
                return Err(ValidationError::ActionContainsInf);
            }
        }
        Ok(())
    }
}

impl From<Vec<f32>> for Action {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// BoundedArraySpec
// ---------------------------------------------------------------------------

/// Shape and per-element bounds of a 1-D array (used for the action spec).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedArraySpec {
    pub name: String,
    pub minimum: Vec<f32>,
    pub maximum: Vec<f32>,
}

impl BoundedArraySpec {
    /// Spec of `len` elements sharing the same bounds.
    pub fn uniform(name: impl Into<String>, len: usize, low: f32, high: f32) -> Self {
        Self {
            name: name.into(),
            minimum: vec![low; len],
            maximum: vec![high; len],
        }
    }

    /// Number of elements.
    pub const fn shape(&self) -> usize {
        self.minimum.len()
    }

    /// Check dimension and finiteness of an action against this spec.
    pub fn validate(&self, action: &Action) -> Result<(), ValidationError> {
        if action.len() != self.shape() {
            return Err(ValidationError::ActionDimMismatch {
                expected: self.shape(),
                got: action.len(),
            });
        }
        action.validate()
    }

    /// True if every element lies inside its bounds.
    pub fn contains(&self, action: &Action) -> bool {
        action.len() == self.shape()
            && action
                .as_slice()
                .iter()
                .zip(self.minimum.iter().zip(&self.maximum))
                .all(|(a, (lo, hi))| a >= lo && a <= hi)
    }

    /// Clip an action into bounds element-wise.
    pub fn clip(&self, action: &Action) -> Action {
        action
            .as_slice()
            .iter()
            .zip(self.minimum.iter().zip(&self.maximum))
            .map(|(a, (lo, hi))| a.clamp(*lo, *hi))
            .collect::<Vec<_>>()
            .into()
    }
}

// ---------------------------------------------------------------------------
// StepType / TimeStep
// ---------------------------------------------------------------------------

/// Position of a timestep within its episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepType {
    First,
    Mid,
    Last,
}

/// Result of `reset()` or `step()`.
///
/// `reward` and `discount` are `None` on the first timestep of an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStep {
    pub step_type: StepType,
    pub reward: Option<f32>,
    pub discount: Option<f32>,
    pub observation: Observation,
}

impl TimeStep {
    /// Timestep produced by a reset.
    pub const fn restart(observation: Observation) -> Self {
        Self {
            step_type: StepType::First,
            reward: None,
            discount: None,
            observation,
        }
    }

    /// Intermediate timestep.
    pub const fn transition(reward: f32, discount: f32, observation: Observation) -> Self {
        Self {
            step_type: StepType::Mid,
            reward: Some(reward),
            discount: Some(discount),
            observation,
        }
    }

    /// Final timestep of an episode.
    pub const fn termination(reward: f32, discount: f32, observation: Observation) -> Self {
        Self {
            step_type: StepType::Last,
            reward: Some(reward),
            discount: Some(discount),
            observation,
        }
    }

    pub fn first(&self) -> bool {
        self.step_type == StepType::First
    }

    pub fn mid(&self) -> bool {
        self.step_type == StepType::Mid
    }

    pub fn last(&self) -> bool {
        self.step_type == StepType::Last
    }
}
