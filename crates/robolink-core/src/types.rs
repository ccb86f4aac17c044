//! Observation and action vocabulary for the step/reset interface.
//!
//! Every element of an environment reports its state as a flat `f32`
//! vector ([`Observation`]) and, if controllable, accepts an [`Action`].
//! Spaces bound what counts as valid on either side; agents that expect
//! one flat vector can use [`flatten_observations`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// One element's observed state, as a flat vector of scalars.
///
/// The layout is element-specific (joint angles, pixel bytes, encoded
/// text); the env only guarantees that the length is fixed per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    data: Vec<f32>,
}

impl Observation {
    #[must_use]
    pub const fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

impl std::ops::Index<usize> for Observation {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.data[index]
    }
}

impl From<Vec<f32>> for Observation {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl FromIterator<f32> for Observation {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A control command for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Target values for a continuous device, one scalar per degree of
    /// freedom.
    Continuous(Vec<f32>),
    /// One choice out of a finite set.
    Discrete(u64),
}

impl Action {
    /// Reject non-finite continuous values before they reach a device.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let Self::Continuous(values) = self else {
            return Ok(());
        };
        for value in values {
            if value.is_nan() {
                return Err(ValidationError::ActionContainsNan);
            }
            if value.is_infinite() {
                return Err(ValidationError::ActionContainsInf);
            }
        }
        Ok(())
    }
}

impl From<Vec<f32>> for Action {
    fn from(values: Vec<f32>) -> Self {
        Self::Continuous(values)
    }
}

// ---------------------------------------------------------------------------
// ObservationSpace
// ---------------------------------------------------------------------------

/// The set of observations an element can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObservationSpace {
    /// Per-scalar closed interval bounds; `low` and `high` have equal
    /// length and that length is the observation length.
    Box { low: Vec<f32>, high: Vec<f32> },
    /// `n` scalars, each 0.0 or 1.0.
    MultiBinary { n: usize },
    /// Row-major pixel data, one scalar per byte.
    Image { height: u32, width: u32, channels: u32 },
    /// One sub-space per element name.
    Dict { spaces: HashMap<String, Self> },
}

impl ObservationSpace {
    /// Total scalar count; for a dict, the sum over its sub-spaces.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Box { low, .. } => low.len(),
            Self::MultiBinary { n } => *n,
            Self::Image {
                height,
                width,
                channels,
            } => *height as usize * *width as usize * *channels as usize,
            Self::Dict { spaces } => spaces.values().map(Self::size).sum(),
        }
    }

    /// Whether `observation` has the right length and every scalar is in
    /// range. Image and dict spaces only check what they can: images
    /// check length, dicts accept anything (check sub-spaces directly).
    #[must_use]
    pub fn contains(&self, observation: &Observation) -> bool {
        match self {
            Self::Box { low, high } => {
                observation.len() == low.len()
                    && low
                        .iter()
                        .zip(high)
                        .zip(observation.as_slice())
                        .all(|((lo, hi), value)| (*lo..=*hi).contains(value))
            }
            Self::MultiBinary { n } => {
                observation.len() == *n
                    && observation
                        .as_slice()
                        .iter()
                        .all(|value| *value == 0.0 || *value == 1.0)
            }
            Self::Image { .. } => observation.len() == self.size(),
            Self::Dict { .. } => true,
        }
    }
}

// ---------------------------------------------------------------------------
// ActionSpace
// ---------------------------------------------------------------------------

/// The set of actions an element accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActionSpace {
    /// Continuous actions with per-scalar closed interval bounds.
    Box { low: Vec<f32>, high: Vec<f32> },
    /// Discrete choices in `[0, n)`.
    Discrete { n: usize },
    /// One sub-space per element name.
    Dict { spaces: HashMap<String, Self> },
}

impl ActionSpace {
    /// Total scalar count; a discrete choice counts as one.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Box { low, .. } => low.len(),
            Self::Discrete { .. } => 1,
            Self::Dict { spaces } => spaces.values().map(Self::size).sum(),
        }
    }

    /// Draw a uniform random action from this space.
    ///
    /// # Panics
    ///
    /// Dict spaces have no single action type; sample their sub-spaces
    /// one element at a time.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample(&self, rng: &mut impl rand::Rng) -> Action {
        match self {
            Self::Box { low, high } => Action::Continuous(
                low.iter()
                    .zip(high)
                    .map(|(lo, hi)| rng.gen_range(*lo..=*hi))
                    .collect(),
            ),
            Self::Discrete { n } => Action::Discrete(rng.gen_range(0..*n as u64)),
            Self::Dict { .. } => panic!("cannot sample a dict space; sample per element"),
        }
    }

    /// Whether `action` is the right kind, length and range for this
    /// space. Dict spaces match nothing directly.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn contains(&self, action: &Action) -> bool {
        match (self, action) {
            (Self::Box { low, high }, Action::Continuous(values)) => {
                values.len() == low.len()
                    && low
                        .iter()
                        .zip(high)
                        .zip(values)
                        .all(|((lo, hi), value)| (*lo..=*hi).contains(value))
            }
            (Self::Discrete { n }, Action::Discrete(choice)) => (*choice as usize) < *n,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Step and reset results
// ---------------------------------------------------------------------------

/// What one `step` call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// One observation per element, keyed by element name.
    pub observations: HashMap<String, Observation>,
    pub reward: f32,
    /// The task itself ended the episode.
    pub terminated: bool,
    /// The step limit ended the episode.
    pub truncated: bool,
    pub info: StepInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepInfo {
    pub episode_length: u32,
    pub episode_reward: f32,
    pub custom: HashMap<String, f32>,
}

/// What one `reset` call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResult {
    /// One observation per element, keyed by element name.
    pub observations: HashMap<String, Observation>,
    pub info: ResetInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetInfo {
    pub seed: Option<u64>,
    pub custom: HashMap<String, f32>,
}

/// One flat vector over all elements, concatenated in ascending
/// element-name order so the layout is stable across steps.
#[must_use]
pub fn flatten_observations(observations: &HashMap<String, Observation>) -> Observation {
    let mut entries: Vec<(&String, &Observation)> = observations.iter().collect();
    entries.sort_by_key(|(name, _)| name.as_str());

    let total = entries.iter().map(|(_, obs)| obs.len()).sum();
    let mut data = Vec::with_capacity(total);
    for (_, observation) in entries {
        data.extend_from_slice(observation.as_slice());
    }
    Observation::new(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(len: usize) -> (Vec<f32>, Vec<f32>) {
        (vec![-1.0; len], vec![1.0; len])
    }

    // ---- Observation ----

    #[test]
    fn observation_basics() {
        let obs = Observation::new(vec![0.25, -0.75]);
        assert_eq!(obs.len(), 2);
        assert!(!obs.is_empty());
        assert_eq!(obs.as_slice(), &[0.25, -0.75]);
        assert!((obs[1] + 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn observation_from_vec_and_iterator() {
        let from_vec: Observation = vec![1.5, 2.5].into();
        let collected: Observation = [1.5, 2.5].into_iter().collect();
        assert_eq!(from_vec, collected);
    }

    #[test]
    fn observation_serde_roundtrip() {
        let obs = Observation::new(vec![0.5, 99.0]);
        let json = serde_json::to_string(&obs).unwrap();
        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(obs, back);
    }

    // ---- Action ----

    #[test]
    fn action_validate_passes_finite_values() {
        assert!(Action::Continuous(vec![-3.5, 0.0, 2.0]).validate().is_ok());
        assert!(Action::Discrete(u64::MAX).validate().is_ok());
    }

    #[test]
    fn action_validate_catches_nan_and_inf() {
        let nan = Action::Continuous(vec![0.0, f32::NAN]);
        assert_eq!(nan.validate(), Err(ValidationError::ActionContainsNan));

        let inf = Action::Continuous(vec![f32::NEG_INFINITY]);
        assert_eq!(inf.validate(), Err(ValidationError::ActionContainsInf));
    }

    #[test]
    fn action_from_vec_is_continuous() {
        let action: Action = vec![0.5].into();
        assert_eq!(action, Action::Continuous(vec![0.5]));
    }

    #[test]
    fn action_serde_roundtrip() {
        for action in [Action::Continuous(vec![0.25]), Action::Discrete(3)] {
            let json = serde_json::to_string(&action).unwrap();
            let back: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(action, back);
        }
    }

    // ---- ObservationSpace ----

    #[test]
    fn observation_space_sizes() {
        let (low, high) = unit_box(4);
        assert_eq!(ObservationSpace::Box { low, high }.size(), 4);
        assert_eq!(ObservationSpace::MultiBinary { n: 2 }.size(), 2);
        assert_eq!(
            ObservationSpace::Image {
                height: 8,
                width: 8,
                channels: 3
            }
            .size(),
            192
        );
    }

    #[test]
    fn observation_space_dict_size_sums_children() {
        let (low, high) = unit_box(6);
        let mut spaces = HashMap::new();
        spaces.insert("joints".to_string(), ObservationSpace::Box { low, high });
        spaces.insert("suction".to_string(), ObservationSpace::MultiBinary { n: 1 });
        assert_eq!(ObservationSpace::Dict { spaces }.size(), 7);
    }

    #[test]
    fn box_space_bounds_and_length_checked() {
        let (low, high) = unit_box(2);
        let space = ObservationSpace::Box { low, high };
        assert!(space.contains(&Observation::new(vec![-1.0, 1.0])));
        assert!(!space.contains(&Observation::new(vec![-1.0, 1.01])));
        assert!(!space.contains(&Observation::new(vec![0.0])));
    }

    #[test]
    fn multi_binary_space_rejects_fractions() {
        let space = ObservationSpace::MultiBinary { n: 2 };
        assert!(space.contains(&Observation::new(vec![1.0, 0.0])));
        assert!(!space.contains(&Observation::new(vec![1.0, 0.25])));
        assert!(!space.contains(&Observation::new(vec![1.0])));
    }

    #[test]
    fn image_space_checks_length_only() {
        let space = ObservationSpace::Image {
            height: 1,
            width: 2,
            channels: 1,
        };
        assert!(space.contains(&Observation::new(vec![0.0, 255.0])));
        assert!(!space.contains(&Observation::new(vec![0.0])));
    }

    // ---- ActionSpace ----

    #[test]
    fn action_space_sizes() {
        let (low, high) = unit_box(3);
        assert_eq!(ActionSpace::Box { low, high }.size(), 3);
        assert_eq!(ActionSpace::Discrete { n: 9 }.size(), 1);
    }

    #[test]
    fn sampled_actions_stay_in_their_space() {
        let (low, high) = unit_box(5);
        let boxed = ActionSpace::Box { low, high };
        let discrete = ActionSpace::Discrete { n: 4 };
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            assert!(boxed.contains(&boxed.sample(&mut rng)));
            assert!(discrete.contains(&discrete.sample(&mut rng)));
        }
    }

    #[test]
    #[should_panic(expected = "cannot sample a dict space")]
    fn sampling_a_dict_space_panics() {
        let space = ActionSpace::Dict {
            spaces: HashMap::new(),
        };
        let _ = space.sample(&mut rand::thread_rng());
    }

    #[test]
    fn action_space_contains_rejects_kind_mismatch() {
        let (low, high) = unit_box(1);
        let boxed = ActionSpace::Box { low, high };
        assert!(boxed.contains(&Action::Continuous(vec![0.5])));
        assert!(!boxed.contains(&Action::Discrete(0)));

        let discrete = ActionSpace::Discrete { n: 3 };
        assert!(discrete.contains(&Action::Discrete(2)));
        assert!(!discrete.contains(&Action::Discrete(3)));
        assert!(!discrete.contains(&Action::Continuous(vec![2.0])));
    }

    // ---- step/reset results ----

    #[test]
    fn step_result_serde_roundtrip() {
        let mut observations = HashMap::new();
        observations.insert("joints".to_string(), Observation::new(vec![0.3]));
        let result = StepResult {
            observations,
            reward: -0.125,
            terminated: false,
            truncated: true,
            info: StepInfo {
                episode_length: 12,
                episode_reward: -1.5,
                custom: HashMap::new(),
            },
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: StepResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.observations, result.observations);
        assert!(back.truncated);
        assert_eq!(back.info.episode_length, 12);
    }

    #[test]
    fn reset_info_carries_seed() {
        let result = ResetResult {
            observations: HashMap::new(),
            info: ResetInfo {
                seed: Some(1234),
                custom: HashMap::new(),
            },
        };
        assert_eq!(result.info.seed, Some(1234));
    }

    // ---- flatten_observations ----

    #[test]
    fn flatten_concatenates_in_name_order() {
        let mut observations = HashMap::new();
        observations.insert("wrist_cam".to_string(), Observation::new(vec![9.0]));
        observations.insert("joints".to_string(), Observation::new(vec![0.5, 0.6]));
        observations.insert("suction".to_string(), Observation::new(vec![1.0]));
        let flat = flatten_observations(&observations);
        // joints < suction < wrist_cam
        assert_eq!(flat.as_slice(), &[0.5, 0.6, 1.0, 9.0]);
    }

    #[test]
    fn flatten_of_nothing_is_empty() {
        assert!(flatten_observations(&HashMap::new()).is_empty());
    }
}
