//! Step/reset environment over a connected host.

use std::collections::HashMap;
use std::sync::Arc;

use log::{info, warn};

use robolink_core::config::SessionConfig;
use robolink_core::error::{DeviceError, RobolinkError, ValidationError};
use robolink_core::types::{
    Action, ActionSpace, Observation, ObservationSpace, ResetInfo, ResetResult, StepInfo,
    StepResult,
};
use robolink_host::host::Host;

use crate::elements::{Element, validate_element_names};

/// Reward hook: maps the step's observation dictionary to a scalar.
pub type RewardFn = dyn Fn(&HashMap<String, Observation>) -> f32 + Send + Sync;

// ---------------------------------------------------------------------------
// RobotEnv
// ---------------------------------------------------------------------------

/// A Gymnasium-style environment over a [`Host`].
///
/// Each element contributes one entry to the observation dictionary and,
/// for controllable devices, one entry to the action dictionary. The env
/// has no task semantics of its own: `terminated` is always false and
/// reward is 0 unless a [`RewardFn`] is installed. Episodes truncate at
/// `max_episode_steps` from the session config.
pub struct RobotEnv {
    host: Arc<dyn Host>,
    elements: Vec<Element>,
    config: SessionConfig,
    step_count: u32,
    episode_reward: f32,
    reward_fn: Option<Box<RewardFn>>,
}

impl RobotEnv {
    /// Build an env over `host` with the given elements.
    ///
    /// Fails when the config is invalid or element names are not unique
    /// identifier-like keys.
    pub fn new(
        host: Arc<dyn Host>,
        elements: Vec<Element>,
        config: SessionConfig,
    ) -> Result<Self, RobolinkError> {
        config.validate()?;
        validate_element_names(&elements)?;
        info!(
            "env {} ready with {} elements",
            config.env_id,
            elements.len()
        );
        Ok(Self {
            host,
            elements,
            config,
            step_count: 0,
            episode_reward: 0.0,
            reward_fn: None,
        })
    }

    /// Install a reward hook evaluated on every step's observations.
    #[must_use]
    pub fn with_reward_fn(mut self, reward_fn: Box<RewardFn>) -> Self {
        self.reward_fn = Some(reward_fn);
        self
    }

    /// Steps taken since the last reset.
    #[must_use]
    pub const fn step_count(&self) -> u32 {
        self.step_count
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Composite observation space, one sub-space per element.
    #[must_use]
    pub fn observation_space(&self) -> ObservationSpace {
        let spaces = self
            .elements
            .iter()
            .map(|e| (e.name().to_string(), e.observation_space()))
            .collect();
        ObservationSpace::Dict { spaces }
    }

    /// Composite action space over the controllable elements.
    #[must_use]
    pub fn action_space(&self) -> ActionSpace {
        let spaces = self
            .elements
            .iter()
            .filter_map(|e| e.action_space().map(|s| (e.name().to_string(), s)))
            .collect();
        ActionSpace::Dict { spaces }
    }

    /// Reset the host session and return the initial observations.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<ResetResult, RobolinkError> {
        self.host.reset().map_err(RobolinkError::Device)?;
        self.step_count = 0;
        self.episode_reward = 0.0;
        let observations = self.observe()?;
        Ok(ResetResult {
            observations,
            info: ResetInfo {
                seed,
                custom: HashMap::new(),
            },
        })
    }

    /// Apply one action dictionary and observe the result.
    ///
    /// Every controllable element must have an action under its name and
    /// no extra keys are allowed. A command the host rejects is reported
    /// in the log and the episode continues; transport failures are
    /// errors.
    pub fn step(&mut self, actions: &HashMap<String, Action>) -> Result<StepResult, RobolinkError> {
        self.validate_actions(actions)?;

        for element in &self.elements {
            if let Some(action) = actions.get(element.name()) {
                self.apply(element, action)?;
            }
        }

        let observations = self.observe()?;
        self.step_count += 1;
        let truncated = self.step_count >= self.config.max_episode_steps;
        let reward = self
            .reward_fn
            .as_ref()
            .map_or(0.0, |reward_fn| reward_fn(&observations));
        self.episode_reward += reward;

        Ok(StepResult {
            observations,
            reward,
            terminated: false,
            truncated,
            info: StepInfo {
                episode_length: self.step_count,
                episode_reward: self.episode_reward,
                custom: HashMap::new(),
            },
        })
    }

    /// Close the underlying host.
    pub fn close(&self) -> Result<(), RobolinkError> {
        self.host.close().map_err(RobolinkError::Device)
    }

    // ---- internals ----

    fn validate_actions(&self, actions: &HashMap<String, Action>) -> Result<(), RobolinkError> {
        for name in actions.keys() {
            let known = self
                .elements
                .iter()
                .any(|e| e.name() == name && e.action_space().is_some());
            if !known {
                return Err(ValidationError::UnknownElementAction(name.clone()).into());
            }
        }

        for element in &self.elements {
            let Some(space) = element.action_space() else {
                continue;
            };
            let Some(action) = actions.get(element.name()) else {
                return Err(
                    ValidationError::MissingElementAction(element.name().to_string()).into(),
                );
            };
            action.validate().map_err(RobolinkError::Validation)?;
            match (&space, action) {
                (ActionSpace::Box { low, .. }, Action::Continuous(values)) => {
                    if values.len() != low.len() {
                        return Err(ValidationError::ActionDimMismatch {
                            element: element.name().to_string(),
                            expected: low.len(),
                            got: values.len(),
                        }
                        .into());
                    }
                }
                (ActionSpace::Discrete { n }, Action::Discrete(value)) => {
                    if *value as usize >= *n {
                        return Err(ValidationError::DiscreteOutOfRange {
                            value: *value,
                            max: *n,
                        }
                        .into());
                    }
                }
                (ActionSpace::Box { .. }, Action::Discrete(_)) => {
                    return Err(ValidationError::ActionTypeMismatch {
                        element: element.name().to_string(),
                        expected: "continuous",
                    }
                    .into());
                }
                (ActionSpace::Discrete { .. } | ActionSpace::Dict { .. }, _) => {
                    return Err(ValidationError::ActionTypeMismatch {
                        element: element.name().to_string(),
                        expected: "discrete",
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn apply(&self, element: &Element, action: &Action) -> Result<(), RobolinkError> {
        match (element, action) {
            (Element::Arm(_), Action::Continuous(values)) => {
                let arm = self.host.arm().ok_or_else(|| missing("arm", "to_joints"))?;
                let joints: Vec<f64> = values.iter().map(|v| f64::from(*v)).collect();
                let status = arm.to_joints(&joints).map_err(RobolinkError::Device)?;
                if status.is_error() {
                    warn!(
                        "arm command for {:?} failed: {:?} {}",
                        element.name(),
                        status.kind,
                        status.message
                    );
                }
            }
            (Element::Vacuum(_), Action::Discrete(value)) => {
                let vacuum = self.host.vacuum().ok_or_else(|| missing("vacuum", "set"))?;
                let status = vacuum.set(*value == 1).map_err(RobolinkError::Device)?;
                if status.is_error() {
                    warn!(
                        "vacuum command for {:?} failed: {:?} {}",
                        element.name(),
                        status.kind,
                        status.message
                    );
                }
            }
            // validate_actions has already rejected other combinations
            _ => {}
        }
        Ok(())
    }

    fn observe(&self) -> Result<HashMap<String, Observation>, RobolinkError> {
        let timeout = self.config.read_timeout();
        let mut observations = HashMap::with_capacity(self.elements.len());
        for element in &self.elements {
            let observation = match element {
                Element::Arm(config) => {
                    let arm = self.host.arm().ok_or_else(|| missing("arm", "state"))?;
                    let state = if config.is_synchronous {
                        arm.fetch_state(timeout)
                    } else {
                        arm.state()
                    }
                    .map_err(RobolinkError::Device)?;
                    config.to_observation(&state)
                }
                Element::Vacuum(_) => {
                    let vacuum = self.host.vacuum().ok_or_else(|| missing("vacuum", "state"))?;
                    let state = vacuum.state().map_err(RobolinkError::Device)?;
                    crate::elements::VacuumElement::to_observation(&state)
                }
                Element::ColorCamera(config) => {
                    let camera = self
                        .host
                        .color_camera()
                        .ok_or_else(|| missing("color_camera", "image"))?;
                    let frame = if config.is_synchronous {
                        camera.fetch_image(timeout)
                    } else {
                        camera.image()
                    }
                    .map_err(RobolinkError::Device)?;
                    config.to_observation(&frame)
                }
                Element::TextInstructions(config) => {
                    let text = self
                        .host
                        .text_instructions()
                        .ok_or_else(|| missing("text_instructions", "instruction"))?;
                    let instruction = text.instruction().map_err(RobolinkError::Device)?;
                    config.to_observation(&instruction)
                }
            };
            observations.insert(element.name().to_string(), observation);
        }
        Ok(observations)
    }
}

fn missing(device: &str, operation: &str) -> RobolinkError {
    RobolinkError::Device(DeviceError::NotSupported {
        device: device.to_string(),
        operation: operation.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ArmElement, ColorCameraElement, TextInstructionsElement, VacuumElement};
    use robolink_core::types::flatten_observations;
    use robolink_host::arm::ArmState;
    use robolink_host::types::CommandStatus;
    use robolink_host::vacuum::VacuumState;
    use robolink_mock::{ExhaustionPolicy, MockHost, PlaybackScript, Reading};

    fn small_config() -> SessionConfig {
        SessionConfig {
            max_episode_steps: 3,
            ..SessionConfig::default()
        }
    }

    fn arm_vacuum_elements() -> Vec<Element> {
        vec![
            Element::Arm(ArmElement::new("arm")),
            Element::Vacuum(VacuumElement::new("vacuum")),
        ]
    }

    fn full_actions() -> HashMap<String, Action> {
        let mut actions = HashMap::new();
        actions.insert("arm".to_string(), Action::Continuous(vec![0.0; 6]));
        actions.insert("vacuum".to_string(), Action::Discrete(1));
        actions
    }

    fn idle_env(elements: Vec<Element>) -> RobotEnv {
        let host = Arc::new(MockHost::idle().unwrap());
        RobotEnv::new(host, elements, small_config()).unwrap()
    }

    fn script_one(component: &str, method: &str, values: Vec<Reading>) -> PlaybackScript<Reading> {
        let mut methods = HashMap::new();
        methods.insert(method.to_string(), values);
        let mut script = HashMap::new();
        script.insert(component.to_string(), methods);
        script
    }

    fn arm_state(angle: f64) -> Reading {
        Reading::Arm(ArmState {
            joint_angles: vec![angle; 6],
            ..ArmState::default()
        })
    }

    #[test]
    fn reset_returns_observations_for_every_element() {
        let mut env = idle_env(arm_vacuum_elements());
        let result = env.reset(Some(7)).unwrap();
        assert_eq!(result.observations.len(), 2);
        assert_eq!(result.observations["arm"].len(), 6);
        assert_eq!(result.observations["vacuum"].len(), 1);
        assert_eq!(result.info.seed, Some(7));
    }

    #[test]
    fn step_counts_and_truncates_at_max_steps() {
        let mut env = idle_env(arm_vacuum_elements());
        env.reset(None).unwrap();

        let actions = full_actions();
        assert!(!env.step(&actions).unwrap().truncated);
        assert!(!env.step(&actions).unwrap().truncated);
        let result = env.step(&actions).unwrap();
        assert!(result.truncated);
        assert!(!result.terminated);
        assert_eq!(result.info.episode_length, 3);

        // reset rewinds the step counter
        env.reset(None).unwrap();
        assert_eq!(env.step_count(), 0);
    }

    #[test]
    fn scripted_arm_states_flow_into_observations() {
        let script = script_one("arm", "state", vec![arm_state(0.5), arm_state(1.5)]);
        let host = Arc::new(MockHost::build(script, ExhaustionPolicy::StickyLast).unwrap());
        let mut env = RobotEnv::new(
            host,
            vec![Element::Arm(ArmElement::new("arm"))],
            small_config(),
        )
        .unwrap();

        let obs = env.reset(None).unwrap().observations;
        assert!((obs["arm"][0] - 0.5).abs() < 1e-6);

        let actions: HashMap<String, Action> =
            [("arm".to_string(), Action::Continuous(vec![0.0; 6]))].into();
        let obs = env.step(&actions).unwrap().observations;
        assert!((obs["arm"][0] - 1.5).abs() < 1e-6);
        // sticky-last keeps serving the final state
        let obs = env.step(&actions).unwrap().observations;
        assert!((obs["arm"][0] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn exhausted_script_surfaces_as_device_error() {
        let script = script_one("arm", "state", vec![arm_state(0.5)]);
        let host = Arc::new(MockHost::build(script, ExhaustionPolicy::Signal).unwrap());
        let mut env = RobotEnv::new(
            host,
            vec![Element::Arm(ArmElement::new("arm"))],
            small_config(),
        )
        .unwrap();

        env.reset(None).unwrap();
        let actions: HashMap<String, Action> =
            [("arm".to_string(), Action::Continuous(vec![0.0; 6]))].into();
        let err = env.step(&actions).unwrap_err();
        assert!(matches!(
            err,
            RobolinkError::Device(DeviceError::Playback { .. })
        ));
    }

    #[test]
    fn missing_action_rejected() {
        let mut env = idle_env(arm_vacuum_elements());
        env.reset(None).unwrap();
        let mut actions = full_actions();
        actions.remove("vacuum");
        let err = env.step(&actions).unwrap_err();
        assert!(matches!(
            err,
            RobolinkError::Validation(ValidationError::MissingElementAction(_))
        ));
    }

    #[test]
    fn unknown_action_key_rejected() {
        let mut env = idle_env(arm_vacuum_elements());
        env.reset(None).unwrap();
        let mut actions = full_actions();
        actions.insert("gripper".to_string(), Action::Discrete(0));
        let err = env.step(&actions).unwrap_err();
        assert!(matches!(
            err,
            RobolinkError::Validation(ValidationError::UnknownElementAction(_))
        ));
    }

    #[test]
    fn action_for_observation_only_element_rejected() {
        let mut env = idle_env(vec![Element::TextInstructions(TextInstructionsElement::new(
            "text",
        ))]);
        env.reset(None).unwrap();
        let actions: HashMap<String, Action> =
            [("text".to_string(), Action::Discrete(0))].into();
        let err = env.step(&actions).unwrap_err();
        assert!(matches!(
            err,
            RobolinkError::Validation(ValidationError::UnknownElementAction(_))
        ));
    }

    #[test]
    fn wrong_dimension_rejected() {
        let mut env = idle_env(arm_vacuum_elements());
        env.reset(None).unwrap();
        let mut actions = full_actions();
        actions.insert("arm".to_string(), Action::Continuous(vec![0.0; 4]));
        let err = env.step(&actions).unwrap_err();
        assert!(matches!(
            err,
            RobolinkError::Validation(ValidationError::ActionDimMismatch {
                expected: 6,
                got: 4,
                ..
            })
        ));
    }

    #[test]
    fn wrong_type_rejected() {
        let mut env = idle_env(arm_vacuum_elements());
        env.reset(None).unwrap();
        let mut actions = full_actions();
        actions.insert("arm".to_string(), Action::Discrete(0));
        let err = env.step(&actions).unwrap_err();
        assert!(matches!(
            err,
            RobolinkError::Validation(ValidationError::ActionTypeMismatch { .. })
        ));
    }

    #[test]
    fn discrete_out_of_range_rejected() {
        let mut env = idle_env(arm_vacuum_elements());
        env.reset(None).unwrap();
        let mut actions = full_actions();
        actions.insert("vacuum".to_string(), Action::Discrete(2));
        let err = env.step(&actions).unwrap_err();
        assert!(matches!(
            err,
            RobolinkError::Validation(ValidationError::DiscreteOutOfRange { value: 2, max: 2 })
        ));
    }

    #[test]
    fn nan_action_rejected() {
        let mut env = idle_env(arm_vacuum_elements());
        env.reset(None).unwrap();
        let mut actions = full_actions();
        actions.insert(
            "arm".to_string(),
            Action::Continuous(vec![f32::NAN, 0.0, 0.0, 0.0, 0.0, 0.0]),
        );
        let err = env.step(&actions).unwrap_err();
        assert!(matches!(
            err,
            RobolinkError::Validation(ValidationError::ActionContainsNan)
        ));
    }

    #[test]
    fn rejected_command_status_does_not_fail_the_step() {
        let script = script_one(
            "arm",
            "to_joints",
            vec![Reading::Status(CommandStatus::rejected("joint limit"))],
        );
        let host = Arc::new(MockHost::build(script, ExhaustionPolicy::StickyLast).unwrap());
        let mut env = RobotEnv::new(
            host,
            vec![Element::Arm(ArmElement::new("arm"))],
            small_config(),
        )
        .unwrap();
        env.reset(None).unwrap();
        let actions: HashMap<String, Action> =
            [("arm".to_string(), Action::Continuous(vec![0.0; 6]))].into();
        assert!(env.step(&actions).is_ok());
    }

    #[test]
    fn vacuum_action_routes_to_set() {
        let script = script_one(
            "vacuum",
            "state",
            vec![
                Reading::Vacuum(VacuumState::default()),
                Reading::Vacuum(VacuumState {
                    state: true,
                    ..VacuumState::default()
                }),
            ],
        );
        let host = Arc::new(MockHost::build(script, ExhaustionPolicy::StickyLast).unwrap());
        let mut env = RobotEnv::new(
            host,
            vec![Element::Vacuum(VacuumElement::new("vacuum"))],
            small_config(),
        )
        .unwrap();

        let obs = env.reset(None).unwrap().observations;
        assert!((obs["vacuum"][0] - 0.0).abs() < f32::EPSILON);

        let actions: HashMap<String, Action> =
            [("vacuum".to_string(), Action::Discrete(1))].into();
        let obs = env.step(&actions).unwrap().observations;
        assert!((obs["vacuum"][0] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reward_fn_drives_reward_and_accumulates() {
        let mut env = idle_env(arm_vacuum_elements())
            .with_reward_fn(Box::new(|_| 0.5));
        env.reset(None).unwrap();
        let actions = full_actions();
        let result = env.step(&actions).unwrap();
        assert!((result.reward - 0.5).abs() < f32::EPSILON);
        let result = env.step(&actions).unwrap();
        assert!((result.info.episode_reward - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn spaces_reflect_elements() {
        let env = idle_env(vec![
            Element::Arm(ArmElement::new("arm")),
            Element::ColorCamera(ColorCameraElement::new("cam", 2, 2)),
        ]);
        let ObservationSpace::Dict { spaces } = env.observation_space() else {
            panic!("expected a dict space");
        };
        assert_eq!(spaces.len(), 2);
        let ActionSpace::Dict { spaces } = env.action_space() else {
            panic!("expected a dict space");
        };
        // the camera is observation-only
        assert_eq!(spaces.len(), 1);
        assert!(spaces.contains_key("arm"));
    }

    #[test]
    fn invalid_element_names_fail_construction() {
        let host: Arc<dyn Host> = Arc::new(MockHost::idle().unwrap());
        let err = RobotEnv::new(
            Arc::clone(&host),
            vec![Element::Arm(ArmElement::new("bad name"))],
            small_config(),
        )
        .map(|_| ())
        .unwrap_err();
        assert!(matches!(err, RobolinkError::Config(_)));

        let err = RobotEnv::new(
            host,
            vec![
                Element::Arm(ArmElement::new("arm")),
                Element::Vacuum(VacuumElement::new("arm")),
            ],
            small_config(),
        )
        .map(|_| ())
        .unwrap_err();
        assert!(matches!(err, RobolinkError::Config(_)));
    }

    #[test]
    fn flattened_observation_orders_by_name() {
        let mut env = idle_env(arm_vacuum_elements());
        let obs = env.reset(None).unwrap().observations;
        let flat = flatten_observations(&obs);
        // "arm" (6) sorts before "vacuum" (1)
        assert_eq!(flat.len(), 7);
    }

    #[test]
    fn close_closes_the_host() {
        let host = Arc::new(MockHost::idle().unwrap());
        let env = RobotEnv::new(
            Arc::clone(&host) as Arc<dyn Host>,
            arm_vacuum_elements(),
            small_config(),
        )
        .unwrap();
        env.close().unwrap();
        assert!(host.is_closed());
    }
}
