//! Session protocol tests against a scripted in-memory simulator.
use anyhow::Result;
use mallow_core::{error::EnvError, Env as _};
use mallow_env::{
    ClientError, Frame, MalmoAct, MalmoEnv, MalmoEnvConfig, RewardSignal, SimulatorClient,
    WorldState,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A simulator client that replays a scripted sequence of world states
/// and records every command it is sent.
struct ScriptedClient {
    states: VecDeque<WorldState>,
    sent: Rc<RefCell<Vec<String>>>,
    connected: bool,
    mission_over: bool,
    drop_connection_after: Option<usize>,
}

impl ScriptedClient {
    fn new(states: Vec<WorldState>) -> Self {
        Self {
            states: states.into(),
            sent: Rc::new(RefCell::new(Vec::new())),
            connected: false,
            mission_over: false,
            drop_connection_after: None,
        }
    }

    fn command_log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.sent)
    }
}

impl SimulatorClient for ScriptedClient {
    fn connect(&mut self, _role: usize) -> Result<(), ClientError> {
        self.connected = true;
        Ok(())
    }

    fn send_command(&mut self, command: &str) -> Result<(), ClientError> {
        if let Some(limit) = self.drop_connection_after {
            if self.sent.borrow().len() >= limit {
                return Err(ClientError::Disconnected("peer went away".into()));
            }
        }
        self.sent.borrow_mut().push(command.to_string());
        Ok(())
    }

    fn await_next_tick(&mut self) -> Result<WorldState, ClientError> {
        if !self.connected {
            return Err(ClientError::Disconnected("not connected".into()));
        }
        let state = self
            .states
            .pop_front()
            .ok_or_else(|| ClientError::Disconnected("script exhausted".into()))?;
        if state.is_terminal {
            self.mission_over = true;
        }
        Ok(state)
    }

    fn is_mission_over(&self) -> bool {
        self.mission_over
    }
}

fn tick(n: u64) -> WorldState {
    WorldState {
        tick: n,
        ..WorldState::default()
    }
}

fn tick_with_frame(n: u64) -> WorldState {
    WorldState {
        tick: n,
        frame: Some(Frame {
            width: 64,
            height: 64,
            data: vec![128; 64 * 64 * 3],
        }),
        ..WorldState::default()
    }
}

fn terminal_tick(n: u64) -> WorldState {
    WorldState {
        tick: n,
        is_terminal: true,
        ..WorldState::default()
    }
}

fn classroom_config() -> MalmoEnvConfig {
    MalmoEnvConfig::default()
        .name("classroom")
        .discrete_actions(&["move 1", "move -1", "turn 1", "turn -1"])
        .visual(32, 32, true)
}

#[test]
fn step_before_reset_is_an_invalid_state() {
    let client = ScriptedClient::new(vec![tick(0)]);
    let mut env = MalmoEnv::build(&classroom_config(), client, 0).unwrap();

    let err = env.step(&MalmoAct::Discrete(0)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EnvError>(),
        Some(EnvError::InvalidState(_))
    ));
}

#[test]
fn full_episode_runs_the_documented_scenario() -> Result<()> {
    let _ = env_logger::try_init();

    // reset + three live steps + one terminal step.
    let client = ScriptedClient::new(vec![
        tick(0),
        tick_with_frame(1),
        tick(2),
        tick_with_frame(3),
        terminal_tick(4),
    ]);
    let mut env = MalmoEnv::build(&classroom_config(), client, 0)?;

    env.reset()?;
    assert_eq!(env.action_count(), 4);

    let mut counts = Vec::new();
    for _ in 0..3 {
        let (step, _) = env.step(&MalmoAct::Discrete(1))?;
        // Zero-or-real 32x32x1 observation, whether a frame arrived or
        // not.
        assert_eq!(step.obs.pixels().unwrap().shape(), &[32, 32, 1]);
        assert!(!step.is_done);
        counts.push(env.episode_action_count());
    }
    assert_eq!(counts, vec![1, 2, 3]);

    let (step, record) = env.step(&MalmoAct::Discrete(1))?;
    assert!(step.is_done);
    assert!(record.get_scalar("episode_return").is_ok());
    // Steps are debug-printable, which unwrap_err on step results
    // relies on.
    assert!(format!("{:?}", step).contains("is_done"));

    let err = env.step(&MalmoAct::Discrete(1)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EnvError>(),
        Some(EnvError::InvalidState(_))
    ));
    Ok(())
}

#[test]
fn reward_signals_sum_order_independently() -> Result<()> {
    let rewards = vec![
        RewardSignal::new("touch", 20.0),
        RewardSignal::new("command", -1.0),
        RewardSignal::new("goal", 1000.0),
    ];

    for rotation in 0..3 {
        let mut signals = rewards.clone();
        signals.rotate_left(rotation);
        let world = WorldState {
            tick: 1,
            rewards: signals,
            ..WorldState::default()
        };

        let client = ScriptedClient::new(vec![tick(0), world]);
        let mut env = MalmoEnv::build(&classroom_config(), client, 0)?;
        env.reset()?;
        let (step, _) = env.step(&MalmoAct::Discrete(0))?;
        assert_eq!(step.reward, 1019.0);
    }
    Ok(())
}

#[test]
fn stateful_commands_are_cancelled_before_the_next_set() -> Result<()> {
    let config = MalmoEnvConfig::default()
        .name("toggles")
        .discrete_actions(&["use 1", "move 1"]);
    let client = ScriptedClient::new(vec![tick(0), tick(1), tick(2), tick(3)]);
    let log = client.command_log();
    let mut env = MalmoEnv::build(&config, client, 0)?;

    env.reset()?;
    env.step(&MalmoAct::Discrete(0))?; // toggle on
    env.step(&MalmoAct::Discrete(0))?; // identical: no cancel
    env.step(&MalmoAct::Discrete(1))?; // differs: cancel first

    assert_eq!(
        *log.borrow(),
        vec![
            "use 1".to_string(),
            "use 1".to_string(),
            "use 0".to_string(),
            "move 1".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn invalid_action_leaves_the_episode_untouched() -> Result<()> {
    let client = ScriptedClient::new(vec![tick(0), tick(1)]);
    let log = client.command_log();
    let mut env = MalmoEnv::build(&classroom_config(), client, 0)?;

    env.reset()?;
    let err = env.step(&MalmoAct::Discrete(7)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EnvError>(),
        Some(EnvError::InvalidAction(_))
    ));
    assert!(log.borrow().is_empty());
    assert_eq!(env.episode_action_count(), 0);

    // The session is still usable with a valid action.
    let (step, _) = env.step(&MalmoAct::Discrete(0))?;
    assert!(!step.is_done);
    assert_eq!(env.episode_action_count(), 1);
    Ok(())
}

#[test]
fn connection_loss_is_fatal_until_reset() -> Result<()> {
    let mut client = ScriptedClient::new(vec![tick(0), tick(1), tick(2)]);
    client.drop_connection_after = Some(1);
    let mut env = MalmoEnv::build(&classroom_config(), client, 0)?;

    env.reset()?;
    env.step(&MalmoAct::Discrete(0))?;

    let err = env.step(&MalmoAct::Discrete(0)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EnvError>(),
        Some(EnvError::ConnectionLost(_))
    ));

    // The session is Done now; stepping again reports the state, not
    // another connection error.
    let err = env.step(&MalmoAct::Discrete(0)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EnvError>(),
        Some(EnvError::InvalidState(_))
    ));
    Ok(())
}

#[test]
fn reset_is_idempotent_and_restarts_the_episode() -> Result<()> {
    let client = ScriptedClient::new(vec![tick(0), tick(1), tick(2), tick(3)]);
    let mut env = MalmoEnv::build(&classroom_config(), client, 0)?;

    env.reset()?;
    env.step(&MalmoAct::Discrete(0))?;
    assert_eq!(env.episode_action_count(), 1);

    // Reset while Ready: permitted, clears the episode.
    env.reset()?;
    assert_eq!(env.episode_action_count(), 0);
    assert!(!env.is_done());

    let (step, _) = env.step(&MalmoAct::Discrete(2))?;
    assert!(!step.is_done);
    Ok(())
}

#[test]
fn continuous_sessions_pair_values_with_verbs() -> Result<()> {
    let config = MalmoEnvConfig::default()
        .name("classroom")
        .continuous_actions(&["move", "turn"]);
    let client = ScriptedClient::new(vec![tick(0), tick(1)]);
    let log = client.command_log();
    let mut env = MalmoEnv::build(&config, client, 0)?;

    env.reset()?;
    env.step(&MalmoAct::Continuous(vec![0.5, -1.0]))?;
    assert_eq!(
        *log.borrow(),
        vec!["move 0.5".to_string(), "turn -1".to_string()]
    );
    Ok(())
}

#[test]
fn misconfigured_sessions_fail_before_any_simulator_interaction() {
    // Zero declared actions.
    let config = MalmoEnvConfig::default().name("empty");
    let err = MalmoEnv::build(&config, ScriptedClient::new(vec![]), 0)
        .err()
        .unwrap();
    assert!(matches!(err, EnvError::Configuration(_)));

    // Role without an endpoint.
    let err = MalmoEnv::build(&classroom_config(), ScriptedClient::new(vec![]), 5)
        .err()
        .unwrap();
    assert!(matches!(err, EnvError::Configuration(_)));
}
