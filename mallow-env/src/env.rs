//! The environment session owning one simulator connection and role.
mod config;

use crate::act::{ActionTranslator, CommandSet, MalmoAct};
use crate::client::SimulatorClient;
use crate::obs::{MalmoObs, ObservationBuilder};
use anyhow::Result;
use log::{info, trace};
pub use config::MalmoEnvConfig;
use mallow_core::{error::EnvError, record::Record, Env, Info, Step};

/// Information attached to every step of a Malmo session.
///
/// Currently empty; reserved for diagnostic metadata.
#[derive(Debug)]
pub struct MalmoInfo {}

impl Info for MalmoInfo {}

/// Session lifecycle. `step()` is legal only in `Ready`.
#[derive(Clone, Copy, Debug, PartialEq)]
enum SessionState {
    Created,
    Ready,
    Done,
}

/// Per-episode mutable state, cleared on every `reset()`.
#[derive(Debug, Default)]
struct EpisodeState {
    action_count: u64,
    previous: Option<CommandSet>,
    done: bool,
    reward_total: f32,
}

impl EpisodeState {
    fn clear(&mut self) {
        self.action_count = 0;
        self.previous = None;
        self.done = false;
        self.reward_total = 0.0;
    }
}

/// An environment session on a Malmo-style simulator.
///
/// Owns one [`SimulatorClient`] connection and one mission role for its
/// whole lifetime. The per-step protocol is strict: exactly one command
/// set per tick, stateful commands cancelled before a differing set is
/// issued, and one blocking wait on the simulator's turn boundary.
pub struct MalmoEnv<C: SimulatorClient> {
    client: C,
    role: usize,
    translator: ActionTranslator,
    obs_builder: ObservationBuilder,
    state: SessionState,
    episode: EpisodeState,
    last_tick: u64,
    name: String,
    abs_max_reward: Option<f32>,
}

impl<C: SimulatorClient> MalmoEnv<C> {
    /// Builds a session over an already constructed client.
    ///
    /// The whole configuration is validated here, before any simulator
    /// interaction; a malformed one fails with
    /// [`EnvError::Configuration`].
    pub fn build(config: &MalmoEnvConfig, client: C, role: usize) -> Result<Self, EnvError> {
        if config.endpoints.is_empty() {
            return Err(EnvError::Configuration(
                "at least one simulator endpoint must be declared".into(),
            ));
        }
        if role >= config.endpoints.len() {
            return Err(EnvError::Configuration(format!(
                "role {} has no endpoint (got {})",
                role,
                config.endpoints.len()
            )));
        }
        let translator =
            ActionTranslator::build(&config.actions, config.stateful_verbs.as_deref())?;
        let obs_builder = ObservationBuilder::build(config.obs_mode.clone())?;

        Ok(Self {
            client,
            role,
            translator,
            obs_builder,
            state: SessionState::Created,
            episode: EpisodeState::default(),
            last_tick: 0,
            name: config.name.clone(),
            abs_max_reward: config.abs_max_reward,
        })
    }

    /// The mission's absolute maximum reward, if declared.
    pub fn abs_max_reward(&self) -> Option<f32> {
        self.abs_max_reward
    }

    /// The role this session occupies in the mission.
    pub fn role(&self) -> usize {
        self.role
    }

    /// Number of actions issued in the current episode.
    pub fn episode_action_count(&self) -> u64 {
        self.episode.action_count
    }

    /// `true` once the current episode ended.
    pub fn is_done(&self) -> bool {
        self.episode.done
    }

    /// Issues the cancel commands for the previous set, then the new
    /// set, in that order. One failed send is fatal to the session; no
    /// partial retry is attempted.
    fn issue_commands(&mut self, next: &CommandSet) -> Result<(), EnvError> {
        let cancels = self.translator.cancellations(self.episode.previous.as_ref(), next);
        for command in cancels.iter().chain(next.commands()) {
            trace!("MalmoEnv[{}]: send '{}'", self.role, command);
            self.client.send_command(command)?;
        }
        Ok(())
    }

    fn fatal<T>(&mut self, e: EnvError) -> Result<T, EnvError> {
        self.state = SessionState::Done;
        self.episode.done = true;
        Err(e)
    }
}

impl<C: SimulatorClient> Env for MalmoEnv<C> {
    type Config = MalmoEnvConfig;
    type Obs = MalmoObs;
    type Act = MalmoAct;
    type Info = MalmoInfo;

    /// (Re)connects the session's role and starts a fresh episode,
    /// blocking until the simulator reports an initial world state.
    fn reset(&mut self) -> Result<Self::Obs> {
        trace!("MalmoEnv[{}]::reset()", self.role);
        self.episode.clear();

        self.client
            .connect(self.role)
            .map_err(EnvError::from)?;
        let world = self.client.await_next_tick().map_err(EnvError::from)?;
        self.last_tick = world.tick;
        self.state = SessionState::Ready;

        info!(
            "MalmoEnv[{}]: mission '{}' episode started",
            self.role, self.name
        );
        Ok(self.obs_builder.build_obs(&world))
    }

    /// Runs one step of the per-tick protocol.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        trace!("MalmoEnv[{}]::step()", self.role);

        match self.state {
            SessionState::Created => {
                return Err(EnvError::InvalidState(
                    "step() called before reset()".into(),
                )
                .into())
            }
            SessionState::Done => {
                return Err(EnvError::InvalidState(
                    "step() called after the episode ended; call reset()".into(),
                )
                .into())
            }
            SessionState::Ready => {}
        }

        // Validation happens before anything is sent; on InvalidAction
        // the episode state is untouched.
        let commands = self.translator.translate(a)?;

        if let Err(e) = self.issue_commands(&commands) {
            return self.fatal(e).map_err(Into::into);
        }

        // The turn boundary: the only blocking call of the session.
        let world = match self.client.await_next_tick() {
            Ok(w) => w,
            Err(e) => return self.fatal(e.into()).map_err(Into::into),
        };
        debug_assert!(world.tick >= self.last_tick);
        self.last_tick = world.tick;

        // Reward signals are additive and order-independent.
        let reward: f32 = world.rewards.iter().map(|r| r.value).sum();
        let obs = self.obs_builder.build_obs(&world);
        let done = world.is_terminal || self.client.is_mission_over();

        self.episode.action_count += 1;
        self.episode.previous = Some(commands);
        self.episode.reward_total += reward;
        self.episode.done = done;

        let record = if done {
            self.state = SessionState::Done;
            info!(
                "MalmoEnv[{}]: episode ended after {} actions, return = {}",
                self.role, self.episode.action_count, self.episode.reward_total
            );
            Record::from_scalar("episode_return", self.episode.reward_total)
        } else {
            Record::empty()
        };

        Ok((
            Step::new(obs, a.clone(), reward, done, MalmoInfo {}),
            record,
        ))
    }

    fn action_count(&self) -> usize {
        self.translator.action_count()
    }
}
