#![warn(missing_docs)]
//! Agent variants for a Malmo-style voxel simulator.
//!
//! A closed set of agent kinds sits behind the
//! [`Agent`](mallow_core::Agent) capability interface
//! (fit/test/save/load). Selection happens once, at construction, via
//! [`AgentKind`] and [`build_agent`]; there is no runtime dispatch by
//! name past that point.
//!
//! The two learning kinds do not carry an update rule themselves: they
//! drive the observation window and the
//! [`BatchProcessor`](mallow_env::BatchProcessor) and hand the
//! normalized tensors to an externally supplied [`Learner`].
mod learner;
mod observer;
mod random;

pub use learner::{Learner, LearnerAgent, LearnerAgentConfig};
pub use observer::ObserverAgent;
pub use random::{RandomAgent, RandomAgentConfig};

use anyhow::Result;
use mallow_core::{error::EnvError, Agent, Configurable};
use mallow_env::{MalmoEnv, SimulatorClient};
use std::fmt;
use std::str::FromStr;

/// The closed set of agent kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentKind {
    /// Uniform random action selection; no learning.
    Random,

    /// A value-based learner (e.g. Q-learning) behind [`Learner`].
    ValueLearner,

    /// An actor-critic learner (e.g. DDPG) behind [`Learner`].
    ActorCritic,

    /// Issues action 0 every tick and never learns; for observer roles
    /// whose commands the simulator ignores.
    Observer,
}

impl FromStr for AgentKind {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(AgentKind::Random),
            "value-learner" | "dqn" => Ok(AgentKind::ValueLearner),
            "actor-critic" | "ddpg" => Ok(AgentKind::ActorCritic),
            "observer" => Ok(AgentKind::Observer),
            _ => Err(EnvError::Configuration(format!(
                "unknown agent kind '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentKind::Random => "random",
            AgentKind::ValueLearner => "value-learner",
            AgentKind::ActorCritic => "actor-critic",
            AgentKind::Observer => "observer",
        };
        write!(f, "{}", s)
    }
}

/// Builds an agent of the given kind for a session.
///
/// The session is only inspected for its declared action count and
/// reward scale. The two learner kinds require `learner`, the external
/// update rule; the non-learning kinds ignore it.
pub fn build_agent<C>(
    kind: AgentKind,
    env: &MalmoEnv<C>,
    config: &LearnerAgentConfig,
    learner: Option<Box<dyn Learner>>,
) -> Result<Box<dyn Agent<MalmoEnv<C>>>>
where
    C: SimulatorClient + 'static,
{
    use mallow_core::Env as _;

    match kind {
        AgentKind::Random => Ok(Box::new(RandomAgent::build(RandomAgentConfig {
            n_acts: env.action_count(),
        }))),
        AgentKind::Observer => Ok(Box::new(ObserverAgent::new())),
        AgentKind::ValueLearner | AgentKind::ActorCritic => {
            let learner = learner.ok_or_else(|| {
                EnvError::Configuration(format!("{} agent requires a learner backend", kind))
            })?;
            Ok(Box::new(LearnerAgent::build(
                config.clone(),
                env.abs_max_reward(),
                learner,
            )?))
        }
    }
}
