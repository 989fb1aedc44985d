//! Environment step.
use super::Env;
use std::fmt;

/// Additional information attached to [`Step`].
pub trait Info {}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// An environment emits a [`Step`] object at every interaction step.
pub struct Step<E: Env> {
    /// Action issued at this step.
    pub act: E::Act,

    /// Observation built from the world state following the action.
    pub obs: E::Obs,

    /// Sum of the reward signals reported since the previous tick.
    pub reward: f32,

    /// `true` if the episode ended at this step (mission end, time up
    /// or an agent-specific quit condition, surfaced identically).
    pub is_done: bool,

    /// Information defined by the environment.
    pub info: E::Info,
}

// Obs and Act are Debug by their supertraits; only Info needs the
// extra bound.
impl<E: Env> fmt::Debug for Step<E>
where
    E::Info: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("act", &self.act)
            .field("obs", &self.obs)
            .field("reward", &self.reward)
            .field("is_done", &self.is_done)
            .field("info", &self.info)
            .finish()
    }
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(obs: E::Obs, act: E::Act, reward: f32, is_done: bool, info: E::Info) -> Self {
        Step {
            act,
            obs,
            reward,
            is_done,
            info,
        }
    }
}
