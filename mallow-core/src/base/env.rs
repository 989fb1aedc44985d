//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// Represents an environment session, typically one simulator role.
///
/// An implementation owns its simulator connection exclusively and runs
/// the per-step request/response cycle: translate the action, issue the
/// commands, wait for the next world state, aggregate the rewards.
/// `reset()`/`step()` are the only surface the rest of the system
/// touches.
///
/// Fallible operations surface [`EnvError`](crate::error::EnvError);
/// callers that need the taxonomy can downcast the returned error.
pub trait Env {
    /// Configuration of the environment.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information attached to every [`Step`] object.
    type Info: Info;

    /// Starts or restarts an episode.
    ///
    /// Blocks until the simulator reports an initial world state and
    /// returns the first observation. Calling `reset()` on a running
    /// episode is permitted and simply restarts it.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performs one environment step.
    ///
    /// This is the only blocking call of a session: it suspends on the
    /// simulator's turn boundary until the next world state for this
    /// role arrives. Fails with `InvalidState` before the first
    /// `reset()` or after the episode ended, with `InvalidAction` if
    /// `a` violates the declared action count (episode state is left
    /// untouched), and with `ConnectionLost` if the simulator
    /// connection drops (fatal to the session).
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// The number of actions declared for this session.
    fn action_count(&self) -> usize;
}
