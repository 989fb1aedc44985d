//! Agent.
use super::Env;
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// The capability interface shared by every agent kind.
///
/// An agent drives an environment session: `fit` runs the interaction
/// loop for a number of steps (learning where applicable), `test` runs
/// complete evaluation episodes, and `save`/`load` persist whatever
/// state the agent owns. Non-learning agents implement `save`/`load`
/// as no-ops.
pub trait Agent<E: Env> {
    /// Runs the interaction loop for `nb_steps` environment steps,
    /// resetting the environment whenever an episode ends.
    fn fit(&mut self, env: &mut E, nb_steps: usize) -> Result<Record>;

    /// Runs `nb_episodes` complete evaluation episodes and reports the
    /// average episode return.
    fn test(&mut self, env: &mut E, nb_episodes: usize) -> Result<Record>;

    /// Saves the agent's state in the given directory.
    fn save(&self, dir: &Path) -> Result<()>;

    /// Loads the agent's state from the given directory.
    fn load(&mut self, dir: &Path) -> Result<()>;
}
