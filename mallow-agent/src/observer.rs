//! Observer agent.
use crate::random::mean_return_record;
use anyhow::Result;
use mallow_core::{record::Record, Agent, Env};
use std::marker::PhantomData;
use std::path::Path;

/// An agent for observer roles.
///
/// Observer roles exist to advance the simulator's turn sequence and
/// record the mission from a vantage point; their commands are ignored
/// by the simulator. The agent issues action 0 every tick, never
/// learns, and persists nothing.
pub struct ObserverAgent<E> {
    phantom: PhantomData<E>,
}

impl<E> ObserverAgent<E> {
    /// Constructs an observer agent.
    pub fn new() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<E> Default for ObserverAgent<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Agent<E> for ObserverAgent<E>
where
    E: Env,
    E::Act: From<usize>,
{
    fn fit(&mut self, env: &mut E, nb_steps: usize) -> Result<Record> {
        env.reset()?;
        let mut episodes = 0;

        for _ in 0..nb_steps {
            let (step, _) = env.step(&E::Act::from(0))?;
            if step.is_done {
                episodes += 1;
                env.reset()?;
            }
        }

        Ok(Record::from_scalar("episodes", episodes as f32))
    }

    /// Fitting and testing are the same for an observer; `nb_episodes`
    /// counts completed episodes instead of steps.
    fn test(&mut self, env: &mut E, nb_episodes: usize) -> Result<Record> {
        let mut returns = Vec::with_capacity(nb_episodes);
        for _ in 0..nb_episodes {
            env.reset()?;
            let mut episode_return = 0.0;
            loop {
                let (step, _) = env.step(&E::Act::from(0))?;
                episode_return += step.reward;
                if step.is_done {
                    break;
                }
            }
            returns.push(episode_return);
        }
        Ok(mean_return_record(&returns))
    }

    fn save(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }

    fn load(&mut self, _dir: &Path) -> Result<()> {
        Ok(())
    }
}
