//! Uniform random agent.
use anyhow::Result;
use log::info;
use mallow_core::{eval, record::Record, Agent, Configurable, Env, Policy};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::path::Path;

/// Configuration of [`RandomAgent`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomAgentConfig {
    /// Number of discrete actions to sample from.
    pub n_acts: usize,
}

/// An agent that samples discrete actions uniformly.
///
/// Useful as a baseline and for exercising a mission end to end without
/// a trained policy. Fitting and testing are the same interaction loop.
pub struct RandomAgent<E> {
    n_acts: usize,
    phantom: PhantomData<E>,
}

impl<E> Configurable for RandomAgent<E> {
    type Config = RandomAgentConfig;

    fn build(config: Self::Config) -> Self {
        Self {
            n_acts: config.n_acts,
            phantom: PhantomData,
        }
    }
}

impl<E> Policy<E> for RandomAgent<E>
where
    E: Env,
    E::Act: From<usize>,
{
    fn sample(&mut self, _obs: &E::Obs) -> E::Act {
        fastrand::usize(..self.n_acts).into()
    }
}

impl<E> Agent<E> for RandomAgent<E>
where
    E: Env,
    E::Act: From<usize>,
{
    fn fit(&mut self, env: &mut E, nb_steps: usize) -> Result<Record> {
        let mut obs = env.reset()?;
        let mut returns = Vec::new();
        let mut episode_return = 0.0;

        for _ in 0..nb_steps {
            let act = self.sample(&obs);
            let (step, _) = env.step(&act)?;
            episode_return += step.reward;

            if step.is_done {
                info!("RandomAgent: episode return = {}", episode_return);
                returns.push(episode_return);
                episode_return = 0.0;
                obs = env.reset()?;
            } else {
                obs = step.obs;
            }
        }

        Ok(mean_return_record(&returns))
    }

    fn test(&mut self, env: &mut E, nb_episodes: usize) -> Result<Record> {
        let returns = eval(env, self, nb_episodes)?;
        Ok(mean_return_record(&returns))
    }

    fn save(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }

    fn load(&mut self, _dir: &Path) -> Result<()> {
        Ok(())
    }
}

/// Averages completed-episode returns into a record; an empty slice
/// reports only the episode count.
pub(crate) fn mean_return_record(returns: &[f32]) -> Record {
    let mut record = Record::empty();
    record.insert(
        "episodes",
        mallow_core::record::RecordValue::Scalar(returns.len() as f32),
    );
    if !returns.is_empty() {
        let mean = returns.iter().sum::<f32>() / returns.len() as f32;
        record.insert(
            "mean_episode_return",
            mallow_core::record::RecordValue::Scalar(mean),
        );
    }
    record
}
