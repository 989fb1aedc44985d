//! Evaluation of a policy on an environment.
use crate::{Env, Policy};
use anyhow::Result;
use log::info;

/// Runs `n_episodes` episodes with `policy` and returns the episode
/// returns.
///
/// The environment is reset at the start of every episode; each episode
/// runs until the environment reports `is_done`.
pub fn eval<E: Env, P: Policy<E>>(
    env: &mut E,
    policy: &mut P,
    n_episodes: usize,
) -> Result<Vec<f32>> {
    let mut returns = Vec::with_capacity(n_episodes);

    for episode in 0..n_episodes {
        let mut obs = env.reset()?;
        let mut r_sum = 0.0;
        let mut steps = 0;

        loop {
            let act = policy.sample(&obs);
            let (step, _) = env.step(&act)?;
            r_sum += step.reward;
            steps += 1;
            if step.is_done {
                break;
            }
            obs = step.obs;
        }

        info!(
            "Episode {}: return = {}, steps = {}",
            episode, r_sum, steps
        );
        returns.push(r_sum);
    }

    Ok(returns)
}
