//! Window-driving agent around an external learning algorithm.
use crate::random::mean_return_record;
use anyhow::Result;
use log::info;
use mallow_core::{error::EnvError, record::Record, Agent, Env as _};
use mallow_env::{
    BatchProcessor, BatchProcessorConfig, ChannelOrder, MalmoAct, MalmoEnv, MalmoObs,
    SimulatorClient,
};
use ndarray::{Array3, ArrayD};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

/// The external learning algorithm behind a [`LearnerAgent`].
///
/// The agent owns the interaction protocol and the normalization
/// pipeline; the learner owns the update rule and receives only
/// ready-made tensors. `train` distinguishes fitting from evaluation so
/// implementations can disable exploration.
pub trait Learner {
    /// Selects the next action given the normalized observation window,
    /// the normalized reward of the previous step and whether that step
    /// ended an episode.
    fn select_action(&mut self, batch: &ArrayD<f32>, reward: f32, done: bool, train: bool)
        -> MalmoAct;

    /// Saves the learner's parameters in the given directory.
    fn save(&self, dir: &Path) -> Result<()>;

    /// Loads the learner's parameters from the given directory.
    fn load(&mut self, dir: &Path) -> Result<()>;
}

/// Configuration of [`LearnerAgent`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LearnerAgentConfig {
    /// Number of recent observations kept in the window.
    pub window_length: usize,

    /// Frames carry a single luma channel.
    pub grayscale: bool,

    /// Keep the window's time axis for recurrent models.
    pub recurrent: bool,

    /// Channel layout the learner expects.
    pub channel_order: ChannelOrder,
}

impl Default for LearnerAgentConfig {
    fn default() -> Self {
        Self {
            window_length: 4,
            grayscale: true,
            recurrent: false,
            channel_order: ChannelOrder::ChannelsLast,
        }
    }
}

/// Drives a session for an external [`Learner`].
///
/// Keeps the window of recent frames, normalizes it with the
/// [`BatchProcessor`] and feeds the learner one tensor per step. The
/// same normalization runs in `fit` and `test`, so the reward scale the
/// learner sees never changes between the two.
pub struct LearnerAgent {
    processor: BatchProcessor,
    window_length: usize,
    window: VecDeque<Array3<u8>>,
    learner: Box<dyn Learner>,
}

impl LearnerAgent {
    /// Builds a learner agent.
    ///
    /// `abs_max_reward` comes from the mission (via the session) and
    /// configures reward normalization.
    pub fn build(
        config: LearnerAgentConfig,
        abs_max_reward: Option<f32>,
        learner: Box<dyn Learner>,
    ) -> Result<Self, EnvError> {
        if config.window_length == 0 {
            return Err(EnvError::Configuration(
                "window_length must be at least 1".into(),
            ));
        }
        let processor = BatchProcessor::build(
            BatchProcessorConfig::default()
                .grayscale(config.grayscale)
                .recurrent(config.recurrent)
                .channel_order(config.channel_order)
                .abs_max_reward(abs_max_reward),
        )?;
        Ok(Self {
            processor,
            window_length: config.window_length,
            window: VecDeque::new(),
            learner,
        })
    }

    fn frame_of(obs: &MalmoObs) -> Result<&Array3<u8>, EnvError> {
        obs.pixels().ok_or_else(|| {
            EnvError::Configuration("learner agents require a visual session".into())
        })
    }

    /// Seeds the window with the episode's first frame repeated, so the
    /// stacked shape is right from the very first step.
    fn fill_window(&mut self, obs: &MalmoObs) -> Result<(), EnvError> {
        let frame = Self::frame_of(obs)?;
        self.window.clear();
        for _ in 0..self.window_length {
            self.window.push_back(frame.clone());
        }
        Ok(())
    }

    fn push_frame(&mut self, obs: &MalmoObs) -> Result<(), EnvError> {
        let frame = Self::frame_of(obs)?;
        self.window.pop_front();
        self.window.push_back(frame.clone());
        Ok(())
    }

    fn next_action(&mut self, reward: f32, done: bool, train: bool) -> Result<MalmoAct> {
        let frames = self.window.make_contiguous();
        let batch = self.processor.process_observations(frames)?;
        let reward = self.processor.process_reward(reward);
        Ok(self.learner.select_action(&batch, reward, done, train))
    }

    fn run<C: SimulatorClient>(
        &mut self,
        env: &mut MalmoEnv<C>,
        nb_steps: usize,
        train: bool,
    ) -> Result<Vec<f32>> {
        let obs = env.reset()?;
        self.fill_window(&obs)?;

        let mut returns = Vec::new();
        let mut episode_return = 0.0;
        let mut reward = 0.0;
        let mut done = false;

        for _ in 0..nb_steps {
            let act = self.next_action(reward, done, train)?;
            let (step, _) = env.step(&act)?;
            episode_return += step.reward;
            reward = step.reward;
            done = step.is_done;

            if step.is_done {
                info!("LearnerAgent: episode return = {}", episode_return);
                returns.push(episode_return);
                episode_return = 0.0;
                let obs = env.reset()?;
                self.fill_window(&obs)?;
            } else {
                self.push_frame(&step.obs)?;
            }
        }

        Ok(returns)
    }
}

impl<C: SimulatorClient> Agent<MalmoEnv<C>> for LearnerAgent {
    fn fit(&mut self, env: &mut MalmoEnv<C>, nb_steps: usize) -> Result<Record> {
        let returns = self.run(env, nb_steps, true)?;
        Ok(mean_return_record(&returns))
    }

    fn test(&mut self, env: &mut MalmoEnv<C>, nb_episodes: usize) -> Result<Record> {
        let mut returns = Vec::with_capacity(nb_episodes);
        for _ in 0..nb_episodes {
            let obs = env.reset()?;
            self.fill_window(&obs)?;
            let mut episode_return = 0.0;
            let mut reward = 0.0;
            let mut done = false;

            while !done {
                let act = self.next_action(reward, done, false)?;
                let (step, _) = env.step(&act)?;
                episode_return += step.reward;
                reward = step.reward;
                done = step.is_done;
                if !done {
                    self.push_frame(&step.obs)?;
                }
            }
            returns.push(episode_return);
        }
        Ok(mean_return_record(&returns))
    }

    fn save(&self, dir: &Path) -> Result<()> {
        self.learner.save(dir)
    }

    fn load(&mut self, dir: &Path) -> Result<()> {
        self.learner.load(dir)
    }
}
