//! Configuration of [`MalmoEnv`](super::MalmoEnv).
use crate::client::Endpoint;
use crate::obs::ObsMode;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of [`MalmoEnv`](super::MalmoEnv).
///
/// Immutable read-only data established at session construction; a
/// session never consults ambient state afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MalmoEnvConfig {
    /// Name of the mission this session belongs to.
    pub(super) name: String,

    /// Ordered simulator endpoints; role `i` connects to the `i`-th.
    pub(super) endpoints: Vec<Endpoint>,

    /// Declared command templates (complete commands for discrete
    /// sessions, verbs for continuous ones).
    pub(super) actions: Vec<String>,

    /// Verbs whose commands persist until cancelled; `None` keeps the
    /// simulator's continuous-movement default set.
    pub(super) stateful_verbs: Option<Vec<String>>,

    /// Observation mode of this session.
    pub(super) obs_mode: ObsMode,

    /// Absolute maximum episode reward of the mission, used for reward
    /// normalization by learning agents. `None` leaves rewards
    /// unscaled.
    pub(super) abs_max_reward: Option<f32>,
}

impl Default for MalmoEnvConfig {
    fn default() -> Self {
        Self {
            name: "".to_string(),
            endpoints: vec![Endpoint {
                addr: "127.0.0.1".to_string(),
                port: 10000,
            }],
            actions: Vec::new(),
            stateful_verbs: None,
            obs_mode: ObsMode::default(),
            abs_max_reward: None,
        }
    }
}

impl MalmoEnvConfig {
    /// Sets the mission name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the simulator endpoints.
    pub fn endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Declares a discrete action table of complete commands.
    pub fn discrete_actions(mut self, actions: &[&str]) -> Self {
        self.actions = actions.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Declares a continuous action table of command verbs.
    pub fn continuous_actions(mut self, verbs: &[&str]) -> Self {
        self.actions = verbs.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Replaces the default stateful verb set.
    pub fn stateful_verbs(mut self, verbs: &[&str]) -> Self {
        self.stateful_verbs = Some(verbs.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Selects visual observations of the given size.
    pub fn visual(mut self, width: u32, height: u32, grayscale: bool) -> Self {
        self.obs_mode = ObsMode::Visual {
            width,
            height,
            grayscale,
        };
        self
    }

    /// Selects structured (non-visual) observations.
    pub fn structured(mut self) -> Self {
        self.obs_mode = ObsMode::Structured;
        self
    }

    /// Sets the mission's absolute maximum reward.
    pub fn abs_max_reward(mut self, v: Option<f32>) -> Self {
        self.abs_max_reward = v;
        self
    }

    /// Loads a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let rdr = std::io::BufReader::new(file);
        Ok(serde_yaml::from_reader(rdr)?)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MalmoEnvConfig;
    use tempdir::TempDir;

    #[test]
    fn config_survives_yaml_persistence() {
        let dir = TempDir::new("mallow-env-config").unwrap();
        let path = dir.path().join("env.yaml");

        let config = MalmoEnvConfig::default()
            .name("classroom")
            .discrete_actions(&["move 1", "move -1", "turn 1", "turn -1"])
            .visual(32, 32, true)
            .abs_max_reward(Some(1000.0));
        config.save(&path).unwrap();

        let loaded = MalmoEnvConfig::load(&path).unwrap();
        assert_eq!(loaded.name, "classroom");
        assert_eq!(loaded.actions.len(), 4);
        assert_eq!(loaded.abs_max_reward, Some(1000.0));
        assert_eq!(loaded.obs_mode, config.obs_mode);
    }
}
