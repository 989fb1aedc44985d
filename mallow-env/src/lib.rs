#![warn(missing_docs)]
//! Simulator environment adapter for a Malmo-style voxel simulator.
//!
//! The crate owns the per-episode interaction protocol with an external
//! simulator process: it translates abstract agent actions into
//! simulator command strings, sequences exactly one command set per
//! tick, accumulates reward signals, and reshapes raw frames into the
//! fixed-format tensors a learning algorithm consumes.
//!
//! The simulator itself sits behind the [`SimulatorClient`] trait; the
//! wire protocol is owned by whatever client library implements it.
//! One [`MalmoEnv`] owns one client connection and one role of a
//! mission for its whole lifetime.
//!
//! ```no_run
//! use anyhow::Result;
//! use mallow_core::Env as _;
//! use mallow_env::{MalmoAct, MalmoEnv, MalmoEnvConfig, SimulatorClient};
//!
//! fn run<C: SimulatorClient>(client: C) -> Result<()> {
//!     let config = MalmoEnvConfig::default()
//!         .name("classroom")
//!         .discrete_actions(&["move 1", "move -1", "turn 1", "turn -1"])
//!         .visual(32, 32, true);
//!     let mut env = MalmoEnv::build(&config, client, 0)?;
//!
//!     let mut obs = env.reset()?;
//!     loop {
//!         let (step, _) = env.step(&MalmoAct::Discrete(0))?;
//!         if step.is_done {
//!             break;
//!         }
//!         obs = step.obs;
//!     }
//!     let _ = obs;
//!     Ok(())
//! }
//! ```
mod act;
mod batch;
mod client;
mod env;
mod mission;
mod obs;

pub use act::{ActionTranslator, CommandSet, MalmoAct};
pub use batch::{BatchProcessor, BatchProcessorConfig, ChannelOrder};
pub use client::{parse_client_list, ClientError, Endpoint, Frame, RewardSignal, SimulatorClient, WorldState};
pub use env::{MalmoEnv, MalmoEnvConfig, MalmoInfo};
pub use mission::MissionDescriptor;
pub use obs::{MalmoObs, ObsMode, ObservationBuilder};
