#![warn(missing_docs)]
//! Core abstractions for reinforcement learning on a Malmo-style voxel
//! simulator.
//!
//! The crate defines the seams the rest of the workspace is built on:
//!
//! * [`Env`], [`Obs`] and [`Act`] — the environment session surface. An
//!   environment owns exactly one simulator connection and exposes
//!   `reset()`/`step()` as its whole protocol.
//! * [`Policy`] and [`Agent`] — action selection and the
//!   fit/test/save/load capability interface shared by every agent kind.
//! * [`error::EnvError`] — the error taxonomy surfaced by sessions.
//! * [`record::Record`] — a small container for step/episode diagnostics.
//! * [`supervisor::SessionSupervisor`] — task handles for running one
//!   isolated session/agent pairing per simulator role.
pub mod error;
pub mod record;
pub mod supervisor;

mod base;
pub use base::{Act, Agent, Configurable, Env, Info, Obs, Policy, Step};

mod eval;
pub use eval::eval;
