//! The boundary with the simulator client library.
//!
//! The adapter never speaks the simulator's wire protocol itself. It
//! requires only the narrow surface of [`SimulatorClient`]: connect a
//! role, send command strings, block for the next world state, and ask
//! whether the mission ended.
use mallow_core::error::EnvError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors reported by a simulator client implementation.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The connection to the simulator dropped or could not be made.
    #[error("disconnected: {0}")]
    Disconnected(String),

    /// The simulator answered with something the client could not
    /// interpret.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<ClientError> for EnvError {
    /// Any client failure mid-episode is fatal to the session.
    fn from(e: ClientError) -> Self {
        EnvError::ConnectionLost(e.to_string())
    }
}

/// One simulator endpoint, `addr:port`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host name or IP address of the simulator instance.
    pub addr: String,

    /// Port of the simulator instance.
    pub port: u16,
}

impl FromStr for Endpoint {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(2, ':');
        let addr = parts
            .next()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| EnvError::Configuration(format!("empty endpoint '{}'", s)))?;
        let port = parts
            .next()
            .ok_or_else(|| EnvError::Configuration(format!("endpoint '{}' has no port", s)))?
            .parse::<u16>()
            .map_err(|_| EnvError::Configuration(format!("bad port in endpoint '{}'", s)))?;
        Ok(Self {
            addr: addr.to_string(),
            port,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

/// Parses a newline-separated client roster, one `addr:port` per line.
///
/// Blank lines are skipped. The order of the roster is significant:
/// role `i` of a mission connects to the `i`-th endpoint.
pub fn parse_client_list(s: &str) -> Result<Vec<Endpoint>, EnvError> {
    let endpoints = s
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Endpoint::from_str)
        .collect::<Result<Vec<_>, _>>()?;
    if endpoints.is_empty() {
        return Err(EnvError::Configuration(
            "client roster contains no endpoints".into(),
        ));
    }
    Ok(endpoints)
}

/// One RGB8 video frame rendered by the simulator.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Width of the frame in pixels.
    pub width: u32,

    /// Height of the frame in pixels.
    pub height: u32,

    /// Row-major RGB8 pixel data, `width * height * 3` bytes.
    pub data: Vec<u8>,
}

/// A named reward scalar attached to a world state.
#[derive(Clone, Debug)]
pub struct RewardSignal {
    /// Name of the producing reward handler.
    pub name: String,

    /// Value of the signal.
    pub value: f32,
}

impl RewardSignal {
    /// Constructs a reward signal.
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A raw snapshot of the simulator for one tick of one role.
///
/// `rewards` holds every signal reported since the previous tick; the
/// client is expected to deliver a complete, tick-scoped list with each
/// world state.
#[derive(Clone, Debug, Default)]
pub struct WorldState {
    /// Tick index, monotonically increasing per role.
    pub tick: u64,

    /// Video frame, absent while the simulator warms up and for
    /// non-visual missions.
    pub frame: Option<Frame>,

    /// Structured observation blob, as produced by the mission's
    /// observation handlers.
    pub observation: Option<serde_json::Value>,

    /// Reward signals accumulated since the previous tick.
    pub rewards: Vec<RewardSignal>,

    /// `true` if the mission ended at this tick for this role.
    pub is_terminal: bool,
}

/// The simulator connection owned by one environment session.
///
/// Implementations wrap the actual client library. All methods are
/// synchronous; [`SimulatorClient::await_next_tick`] is the only one
/// expected to block for a meaningful amount of time.
pub trait SimulatorClient {
    /// (Re)establishes the connection for the given mission role.
    fn connect(&mut self, role: usize) -> Result<(), ClientError>;

    /// Sends one command string to the simulator.
    fn send_command(&mut self, command: &str) -> Result<(), ClientError>;

    /// Blocks until the next world state for this role is available.
    ///
    /// This is the turn boundary: for multi-agent missions, other
    /// roles' steps interleave arbitrarily while this call is pending.
    fn await_next_tick(&mut self) -> Result<WorldState, ClientError>;

    /// Returns `true` once the simulator reported the end of the
    /// mission.
    fn is_mission_over(&self) -> bool;
}
