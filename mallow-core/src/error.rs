//! Errors surfaced by environment sessions.
use thiserror::Error;

/// Errors surfaced by environment sessions.
///
/// All variants are returned synchronously from the call that detects
/// them; none are deferred or swallowed.
#[derive(Error, Debug)]
pub enum EnvError {
    /// An action index or vector length outside the declared action
    /// count. Local to one `step()` call; the episode state is
    /// unchanged and the caller may retry with a valid action.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// `step()` was called before `reset()` or after the episode
    /// ended. An orchestration error, never retried internally.
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// The simulator connection dropped mid-episode. Fatal to the
    /// session; the supervisor owns the retry policy.
    #[error("simulator connection lost: {0}")]
    ConnectionLost(String),

    /// Malformed adapter configuration, detected at construction time
    /// before any simulator interaction.
    #[error("configuration error: {0}")]
    Configuration(String),
}
