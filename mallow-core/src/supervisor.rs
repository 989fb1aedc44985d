//! Supervision of per-role session tasks.
//!
//! Multi-agent missions run one isolated session/agent pairing per
//! simulator role. Each pairing holds an exclusive, stateful connection
//! to the simulator, so nothing is shared between tasks; the supervisor
//! only hands out a stop signal and waits for completion.
use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::info;
use std::thread::{self, JoinHandle};

/// A cooperative stop signal handed to every supervised task.
///
/// The task is expected to poll [`StopSignal::is_set`] between
/// environment steps. There is no way to abort a step blocked on the
/// simulator's turn boundary other than terminating the process.
pub struct StopSignal(Receiver<()>);

impl StopSignal {
    /// Returns `true` once the supervisor requested a stop.
    pub fn is_set(&self) -> bool {
        match self.0.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        }
    }
}

/// A handle on one running session/agent pairing.
pub struct SessionHandle {
    name: String,
    stop_tx: Sender<()>,
    handle: JoinHandle<Result<()>>,
}

impl SessionHandle {
    /// The name of the supervised task, usually the mission's agent
    /// name for the role.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requests a cooperative stop. Does not block.
    pub fn stop(&self) {
        // The task may already be gone; a closed channel reads as a
        // stop request on the other side either way.
        let _ = self.stop_tx.send(());
    }

    /// Blocks until the task finishes and returns its result.
    ///
    /// A panicking task is reported as an error rather than propagated.
    pub fn join(self) -> Result<()> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(anyhow!("session task '{}' panicked", self.name)),
        }
    }
}

/// Spawns and waits on one task per simulator role.
#[derive(Default)]
pub struct SessionSupervisor {
    handles: Vec<SessionHandle>,
}

impl SessionSupervisor {
    /// Creates a supervisor with no running tasks.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawns a session task.
    ///
    /// The closure receives a [`StopSignal`] and is expected to build
    /// its own environment and agent; nothing is shared with other
    /// tasks.
    pub fn spawn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: FnOnce(StopSignal) -> Result<()> + Send + 'static,
    {
        let name = name.into();
        let (stop_tx, stop_rx) = bounded(1);
        info!("Spawning session task '{}'", name);
        let handle = thread::spawn(move || f(StopSignal(stop_rx)));
        self.handles.push(SessionHandle {
            name,
            stop_tx,
            handle,
        });
    }

    /// Requests a cooperative stop of every running task.
    pub fn stop_all(&self) {
        for handle in &self.handles {
            handle.stop();
        }
    }

    /// Blocks until every task finishes.
    ///
    /// Returns the per-task results in spawn order. Waiting continues
    /// past failed tasks: one lost session must not tear down the
    /// others.
    pub fn join_all(&mut self) -> Vec<(String, Result<()>)> {
        let handles = std::mem::take(&mut self.handles);
        handles
            .into_iter()
            .map(|h| {
                let name = h.name.clone();
                let result = h.join();
                match &result {
                    Ok(()) => info!("Session task '{}' finished", name),
                    Err(e) => info!("Session task '{}' failed: {}", name, e),
                }
                (name, result)
            })
            .collect()
    }
}
