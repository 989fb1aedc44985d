//! Core functionalities.
mod agent;
mod env;
mod policy;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::{Configurable, Policy};
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// Observations are produced once per simulator tick. Their shape is
/// fixed over the lifetime of a session, even for ticks where the
/// simulator had no frame available.
pub trait Obs: Clone + Debug {
    /// Returns a placeholder observation.
    ///
    /// Observations created with this method are ignored; they only fill
    /// slots whose value is never read.
    fn dummy() -> Self;

    /// Returns the number of observations in the object, which is 1 for
    /// every session in this library.
    fn len(&self) -> usize;

    /// Returns `true` if the object contains no observation.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An action on an environment.
pub trait Act: Clone + Debug {
    /// Returns the number of scalar components of the action.
    fn len(&self) -> usize;
}
