//! Observations and the builder that produces them from world states.
use crate::client::WorldState;
use image::{
    imageops::{grayscale, resize, FilterType::Triangle},
    ImageBuffer, Rgb,
};
use mallow_core::{error::EnvError, Obs};
use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Observation for [`MalmoEnv`](crate::MalmoEnv).
#[derive(Clone, Debug)]
pub enum MalmoObs {
    /// An image observation shaped `(height, width, channels)` with
    /// channels = 1 for grayscale missions and 3 otherwise. The shape
    /// is constant over a session, ticks without a frame included.
    Pixels(Array3<u8>),

    /// The structured observation blob of a non-visual mission, passed
    /// through unchanged. Its shape contract is owned by the mission,
    /// not the adapter.
    Stats(serde_json::Value),
}

impl MalmoObs {
    /// The pixel array, if this is a visual observation.
    pub fn pixels(&self) -> Option<&Array3<u8>> {
        match self {
            MalmoObs::Pixels(a) => Some(a),
            MalmoObs::Stats(_) => None,
        }
    }
}

impl Obs for MalmoObs {
    fn dummy() -> Self {
        MalmoObs::Pixels(Array3::zeros((0, 0, 0)))
    }

    fn len(&self) -> usize {
        1
    }
}

/// What kind of observation a session produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ObsMode {
    /// Resized, optionally grayscaled frames of the declared size.
    Visual {
        /// Target frame width in pixels.
        width: u32,

        /// Target frame height in pixels.
        height: u32,

        /// Reduce frames to a single luma channel.
        grayscale: bool,
    },

    /// Pass the structured observation blob through unchanged.
    Structured,
}

impl Default for ObsMode {
    fn default() -> Self {
        ObsMode::Visual {
            width: 84,
            height: 84,
            grayscale: true,
        }
    }
}

/// Converts raw world states into fixed-shape observations.
///
/// Stateless apart from its immutable mode; `build` is deterministic
/// over its inputs, which the window stacking downstream relies on.
#[derive(Clone, Debug)]
pub struct ObservationBuilder {
    mode: ObsMode,
}

impl ObservationBuilder {
    /// Builds an observation builder, validating the declared frame
    /// size.
    pub fn build(mode: ObsMode) -> Result<Self, EnvError> {
        if let ObsMode::Visual { width, height, .. } = mode {
            if width == 0 || height == 0 {
                return Err(EnvError::Configuration(format!(
                    "frame size must be positive, got {}x{}",
                    width, height
                )));
            }
        }
        Ok(Self { mode })
    }

    /// Converts one world state into an observation.
    ///
    /// Visual sessions get a `(height, width, channels)` array; when
    /// the world state carries no frame (simulator warming up, or an
    /// observer tick without video) the array is zero-filled with the
    /// same shape, so stacking stays shape-stable across the episode.
    pub fn build_obs(&self, world: &WorldState) -> MalmoObs {
        match &self.mode {
            ObsMode::Structured => MalmoObs::Stats(
                world
                    .observation
                    .clone()
                    .unwrap_or(serde_json::Value::Null),
            ),
            ObsMode::Visual {
                width,
                height,
                grayscale: gray,
            } => {
                let channels = if *gray { 1 } else { 3 };
                let frame = match &world.frame {
                    Some(f) => f,
                    None => {
                        return MalmoObs::Pixels(Array3::zeros((
                            *height as usize,
                            *width as usize,
                            channels,
                        )))
                    }
                };

                let img = match ImageBuffer::<Rgb<u8>, _>::from_vec(
                    frame.width,
                    frame.height,
                    frame.data.clone(),
                ) {
                    Some(img) => img,
                    // A malformed frame is treated like a missing one.
                    None => {
                        return MalmoObs::Pixels(Array3::zeros((
                            *height as usize,
                            *width as usize,
                            channels,
                        )))
                    }
                };
                let img = resize(&img, *width, *height, Triangle);

                let buf = if *gray {
                    grayscale(&img).into_raw()
                } else {
                    img.into_raw()
                };
                let arr =
                    Array3::from_shape_vec((*height as usize, *width as usize, channels), buf)
                        .expect("resized frame has the declared shape");
                MalmoObs::Pixels(arr)
            }
        }
    }
}
