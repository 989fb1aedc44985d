//! Normalization of observation windows and rewards for learning
//! algorithms.
use crate::act::MalmoAct;
use mallow_core::error::EnvError;
use ndarray::{concatenate, stack, Array3, ArrayD, Axis};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

/// Memory layout of the channel axis in produced tensors.
///
/// Threaded in explicitly at construction, never read from ambient
/// state, so sessions with different layouts can coexist in one
/// process.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// `(C, H, W)` layouts.
    ChannelsFirst,

    /// `(H, W, C)` layouts.
    ChannelsLast,
}

/// Configuration of [`BatchProcessor`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchProcessorConfig {
    /// Frames carry a single luma channel.
    pub grayscale: bool,

    /// Preserve the window as a leading time axis for recurrent
    /// models instead of folding it into the channel axis.
    pub recurrent: bool,

    /// Channel layout of the produced tensors.
    pub channel_order: ChannelOrder,

    /// Absolute maximum episode reward for normalization; `None`
    /// leaves rewards unscaled.
    pub abs_max_reward: Option<f32>,
}

impl Default for BatchProcessorConfig {
    fn default() -> Self {
        Self {
            grayscale: true,
            recurrent: false,
            channel_order: ChannelOrder::ChannelsLast,
            abs_max_reward: None,
        }
    }
}

impl BatchProcessorConfig {
    /// Sets the grayscale flag.
    pub fn grayscale(mut self, v: bool) -> Self {
        self.grayscale = v;
        self
    }

    /// Sets the recurrent flag.
    pub fn recurrent(mut self, v: bool) -> Self {
        self.recurrent = v;
        self
    }

    /// Sets the channel layout.
    pub fn channel_order(mut self, v: ChannelOrder) -> Self {
        self.channel_order = v;
        self
    }

    /// Sets the absolute maximum reward.
    pub fn abs_max_reward(mut self, v: Option<f32>) -> Self {
        self.abs_max_reward = v;
        self
    }
}

/// Reshapes observation windows into the tensors a learning algorithm
/// expects and normalizes rewards to the scale it was trained against.
///
/// Stateless apart from its immutable configuration.
#[derive(Clone, Debug)]
pub struct BatchProcessor {
    config: BatchProcessorConfig,
}

impl BatchProcessor {
    /// Builds a processor, validating the reward scale.
    pub fn build(config: BatchProcessorConfig) -> Result<Self, EnvError> {
        if let Some(abs_max) = config.abs_max_reward {
            if abs_max == 0.0 {
                return Err(EnvError::Configuration(
                    "abs_max_reward must be non-zero".into(),
                ));
            }
        }
        Ok(Self { config })
    }

    /// Normalizes a time window of frames into one f32 tensor.
    ///
    /// Every frame is `(H, W, C)` with C = 1 for grayscale windows and
    /// 3 otherwise. Non-recurrent windows fold time into the channel
    /// axis; recurrent windows keep a leading time axis. All paths end
    /// by casting to f32 and dividing by 255: inputs are always 8-bit
    /// imagery.
    pub fn process_observations<T>(&self, window: &[Array3<T>]) -> Result<ArrayD<f32>, EnvError>
    where
        T: Copy + AsPrimitive<f32>,
    {
        if window.is_empty() {
            return Err(EnvError::Configuration(
                "observation window is empty".into(),
            ));
        }
        let channels = if self.config.grayscale { 1 } else { 3 };
        let shape = window[0].raw_dim();
        for frame in window {
            if frame.raw_dim() != shape || frame.shape()[2] != channels {
                return Err(EnvError::Configuration(format!(
                    "frame shape {:?} does not match declared layout (HxWx{})",
                    frame.shape(),
                    channels
                )));
            }
        }

        let views: Vec<_> = window.iter().map(|f| f.view()).collect();
        let tensor = if !self.config.recurrent {
            // (H, W, T*C): window frames concatenated along channels.
            let folded = concatenate(Axis(2), &views)
                .expect("uniform frame shapes concatenate");
            match self.config.channel_order {
                ChannelOrder::ChannelsLast => folded.into_dyn(),
                ChannelOrder::ChannelsFirst => folded.permuted_axes([2, 0, 1]).into_dyn(),
            }
        } else {
            // (T, H, W, C): the window kept as a leading time axis.
            let stacked = stack(Axis(0), &views).expect("uniform frame shapes stack");
            match self.config.channel_order {
                ChannelOrder::ChannelsLast => stacked.into_dyn(),
                ChannelOrder::ChannelsFirst => stacked.permuted_axes([0, 3, 1, 2]).into_dyn(),
            }
        };

        Ok(tensor.mapv(|v| v.as_() / 255.0))
    }

    /// Normalizes a raw reward by the configured absolute maximum.
    ///
    /// Applied identically during training and evaluation so reward
    /// scale stays consistent with what the algorithm learned against.
    pub fn process_reward(&self, raw: f32) -> f32 {
        match self.config.abs_max_reward {
            Some(abs_max) => raw / abs_max,
            None => raw,
        }
    }

    /// Identity passthrough for actions, kept for interface symmetry.
    pub fn process_action(&self, action: &MalmoAct) -> MalmoAct {
        action.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{BatchProcessor, BatchProcessorConfig, ChannelOrder};
    use crate::act::MalmoAct;
    use ndarray::Array3;

    fn window(n: usize, h: usize, w: usize, c: usize) -> Vec<Array3<u8>> {
        (0..n)
            .map(|i| Array3::from_elem((h, w, c), (i * 10) as u8))
            .collect()
    }

    fn processor(grayscale: bool, recurrent: bool, order: ChannelOrder) -> BatchProcessor {
        BatchProcessor::build(
            BatchProcessorConfig::default()
                .grayscale(grayscale)
                .recurrent(recurrent)
                .channel_order(order),
        )
        .unwrap()
    }

    #[test]
    fn non_recurrent_color_folds_time_into_channels() {
        let p = processor(false, false, ChannelOrder::ChannelsLast);
        let t = p.process_observations(&window(4, 8, 6, 3)).unwrap();
        assert_eq!(t.shape(), &[8, 6, 12]);

        let p = processor(false, false, ChannelOrder::ChannelsFirst);
        let t = p.process_observations(&window(4, 8, 6, 3)).unwrap();
        assert_eq!(t.shape(), &[12, 8, 6]);
    }

    #[test]
    fn non_recurrent_grayscale_stacks_into_the_channel_axis() {
        let p = processor(true, false, ChannelOrder::ChannelsLast);
        let t = p.process_observations(&window(4, 8, 6, 1)).unwrap();
        assert_eq!(t.shape(), &[8, 6, 4]);

        let p = processor(true, false, ChannelOrder::ChannelsFirst);
        let t = p.process_observations(&window(4, 8, 6, 1)).unwrap();
        assert_eq!(t.shape(), &[4, 8, 6]);
    }

    #[test]
    fn recurrent_windows_keep_the_time_axis() {
        let p = processor(false, true, ChannelOrder::ChannelsLast);
        let t = p.process_observations(&window(4, 8, 6, 3)).unwrap();
        assert_eq!(t.shape(), &[4, 8, 6, 3]);

        let p = processor(false, true, ChannelOrder::ChannelsFirst);
        let t = p.process_observations(&window(4, 8, 6, 3)).unwrap();
        assert_eq!(t.shape(), &[4, 3, 8, 6]);
    }

    #[test]
    fn recurrent_grayscale_keeps_a_singleton_channel_axis() {
        let p = processor(true, true, ChannelOrder::ChannelsLast);
        let t = p.process_observations(&window(4, 8, 6, 1)).unwrap();
        assert_eq!(t.shape(), &[4, 8, 6, 1]);

        let p = processor(true, true, ChannelOrder::ChannelsFirst);
        let t = p.process_observations(&window(4, 8, 6, 1)).unwrap();
        assert_eq!(t.shape(), &[4, 1, 8, 6]);
    }

    #[test]
    fn values_are_scaled_to_unit_range() {
        let p = processor(true, false, ChannelOrder::ChannelsLast);
        let frames = vec![Array3::from_elem((2, 2, 1), 255u8)];
        let t = p.process_observations(&frames).unwrap();
        assert!(t.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn time_order_is_preserved_when_folding() {
        let p = processor(true, false, ChannelOrder::ChannelsLast);
        let t = p.process_observations(&window(3, 2, 2, 1)).unwrap();
        // Frame i was filled with i*10.
        assert!((t[[0, 0, 0]] - 0.0).abs() < 1e-6);
        assert!((t[[0, 0, 1]] - 10.0 / 255.0).abs() < 1e-6);
        assert!((t[[0, 0, 2]] - 20.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_frame_shapes_are_rejected() {
        let p = processor(true, false, ChannelOrder::ChannelsLast);
        let frames = vec![
            Array3::<u8>::zeros((4, 4, 1)),
            Array3::<u8>::zeros((4, 3, 1)),
        ];
        assert!(p.process_observations(&frames).is_err());

        // Channel count must match the declared grayscale flag.
        let frames = vec![Array3::<u8>::zeros((4, 4, 3))];
        assert!(p.process_observations(&frames).is_err());
    }

    #[test]
    fn reward_normalization_divides_by_abs_max() {
        let p = BatchProcessor::build(
            BatchProcessorConfig::default().abs_max_reward(Some(1000.0)),
        )
        .unwrap();
        assert_eq!(p.process_reward(500.0), 0.5);

        let p = BatchProcessor::build(BatchProcessorConfig::default()).unwrap();
        assert_eq!(p.process_reward(500.0), 500.0);
    }

    #[test]
    fn zero_abs_max_is_a_configuration_error() {
        assert!(
            BatchProcessor::build(BatchProcessorConfig::default().abs_max_reward(Some(0.0)))
                .is_err()
        );
    }

    #[test]
    fn actions_pass_through_unchanged() {
        let p = BatchProcessor::build(BatchProcessorConfig::default()).unwrap();
        let a = MalmoAct::Continuous(vec![0.5, -0.25]);
        assert_eq!(p.process_action(&a), a);
    }
}
