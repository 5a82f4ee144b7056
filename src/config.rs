use std::ops::Range;
use std::path::Path;

use crate::error::PipelineError;

/// Immutable pipeline configuration, passed by value into the builder.
/// Defaults reproduce the trained model's constants; a JSON file may
/// override any subset of fields.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    pub model_path: String,
    /// Empty means the built-in vocabulary.
    pub vocab_path: String,
    pub device: String,
    pub frame_period_s: f64,
    /// Context window width in frames; must be odd.
    pub context_frames: usize,
    /// Selected column block of the regression output, [start, end).
    pub channel_start: usize,
    pub channel_end: usize,
    pub upsample_factor: usize,
    pub smoothing_window: usize,
    pub smoothing_kernel: String,
    pub collaborator_timeout_ms: u64,
}

impl AnimatorConfig {
    pub const DEFAULT_FRAME_PERIOD_S: f64 = 0.04;
    pub const DEFAULT_CONTEXT_FRAMES: usize = 31;
    pub const DEFAULT_CHANNEL_START: usize = 32;
    pub const DEFAULT_CHANNEL_END: usize = 48;
    pub const DEFAULT_UPSAMPLE_FACTOR: usize = 4;
    pub const DEFAULT_SMOOTHING_WINDOW: usize = 11;
    pub const DEFAULT_COLLABORATOR_TIMEOUT_MS: u64 = 30_000;

    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io("read animator config", e))?;
        serde_json::from_str(&data).map_err(|e| PipelineError::json("parse animator config", e))
    }

    pub fn channel_range(&self) -> Range<usize> {
        self.channel_start..self.channel_end
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            vocab_path: String::new(),
            device: "cpu".to_string(),
            frame_period_s: Self::DEFAULT_FRAME_PERIOD_S,
            context_frames: Self::DEFAULT_CONTEXT_FRAMES,
            channel_start: Self::DEFAULT_CHANNEL_START,
            channel_end: Self::DEFAULT_CHANNEL_END,
            upsample_factor: Self::DEFAULT_UPSAMPLE_FACTOR,
            smoothing_window: Self::DEFAULT_SMOOTHING_WINDOW,
            smoothing_kernel: "flat".to_string(),
            collaborator_timeout_ms: Self::DEFAULT_COLLABORATOR_TIMEOUT_MS,
        }
    }
}
