use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::smoothing::SmoothedChannel;
use crate::types::FrameLabels;

/// Writes the per-frame label artifact: one label per line, one line
/// per frame.
pub fn write_frame_labels(path: &Path, frames: &FrameLabels) -> Result<(), PipelineError> {
    let mut text = String::new();
    for label in &frames.labels {
        text.push_str(label);
        text.push('\n');
    }
    std::fs::write(path, text).map_err(|e| PipelineError::io("write frame label file", e))
}

/// Reads a per-frame label artifact back. The frame period is not
/// stored in the file; it is fixed at construction time and supplied by
/// the caller.
pub fn read_frame_labels(path: &Path, frame_period_s: f64) -> Result<FrameLabels, PipelineError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::io("read frame label file", e))?;
    Ok(FrameLabels {
        frame_period_s,
        labels: text.lines().map(str::to_string).collect(),
    })
}

/// Writes one trajectory file per channel under `dir`, named
/// `<prefix><channel_index>`, one floating-point value per line, one
/// line per upsampled frame. Returns the written paths in channel
/// order.
pub fn write_channel_trajectories(
    dir: &Path,
    prefix: &str,
    channels: &[SmoothedChannel],
) -> Result<Vec<PathBuf>, PipelineError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| PipelineError::io("create trajectory output directory", e))?;

    let mut paths = Vec::with_capacity(channels.len());
    for (index, channel) in channels.iter().enumerate() {
        let path = dir.join(format!("{prefix}{index}"));
        let mut text = String::new();
        for sample in &channel.samples {
            text.push_str(&format!("{sample}\n"));
        }
        std::fs::write(&path, text)
            .map_err(|e| PipelineError::io("write channel trajectory", e))?;
        paths.push(path);
    }
    Ok(paths)
}
