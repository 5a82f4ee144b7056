use std::ops::Range;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;

use crate::alignment::duration::read_stat_duration;
use crate::alignment::textgrid::parse_phone_tier;
use crate::error::PipelineError;
use crate::features::encoder::encode_windows;
use crate::features::quantizer::quantize;
use crate::features::vocab::Vocabulary;
use crate::pipeline::deadline::call_with_deadline;
use crate::pipeline::traits::RegressionModel;
use crate::smoothing::{smooth_channel, SmoothedChannel};
use crate::types::{AnimationOutput, FeatureWindows, PredictionBatch};

pub struct FaceAnimator {
    vocabulary: Vocabulary,
    frame_period_s: f64,
    context_frames: usize,
    channel_range: Range<usize>,
    upsample_factor: usize,
    smoothing_window: usize,
    smoothing_kernel: String,
    collaborator_timeout: Duration,
    model: Arc<dyn RegressionModel>,
}

pub(crate) struct FaceAnimatorParts {
    pub vocabulary: Vocabulary,
    pub frame_period_s: f64,
    pub context_frames: usize,
    pub channel_range: Range<usize>,
    pub upsample_factor: usize,
    pub smoothing_window: usize,
    pub smoothing_kernel: String,
    pub collaborator_timeout: Duration,
    pub model: Arc<dyn RegressionModel>,
}

impl FaceAnimator {
    pub(crate) fn from_parts(parts: FaceAnimatorParts) -> Self {
        Self {
            vocabulary: parts.vocabulary,
            frame_period_s: parts.frame_period_s,
            context_frames: parts.context_frames,
            channel_range: parts.channel_range,
            upsample_factor: parts.upsample_factor,
            smoothing_window: parts.smoothing_window,
            smoothing_kernel: parts.smoothing_kernel,
            collaborator_timeout: parts.collaborator_timeout,
            model: parts.model,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Runs one utterance through the whole pipeline: alignment text to
    /// smoothed per-channel animation curves. Structural errors abort
    /// the utterance; per-channel smoothing degradation does not.
    pub fn animate(
        &self,
        alignment_text: &str,
        duration_s: f64,
    ) -> Result<AnimationOutput, PipelineError> {
        let intervals = parse_phone_tier(alignment_text, duration_s)?;
        let frame_labels = quantize(&intervals, duration_s, self.frame_period_s);
        tracing::info!(
            intervals = intervals.len(),
            frames = frame_labels.len(),
            duration_s,
            "alignment quantized onto frame grid"
        );

        let windows = encode_windows(&frame_labels, &self.vocabulary, self.context_frames)?;
        let predictions = self.predict_channels(&windows)?;
        let channels = self.smooth_channels(&predictions);

        let degraded = channels.iter().filter(|c| c.warning.is_some()).count();
        if degraded > 0 {
            tracing::warn!(degraded, "channels returned unfiltered");
        }

        Ok(AnimationOutput {
            frame_labels,
            channels,
        })
    }

    /// Convenience wrapper over the on-disk collaborator artifacts: the
    /// aligner's text output and the audio probe's stat block.
    pub fn animate_files(
        &self,
        alignment_path: &Path,
        duration_probe_path: &Path,
    ) -> Result<AnimationOutput, PipelineError> {
        let alignment_text = std::fs::read_to_string(alignment_path)
            .map_err(|e| PipelineError::io("read alignment output", e))?;
        let duration_s = read_stat_duration(duration_probe_path)?;
        self.animate(&alignment_text, duration_s)
    }

    /// Runs one utterance and writes the terminal artifacts under
    /// `out_dir`: `<stem>.phoneme` with one label per frame, and one
    /// `sequence<i>` trajectory file per channel.
    pub fn animate_to_dir(
        &self,
        alignment_text: &str,
        duration_s: f64,
        out_dir: &Path,
        stem: &str,
    ) -> Result<AnimationOutput, PipelineError> {
        let output = self.animate(alignment_text, duration_s)?;
        std::fs::create_dir_all(out_dir)
            .map_err(|e| PipelineError::io("create output directory", e))?;
        crate::emit::write_frame_labels(
            &out_dir.join(format!("{stem}.phoneme")),
            &output.frame_labels,
        )?;
        let paths = crate::emit::write_channel_trajectories(out_dir, "sequence", &output.channels)?;
        tracing::info!(
            channels = paths.len(),
            out_dir = %out_dir.display(),
            "animation emitted"
        );
        Ok(output)
    }

    /// Prediction Adapter: one batched collaborator call, shape
    /// validation, then the configured channel-column slice.
    fn predict_channels(
        &self,
        windows: &FeatureWindows,
    ) -> Result<PredictionBatch, PipelineError> {
        let expected_rows = windows.rows.len();
        let raw = self.predict_with_retry(&windows.rows)?;

        if raw.len() != expected_rows {
            return Err(PipelineError::shape(format!(
                "regression returned {} rows for {expected_rows} windows",
                raw.len()
            )));
        }
        let range = self.channel_range.clone();
        let mut rows = Vec::with_capacity(raw.len());
        for (i, row) in raw.into_iter().enumerate() {
            if row.len() < range.end {
                return Err(PipelineError::shape(format!(
                    "regression row {i} has {} columns, need at least {}",
                    row.len(),
                    range.end
                )));
            }
            rows.push(row[range.clone()].to_vec());
        }
        Ok(PredictionBatch { rows })
    }

    fn predict_with_retry(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, PipelineError> {
        match self.predict_once(batch) {
            Err(PipelineError::CollaboratorTimeout {
                context,
                timeout_ms,
            }) => {
                tracing::warn!(context, timeout_ms, "collaborator timed out; retrying once");
                self.predict_once(batch)
            }
            other => other,
        }
    }

    fn predict_once(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let model = Arc::clone(&self.model);
        let rows = batch.to_vec();
        call_with_deadline(self.collaborator_timeout, "regression inference", move || {
            model.predict(&rows)
        })
    }

    /// Channels are independent columns; smooth them in parallel.
    fn smooth_channels(&self, batch: &PredictionBatch) -> Vec<SmoothedChannel> {
        (0..batch.channel_count())
            .into_par_iter()
            .map(|channel| {
                let column = batch.channel(channel);
                smooth_channel(
                    &column,
                    self.upsample_factor,
                    self.smoothing_window,
                    &self.smoothing_kernel,
                )
            })
            .collect()
    }
}
