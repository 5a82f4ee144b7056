use crate::smoothing::SmoothedChannel;

#[derive(Debug, Clone, PartialEq)]
pub struct PhonemeInterval {
    /// Seconds; interval is [start_s, end_s), start inclusive/end exclusive.
    pub start_s: f64,
    pub end_s: f64,
    pub label: String,
}

impl PhonemeInterval {
    pub fn new(start_s: f64, end_s: f64, label: impl Into<String>) -> Self {
        Self {
            start_s,
            end_s,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameLabels {
    /// Seconds per frame, fixed at construction time.
    pub frame_period_s: f64,
    /// One label per frame, frame index = position.
    pub labels: Vec<String>,
}

impl FrameLabels {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FeatureWindows {
    pub window_frames: usize,
    pub vocab_size: usize,
    /// One row per frame, each of length `window_frames * vocab_size`.
    pub rows: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionBatch {
    /// One row per frame; row width is the selected channel count.
    pub rows: Vec<Vec<f32>>,
}

impl PredictionBatch {
    pub fn channel_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Copies out one channel column across all frames.
    pub fn channel(&self, index: usize) -> Vec<f32> {
        self.rows.iter().map(|row| row[index]).collect()
    }
}

#[derive(Debug, Clone)]
pub struct AnimationOutput {
    pub frame_labels: FrameLabels,
    /// One smoothed trajectory per selected channel, in slice order.
    pub channels: Vec<SmoothedChannel>,
}
