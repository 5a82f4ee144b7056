use crate::types::{FrameLabels, PhonemeInterval};

/// Resamples a contiguous phoneme timeline onto the fixed frame grid:
/// `ceil(duration / period)` frames, frame `i` sampled at `i * period`.
///
/// The interval cursor only ever advances, so the scan is
/// O(frames + intervals). A final frame whose sample instant lands past
/// every interval end (rounding) is clamped to the last interval.
pub fn quantize(
    intervals: &[PhonemeInterval],
    duration_s: f64,
    frame_period_s: f64,
) -> FrameLabels {
    let frame_count = if duration_s > 0.0 && frame_period_s > 0.0 {
        (duration_s / frame_period_s).ceil() as usize
    } else {
        0
    };

    let mut labels = Vec::with_capacity(frame_count);
    if intervals.is_empty() {
        return FrameLabels {
            frame_period_s,
            labels,
        };
    }

    let mut cursor = 0usize;
    for i in 0..frame_count {
        let t = i as f64 * frame_period_s;
        while cursor + 1 < intervals.len() && t >= intervals[cursor].end_s {
            cursor += 1;
        }
        labels.push(intervals[cursor].label.clone());
    }

    FrameLabels {
        frame_period_s,
        labels,
    }
}
