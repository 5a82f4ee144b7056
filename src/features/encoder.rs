use crate::error::PipelineError;
use crate::features::vocab::Vocabulary;
use crate::types::{FeatureWindows, FrameLabels};

/// Encodes each frame label as a one-hot vector over the vocabulary and
/// expands every frame into the flattened concatenation of its
/// `window_frames` temporal neighbors. Sequence boundaries replicate
/// the first/last frame's encoding rather than zero-padding, so edge
/// windows keep the boundary phoneme's signal instead of a spurious
/// silent class.
pub fn encode_windows(
    frames: &FrameLabels,
    vocab: &Vocabulary,
    window_frames: usize,
) -> Result<FeatureWindows, PipelineError> {
    if window_frames == 0 || window_frames % 2 == 0 {
        return Err(PipelineError::invalid_input(format!(
            "context window width must be odd and >= 1, got {window_frames}"
        )));
    }

    let vocab_size = vocab.len();
    let half = (window_frames - 1) / 2;

    let mut one_hot = Vec::with_capacity(frames.len());
    for (frame_index, label) in frames.labels.iter().enumerate() {
        let index = vocab
            .index_of(label)
            .ok_or_else(|| PipelineError::UnknownPhoneme {
                label: label.clone(),
                frame_index,
            })?;
        let mut row = vec![0.0f32; vocab_size];
        row[index] = 1.0;
        one_hot.push(row);
    }

    let frame_count = one_hot.len();
    let mut rows = Vec::with_capacity(frame_count);
    for i in 0..frame_count {
        let mut row = Vec::with_capacity(window_frames * vocab_size);
        for k in 0..window_frames {
            // padded index i+k maps back into [0, frame_count) by edge
            // replication
            let j = (i + k).saturating_sub(half).min(frame_count - 1);
            row.extend_from_slice(&one_hot[j]);
        }
        rows.push(row);
    }

    Ok(FeatureWindows {
        window_frames,
        vocab_size,
        rows,
    })
}
