use crate::error::PipelineError;

/// External regression collaborator. One batched call per utterance:
/// given one feature window per frame, returns one output vector per
/// frame, in frame order. The learned mapping lives entirely behind
/// this seam; the pipeline only slices the result.
pub trait RegressionModel: Send + Sync {
    fn predict(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, PipelineError>;
}
