pub mod alignment;
pub mod config;
pub mod emit;
pub mod error;
pub mod features;
mod model;
pub mod pipeline;
pub mod smoothing;
pub mod types;

pub use config::AnimatorConfig;
pub use error::PipelineError;
pub use features::vocab::Vocabulary;
pub use pipeline::builder::FaceAnimatorBuilder;
pub use pipeline::runtime::FaceAnimator;
pub use pipeline::traits::RegressionModel;
pub use smoothing::{SmoothedChannel, SmoothingKernel, SmoothingWarning};
pub use types::{AnimationOutput, FrameLabels, PhonemeInterval, PredictionBatch};
