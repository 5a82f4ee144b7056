use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AnimatorConfig;
use crate::error::PipelineError;
use crate::features::vocab::Vocabulary;
use crate::model::DenseRegressor;
use crate::pipeline::runtime::{FaceAnimator, FaceAnimatorParts};
use crate::pipeline::traits::RegressionModel;

pub struct FaceAnimatorBuilder {
    config: AnimatorConfig,
    model: Option<Arc<dyn RegressionModel>>,
    vocabulary: Option<Vocabulary>,
}

impl FaceAnimatorBuilder {
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            config,
            model: None,
            vocabulary: None,
        }
    }

    pub fn with_model(mut self, model: Box<dyn RegressionModel>) -> Self {
        self.model = Some(Arc::from(model));
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    pub fn build(self) -> Result<FaceAnimator, PipelineError> {
        let config = self.config;
        if config.context_frames == 0 || config.context_frames % 2 == 0 {
            return Err(PipelineError::invalid_input(format!(
                "context_frames must be odd and >= 1, got {}",
                config.context_frames
            )));
        }
        if !config.frame_period_s.is_finite() || config.frame_period_s <= 0.0 {
            return Err(PipelineError::invalid_input(format!(
                "frame_period_s must be positive, got {}",
                config.frame_period_s
            )));
        }
        if config.upsample_factor == 0 {
            return Err(PipelineError::invalid_input(
                "upsample_factor must be >= 1",
            ));
        }
        if config.channel_start >= config.channel_end {
            return Err(PipelineError::invalid_input(format!(
                "channel slice [{}, {}) is empty",
                config.channel_start, config.channel_end
            )));
        }

        let vocabulary = match self.vocabulary {
            Some(vocabulary) => vocabulary,
            None if config.vocab_path.is_empty() => Vocabulary::builtin(),
            None => Vocabulary::load(Path::new(&config.vocab_path))?,
        };
        if vocabulary.is_empty() {
            return Err(PipelineError::invalid_input("vocabulary is empty"));
        }

        let model = match self.model {
            Some(model) => model,
            None if config.model_path.is_empty() => {
                return Err(PipelineError::invalid_input(
                    "no regression model: set model_path or inject one with with_model",
                ));
            }
            None => {
                let input_dim = config.context_frames * vocabulary.len();
                Arc::new(DenseRegressor::load(&config, input_dim)?) as Arc<dyn RegressionModel>
            }
        };

        Ok(FaceAnimator::from_parts(FaceAnimatorParts {
            vocabulary,
            frame_period_s: config.frame_period_s,
            context_frames: config.context_frames,
            channel_range: config.channel_range(),
            upsample_factor: config.upsample_factor,
            smoothing_window: config.smoothing_window,
            smoothing_kernel: config.smoothing_kernel,
            collaborator_timeout: Duration::from_millis(config.collaborator_timeout_ms),
            model,
        }))
    }
}
