use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{Linear, VarBuilder};

use crate::config::AnimatorConfig;
use crate::error::PipelineError;
use crate::pipeline::traits::RegressionModel;

// Checkpoint architecture: three tanh hidden layers and a linear
// output head over the raw animation coordinate block.
const HIDDEN_UNITS: usize = 3000;
const HIDDEN_LAYERS: usize = 3;
const OUTPUT_DIM: usize = 80;

/// Default regression backend: the trained dense network, loaded from
/// safetensors and run with candle. Everything upstream only sees the
/// `RegressionModel` trait.
pub(crate) struct DenseRegressor {
    hidden: Vec<Linear>,
    output: Linear,
    device: Device,
}

impl DenseRegressor {
    pub(crate) fn load(config: &AnimatorConfig, input_dim: usize) -> Result<Self, PipelineError> {
        let device = match config.device.as_str() {
            "cuda" => {
                Device::new_cuda(0).map_err(|e| PipelineError::runtime("CUDA init", e))?
            }
            _ => Device::Cpu,
        };

        let model_data = std::fs::read(&config.model_path)
            .map_err(|e| PipelineError::io("read safetensors", e))?;
        let vb = VarBuilder::from_buffered_safetensors(model_data, DType::F32, &device)
            .map_err(|e| PipelineError::runtime("load safetensors", e))?;

        let mut hidden = Vec::with_capacity(HIDDEN_LAYERS);
        let mut in_dim = input_dim;
        for layer in 0..HIDDEN_LAYERS {
            let linear = candle_nn::linear(in_dim, HIDDEN_UNITS, vb.pp(format!("fc{}", layer + 1)))
                .map_err(|e| PipelineError::runtime("build hidden layer", e))?;
            hidden.push(linear);
            in_dim = HIDDEN_UNITS;
        }
        let output = candle_nn::linear(in_dim, OUTPUT_DIM, vb.pp("out"))
            .map_err(|e| PipelineError::runtime("build output layer", e))?;

        tracing::info!(
            input_dim,
            hidden_units = HIDDEN_UNITS,
            hidden_layers = HIDDEN_LAYERS,
            output_dim = OUTPUT_DIM,
            ?device,
            "dense regressor loaded"
        );

        Ok(Self {
            hidden,
            output,
            device,
        })
    }

    fn build_batch_tensor(&self, batch: &[Vec<f32>]) -> Result<Tensor, PipelineError> {
        let rows = batch.len();
        let cols = batch[0].len();
        let mut flat = Vec::with_capacity(rows * cols);
        for (i, row) in batch.iter().enumerate() {
            if row.len() != cols {
                return Err(PipelineError::invalid_input(format!(
                    "feature row {i} has {} values, expected {cols}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }
        Tensor::from_vec(flat, (rows, cols), &self.device)
            .map_err(|e| PipelineError::runtime("tensor creation", e))
    }
}

impl RegressionModel for DenseRegressor {
    fn predict(&self, batch: &[Vec<f32>]) -> Result<Vec<Vec<f32>>, PipelineError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let mut h = self.build_batch_tensor(batch)?;
        for linear in &self.hidden {
            h = linear
                .forward(&h)
                .and_then(|t| t.tanh())
                .map_err(|e| PipelineError::runtime("forward pass", e))?;
        }
        let y = self
            .output
            .forward(&h)
            .map_err(|e| PipelineError::runtime("forward pass", e))?;
        y.to_vec2()
            .map_err(|e| PipelineError::runtime("to_vec2", e))
    }
}
