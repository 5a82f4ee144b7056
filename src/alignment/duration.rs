use std::path::Path;

use crate::error::PipelineError;

/// Fixed-width prefix of the second line of a `sox … stat` block.
const LENGTH_PREFIX: &str = "Length (seconds):";

/// Parses the audio-analysis probe output: a two-line text block whose
/// second line is `Length (seconds):<float>`.
pub fn parse_stat_duration(text: &str) -> Result<f64, PipelineError> {
    let line = text.lines().nth(1).ok_or_else(|| {
        PipelineError::format("duration probe has fewer than two lines".to_string())
    })?;
    let value = line.strip_prefix(LENGTH_PREFIX).ok_or_else(|| {
        PipelineError::format(format!(
            "duration probe line 2 does not start with {LENGTH_PREFIX:?}: {line:?}"
        ))
    })?;
    let duration: f64 = value.trim().parse().map_err(|_| {
        PipelineError::format(format!("duration probe value is not a number: {value:?}"))
    })?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(PipelineError::format(format!(
            "duration probe value must be a non-negative number, got {duration}"
        )));
    }
    Ok(duration)
}

pub fn read_stat_duration(path: &Path) -> Result<f64, PipelineError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::io("read duration probe", e))?;
    parse_stat_duration(&text)
}
