use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed alignment: {message}")]
    AlignmentFormat { message: String },
    #[error("alignment timing inconsistent with audio: {message}")]
    AlignmentTiming { message: String },
    #[error("phoneme label {label:?} at frame {frame_index} is not in the vocabulary")]
    UnknownPhoneme { label: String, frame_index: usize },
    #[error("regression batch shape mismatch: {message}")]
    ShapeMismatch { message: String },
    #[error("{context} did not complete within {timeout_ms} ms")]
    CollaboratorTimeout {
        context: &'static str,
        timeout_ms: u64,
    },
    #[error("{context}: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl PipelineError {
    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::AlignmentFormat {
            message: message.into(),
        }
    }

    pub(crate) fn timing(message: impl Into<String>) -> Self {
        Self::AlignmentTiming {
            message: message.into(),
        }
    }

    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
        }
    }

    pub(crate) fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
