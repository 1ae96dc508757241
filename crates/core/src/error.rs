#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The document is not ready to persist. `step` is the 1-based number
    /// of the offending step when the violation concerns a step.
    #[error("{message}")]
    Validation {
        step: Option<usize>,
        message: String,
    },

    #[error("Malformed timestamp: {0}")]
    Timestamp(String),

    #[error("Step index {index} out of range ({len} steps)")]
    StepOutOfRange { index: usize, len: usize },

    #[error("Steps can only be edited on a tutorial annotation")]
    NotTutorial,
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            step: None,
            message: message.into(),
        }
    }

    pub fn step_validation(step: usize, message: impl Into<String>) -> Self {
        Self::Validation {
            step: Some(step),
            message: message.into(),
        }
    }
}
