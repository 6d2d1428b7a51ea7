/// Convenience result type used across flowreel.
pub type FlowreelResult<T> = Result<T, FlowreelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FlowreelError {
    /// Invalid widget, diagram or stage table data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration that cannot be honoured at runtime.
    #[error("config error: {0}")]
    Config(String),

    /// The host timer facility refused to arm a timer.
    #[error("scheduling error: {0}")]
    Scheduling(String),

    /// Errors when serializing or deserializing widget configs or traces.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors while producing a snapshot image.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowreelError {
    /// Build a [`FlowreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlowreelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FlowreelError::Scheduling`] value.
    pub fn scheduling(msg: impl Into<String>) -> Self {
        Self::Scheduling(msg.into())
    }

    /// Build a [`FlowreelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`FlowreelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
