/// Convenience result type used across revealkit.
pub type RevealResult<T> = Result<T, RevealError>;

/// Top-level error taxonomy used by construction and configuration APIs.
///
/// Frame processing never returns these: detached nodes and unresolvable images degrade to
/// "no animation" and are only logged.
#[derive(thiserror::Error, Debug)]
pub enum RevealError {
    /// Invalid host-provided data (metrics, layouts, transition specs).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Unparsable trigger positions or toggle actions.
    #[error("trigger error: {0}")]
    Trigger(String),

    /// A node required at mount time is no longer part of the stage.
    #[error("detached node: {0}")]
    Detached(String),

    /// The floating preview panel is already leased by another section.
    #[error("preview panel already leased: {0}")]
    PanelBusy(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RevealError {
    /// Build a [`RevealError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RevealError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`RevealError::Trigger`] value.
    pub fn trigger(msg: impl Into<String>) -> Self {
        Self::Trigger(msg.into())
    }

    /// Build a [`RevealError::Detached`] value.
    pub fn detached(msg: impl Into<String>) -> Self {
        Self::Detached(msg.into())
    }

    /// Build a [`RevealError::PanelBusy`] value.
    pub fn panel_busy(msg: impl Into<String>) -> Self {
        Self::PanelBusy(msg.into())
    }

    /// Build a [`RevealError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RevealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
