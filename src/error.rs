//! Structured error types for bitview.
//!
//! Errors only surface at configuration and construction boundaries. Event
//! handling and drawing degrade to drawing less instead of failing.

/// All errors that can occur while configuring or wiring the bit viewer.
#[derive(Debug, thiserror::Error)]
pub enum BitviewError {
    /// Layout parameters failed validation.
    #[error("Invalid layout parameters: {0}")]
    InvalidParams(String),

    /// A palette entry is not a recognizable CSS color.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Configuration could not be deserialized.
    #[error("Configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The drawing surface could not be acquired or configured.
    #[error("Surface error: {0}")]
    Surface(String),

    /// The host environment refused a timer or listener registration.
    #[error("Host error: {0}")]
    Host(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BitviewError>;

#[cfg(target_arch = "wasm32")]
impl From<BitviewError> for wasm_bindgen::JsValue {
    fn from(e: BitviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = BitviewError::InvalidParams("bit width must be positive".into());
        assert_eq!(
            err.to_string(),
            "Invalid layout parameters: bit width must be positive"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: BitviewError = json_err.into();
        assert!(err.to_string().starts_with("Configuration:"));
    }
}
