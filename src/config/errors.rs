//! Structured spec diagnostics.

use serde::Serialize;

use super::error_code::ErrorCode;

/// A single problem found in a [`RankSpec`](super::spec::RankSpec).
///
/// `path` is a JSON pointer to the offending field (e.g. `"/damping"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecError {
    pub code: ErrorCode,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl SpecError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a suggestion for fixing the problem.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for SpecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_hint() {
        let err = SpecError::new(ErrorCode::InvalidValue, "/damping", "damping must be in [0, 1]")
            .with_hint("Use 0.85");
        assert_eq!(
            err.to_string(),
            "[invalid_value] /damping: damping must be in [0, 1] (hint: Use 0.85)"
        );
    }

    #[test]
    fn test_serialize_skips_missing_hint() {
        let err = SpecError::new(ErrorCode::UnknownField, "/foo", "unrecognized field \"foo\"");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "unknown_field");
        assert!(json.get("hint").is_none());
    }
}
