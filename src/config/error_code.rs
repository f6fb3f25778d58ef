//! Stable error codes attached to spec diagnostics.

use serde::Serialize;

/// Machine-readable category of a [`SpecError`](super::errors::SpecError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A value is outside its allowed domain.
    InvalidValue,
    /// A limit is zero or otherwise unusable.
    LimitExceeded,
    /// A field the schema does not know about.
    UnknownField,
    /// Individually valid settings that do not work together.
    InvalidCombo,
    /// Spec version other than the supported one.
    UnsupportedVersion,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidValue => "invalid_value",
            Self::LimitExceeded => "limit_exceeded",
            Self::UnknownField => "unknown_field",
            Self::InvalidCombo => "invalid_combo",
            Self::UnsupportedVersion => "unsupported_version",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
