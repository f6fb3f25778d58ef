//! Validation engine for rank specifications.
//!
//! The engine runs all registered [`ValidationRule`]s against a
//! [`RankSpec`](super::spec::RankSpec) and collects every diagnostic into a
//! [`ValidationReport`]. It never short-circuits on the first error, so users
//! see all problems at once.
//!
//! # Quick start
//!
//! ```rust
//! use rapid_generank::config::validation::ValidationEngine;
//! use rapid_generank::RankSpec;
//!
//! let spec = RankSpec::from_json(r#"{ "v": 1, "damping": 2.0 }"#).unwrap();
//! let report = ValidationEngine::with_defaults().validate(&spec);
//! assert!(report.has_errors());
//! for err in report.errors() {
//!     eprintln!("{err}");
//! }
//! ```

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::SpecError;
use super::spec::{RankSpec, SPEC_VERSION};

/// Hard errors reject a spec; warnings are only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding of one rule.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: SpecError,
}

impl ValidationDiagnostic {
    pub fn error(error: SpecError) -> Self {
        Self {
            severity: Severity::Error,
            error,
        }
    }

    pub fn warning(error: SpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error,
        }
    }

    fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Every diagnostic produced by one validation pass, in rule order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &SpecError> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
            .map(|d| &d.error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &SpecError> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &SpecError> {
        self.with_severity(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(ValidationDiagnostic::is_error)
    }

    /// A spec with only warnings is still usable.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.has_errors() {
            return f.write_str("no errors");
        }
        for (i, err) in self.errors().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

/// A check over a [`RankSpec`].
///
/// Rules hold no state, so a single engine can be shared between threads.
pub trait ValidationRule: Send + Sync {
    /// Stable rule identifier, e.g. `"damping_range"`.
    fn name(&self) -> &str;

    fn validate(&self, spec: &RankSpec) -> Vec<ValidationDiagnostic>;
}

/// Ordered set of rules. Every rule runs even after an earlier one failed.
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// An engine without rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The rules applied by [`RankSpec::validate`].
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(SpecVersionRule));
        engine.add_rule(Box::new(DampingRangeRule));
        engine.add_rule(Box::new(ThresholdRule));
        engine.add_rule(Box::new(IterationCapRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, spec: &RankSpec) -> ValidationReport {
        ValidationReport {
            diagnostics: self
                .rules
                .iter()
                .flat_map(|rule| rule.validate(spec))
                .collect(),
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// spec_version: only version 1 is understood

struct SpecVersionRule;

impl ValidationRule for SpecVersionRule {
    fn name(&self) -> &str {
        "spec_version"
    }

    fn validate(&self, spec: &RankSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            SpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint(format!("Set \"v\": {SPEC_VERSION}")),
        )]
    }
}

// damping_range: [0, 1], with a warning at 1.0 where restart disappears

struct DampingRangeRule;

impl ValidationRule for DampingRangeRule {
    fn name(&self) -> &str {
        "damping_range"
    }

    fn validate(&self, spec: &RankSpec) -> Vec<ValidationDiagnostic> {
        if !(0.0..=1.0).contains(&spec.damping) {
            return vec![ValidationDiagnostic::error(
                SpecError::new(
                    ErrorCode::InvalidValue,
                    "/damping",
                    format!("damping must be in [0, 1], got {}", spec.damping),
                )
                .with_hint("Typical values are 0.85 or 0.9"),
            )];
        }

        if spec.damping == 1.0 {
            return vec![ValidationDiagnostic::warning(
                SpecError::new(
                    ErrorCode::InvalidCombo,
                    "/damping",
                    "damping 1.0 removes all restart mass; the walk may never converge",
                )
                .with_hint("Use a damping below 1, or rely on max_iterations"),
            )];
        }

        vec![]
    }
}

// threshold_positive

struct ThresholdRule;

impl ValidationRule for ThresholdRule {
    fn name(&self) -> &str {
        "threshold_positive"
    }

    fn validate(&self, spec: &RankSpec) -> Vec<ValidationDiagnostic> {
        if spec.threshold.is_finite() && spec.threshold > 0.0 {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            SpecError::new(
                ErrorCode::InvalidValue,
                "/threshold",
                format!("threshold must be a positive number, got {}", spec.threshold),
            )
            .with_hint("The default is 1e-6"),
        )]
    }
}

// iteration_cap

struct IterationCapRule;

impl ValidationRule for IterationCapRule {
    fn name(&self) -> &str {
        "iteration_cap"
    }

    fn validate(&self, spec: &RankSpec) -> Vec<ValidationDiagnostic> {
        if spec.max_iterations > 0 {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            SpecError::new(
                ErrorCode::LimitExceeded,
                "/max_iterations",
                "max_iterations must be greater than 0",
            )
            .with_hint("Remove max_iterations to use the default cap"),
        )]
    }
}

// unknown_fields: errors in strict mode, warnings otherwise

struct UnknownFieldsRule;

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &RankSpec) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = spec.unknown_fields.keys().collect();
        keys.sort();

        keys.into_iter()
            .map(|key| {
                let error = SpecError::new(
                    ErrorCode::UnknownField,
                    format!("/{key}"),
                    format!("field \"{key}\" is not part of rank spec v{SPEC_VERSION}"),
                )
                .with_hint("Remove it, or fix its spelling");
                if spec.strict {
                    ValidationDiagnostic::error(error)
                } else {
                    ValidationDiagnostic::warning(error)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: &str) -> RankSpec {
        serde_json::from_str(json).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    // valid specs

    #[test]
    fn test_minimal_spec_is_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1 }"#));
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_zero_damping_is_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1, "damping": 0.0 }"#));
        assert!(report.is_empty());
    }

    // errors

    #[test]
    fn test_wrong_version() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::UnsupportedVersion);
        assert_eq!(errors[0].path, "/v");
    }

    #[test]
    fn test_damping_out_of_range() {
        for bad in ["-0.1", "1.01"] {
            let report = engine().validate(&spec(&format!(r#"{{ "v": 1, "damping": {bad} }}"#)));
            let errors: Vec<_> = report.errors().collect();
            assert_eq!(errors.len(), 1, "damping {bad}");
            assert_eq!(errors[0].path, "/damping");
        }
    }

    #[test]
    fn test_nan_damping_rejected() {
        let mut s = RankSpec::default();
        s.damping = f64::NAN;
        assert!(engine().validate(&s).has_errors());
    }

    #[test]
    fn test_full_damping_warns() {
        let report = engine().validate(&spec(r#"{ "v": 1, "damping": 1.0 }"#));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_non_positive_threshold() {
        let report = engine().validate(&spec(r#"{ "v": 1, "threshold": 0.0 }"#));
        assert_eq!(report.errors().next().unwrap().path, "/threshold");

        let mut s = RankSpec::default();
        s.threshold = f64::INFINITY;
        assert!(engine().validate(&s).has_errors());
    }

    #[test]
    fn test_zero_iteration_cap() {
        let report = engine().validate(&spec(r#"{ "v": 1, "max_iterations": 0 }"#));
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::LimitExceeded);
    }

    #[test]
    fn test_collects_all_errors() {
        let report = engine().validate(&spec(
            r#"{ "v": 3, "damping": 7.0, "threshold": -1.0, "max_iterations": 0 }"#,
        ));
        assert_eq!(report.errors().count(), 4);
    }

    // unknown fields

    #[test]
    fn test_unknown_field_warns_when_lenient() {
        let report = engine().validate(&spec(r#"{ "v": 1, "restart_prob": 0.9 }"#));
        assert!(report.is_valid());
        let warning = report.warnings().next().unwrap();
        assert_eq!(warning.code, ErrorCode::UnknownField);
        assert_eq!(warning.path, "/restart_prob");
    }

    #[test]
    fn test_unknown_field_errors_when_strict() {
        let report =
            engine().validate(&spec(r#"{ "v": 1, "strict": true, "restart_prob": 0.9 }"#));
        assert!(report.has_errors());
    }

    // engine

    #[test]
    fn test_custom_rule() {
        struct NoParallel;
        impl ValidationRule for NoParallel {
            fn name(&self) -> &str {
                "no_parallel"
            }
            fn validate(&self, spec: &RankSpec) -> Vec<ValidationDiagnostic> {
                if spec.parallel {
                    vec![ValidationDiagnostic::error(SpecError::new(
                        ErrorCode::InvalidCombo,
                        "/parallel",
                        "parallel is disabled here",
                    ))]
                } else {
                    vec![]
                }
            }
        }

        let mut engine = ValidationEngine::new();
        engine.add_rule(Box::new(NoParallel));
        assert_eq!(engine.rule_names(), vec!["no_parallel"]);
        assert!(engine
            .validate(&spec(r#"{ "v": 1, "parallel": true }"#))
            .has_errors());
    }

    #[test]
    fn test_report_display_lists_errors() {
        let report = engine().validate(&spec(r#"{ "v": 1, "max_iterations": 0 }"#));
        assert!(report.to_string().contains("/max_iterations"));
        assert_eq!(ValidationReport::default().to_string(), "no errors");
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = engine().validate(&spec(r#"{ "v": 1, "damping": 5.0 }"#));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["diagnostics"][0]["severity"], "error");
        assert_eq!(json["diagnostics"][0]["code"], "invalid_value");
        assert_eq!(json["diagnostics"][0]["path"], "/damping");
    }
}
