//! Configuration validation issues.
//!
//! Loaded configuration is checked once at startup; every problem found is
//! reported as a [`ConfigIssue`] with a severity, so the caller decides
//! whether to warn or refuse to start.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Convergence threshold outside (0, 1].
    ThresholdOutOfRange,
    /// `max_rounds` is zero: no round would ever run.
    ZeroRounds,
    /// `max_personas` smaller than the configured roster.
    RosterExceedsLimit,
    /// `interaction.mode` is neither interactive nor headless.
    UnknownInteractionMode,
    /// `personas.command` is empty.
    EmptyCommand,
    /// `personas.command` never mentions `{persona}`.
    CommandWithoutPersona,
    /// A timeout of zero seconds.
    ZeroTimeout,
    /// `personas.working_dir` is not an existing directory.
    MissingWorkingDir,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
