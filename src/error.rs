use thiserror::Error;

/// Classifies engine errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PslErrorKind {
    /// Nothing usable could be extracted from the caller's input
    Input,
    /// Input was understood but has no registrable boundary or known suffix
    Resolution,
    /// Ruleset text is malformed or empty
    Data,
    /// Ruleset file could not be read
    Io,
}

/// PSL engine error types
#[derive(Error, Debug)]
pub enum PslError {
    #[error("Could not extract a hostname from empty input")]
    EmptyInput,

    #[error("Could not determine registered domain for: {0}")]
    NoRegisteredDomain(String),

    #[error("Could not determine public suffix for: {0}")]
    NoPublicSuffixDetermined(String),

    #[error("Public suffix is not listed for: {0}")]
    UnlistedSuffix(String),

    #[error("Parse error at line {line}: {message}")]
    ParseErrorAtLine { line: usize, message: String },

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Rule set contains no rules")]
    EmptyRuleSet,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PslError {
    /// Coarse classification of this error.
    pub fn kind(&self) -> PslErrorKind {
        match self {
            PslError::EmptyInput => PslErrorKind::Input,
            PslError::NoRegisteredDomain(_)
            | PslError::NoPublicSuffixDetermined(_)
            | PslError::UnlistedSuffix(_) => PslErrorKind::Resolution,
            PslError::ParseErrorAtLine { .. }
            | PslError::InvalidRule(_)
            | PslError::EmptyRuleSet => PslErrorKind::Data,
            PslError::IoError(_) => PslErrorKind::Io,
        }
    }

    /// True for errors raised while resolving a single input, as opposed to
    /// errors raised while loading a ruleset.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), PslErrorKind::Input | PslErrorKind::Resolution)
    }
}

pub type Result<T> = std::result::Result<T, PslError>;
