//! Error types and handling for abbreviation expansion

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for expansion, wrapping and profile management
#[derive(Debug, Error)]
pub enum ZenError {
    /// Malformed abbreviation grammar
    #[error("Parse error: {kind} at offset {offset}")]
    Parse { kind: ParseErrorKind, offset: usize },

    /// Structurally invalid token sequence
    #[error("Build error: {kind} at offset {offset}")]
    Build { kind: BuildErrorKind, offset: usize },

    /// Unknown profile name or malformed profile definition
    #[error("Profile error for '{name}': {message}")]
    Profile { name: String, message: String },

    /// The expanded tree would exceed the configured node ceiling
    #[error("Expansion too large: {nodes} nodes exceeds the limit of {limit}")]
    ExpansionTooLarge { nodes: usize, limit: usize },

    /// Cursor does not address a character boundary of the line
    #[error("Cursor offset {cursor} is outside the {len}-byte line or inside a character")]
    InvalidCursor { cursor: usize, len: usize },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Grammar failures reported by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Blank or all-whitespace input
    EmptyAbbreviation,
    /// `[` without a matching `]` (or a stray `]`)
    UnbalancedBracket,
    /// `{` without a matching `}` (or a stray `}`)
    UnbalancedBrace,
    /// `(` without a matching `)` (or a stray `)`)
    UnbalancedParen,
    /// A character that cannot start any token
    UnexpectedCharacter(char),
    /// `*0`
    InvalidMultiplier,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::EmptyAbbreviation => write!(f, "empty abbreviation"),
            ParseErrorKind::UnbalancedBracket => write!(f, "unbalanced attribute bracket"),
            ParseErrorKind::UnbalancedBrace => write!(f, "unbalanced text brace"),
            ParseErrorKind::UnbalancedParen => write!(f, "unbalanced group parenthesis"),
            ParseErrorKind::UnexpectedCharacter(c) => write!(f, "unexpected character {c:?}"),
            ParseErrorKind::InvalidMultiplier => write!(f, "multiplier must be positive"),
        }
    }
}

/// Token-sequence failures reported by the tree builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// `>` or `+` with nothing to apply to
    DanglingOperator,
    /// Elements or groups nested beyond the depth limit
    NestingTooDeep,
}

impl fmt::Display for BuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildErrorKind::DanglingOperator => write!(f, "operator is not followed by an element"),
            BuildErrorKind::NestingTooDeep => write!(f, "nesting exceeds the depth limit"),
        }
    }
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Build,
    Profile,
    ExpansionTooLarge,
    Cursor,
    Config,
    Io,
    Internal,
}

impl ZenError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZenError::Parse { .. } => ErrorKind::Parse,
            ZenError::Build { .. } => ErrorKind::Build,
            ZenError::Profile { .. } => ErrorKind::Profile,
            ZenError::ExpansionTooLarge { .. } => ErrorKind::ExpansionTooLarge,
            ZenError::InvalidCursor { .. } => ErrorKind::Cursor,
            ZenError::ConfigError { .. } => ErrorKind::Config,
            ZenError::IoError { .. } => ErrorKind::Io,
            ZenError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error only affects the current call (the caller can keep going)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Parse
                | ErrorKind::Build
                | ErrorKind::Profile
                | ErrorKind::ExpansionTooLarge
                | ErrorKind::Cursor
        )
    }

    /// The parse failure kind, if this is a parse error
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            ZenError::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The build failure kind, if this is a build error
    pub fn build_kind(&self) -> Option<BuildErrorKind> {
        match self {
            ZenError::Build { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Create a parse error
    pub fn parse_error(kind: ParseErrorKind, offset: usize) -> Self {
        Self::Parse { kind, offset }
    }

    /// Create a build error
    pub fn build_error(kind: BuildErrorKind, offset: usize) -> Self {
        Self::Build { kind, offset }
    }

    /// Create a profile error
    pub fn profile_error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Profile {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for ZenError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ZenError::parse_error(ParseErrorKind::UnbalancedBracket, 3);
        assert_eq!(
            err.to_string(),
            "Parse error: unbalanced attribute bracket at offset 3"
        );
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnbalancedBracket));
    }

    #[test]
    fn test_recoverability() {
        assert!(ZenError::ExpansionTooLarge { nodes: 20, limit: 10 }.is_recoverable());
        assert!(ZenError::profile_error("nope", "unknown profile").is_recoverable());
        assert!(!ZenError::config_error("bad").is_recoverable());
        assert!(!ZenError::from(std::io::Error::other("disk")).is_recoverable());
    }
}
