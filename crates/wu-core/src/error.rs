//! Error types for URL parsing and mutation

/// Why a parse or a setter was rejected.
///
/// Parsing entry points only promise success or failure; the variant is
/// diagnostic and callers are not expected to branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid scheme")]
    InvalidScheme,
    #[error("Invalid host")]
    InvalidHost,
    #[error("Invalid port")]
    InvalidPort,
    #[error("Missing host")]
    MissingHost,
    #[error("Invalid input encoding")]
    InvalidInputEncoding,
    #[error("Relative URL without a base")]
    RelativeUrlWithoutBase,
    #[error("Invalid base URL")]
    InvalidBase,
    #[error("URL has an opaque path")]
    OpaquePath,
    #[error("URL cannot carry credentials or a port")]
    NoCredentials,
    #[error("Attribute is read-only")]
    ReadOnlyAttribute,
    #[error("IDNA error: {0}")]
    Idna(#[from] wu_idna::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ParseError>;
