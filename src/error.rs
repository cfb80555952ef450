//! Typed failure taxonomy for the decode pipeline (spec §7).
//!
//! Every stage of the pipeline returns a typed [`Exceptions`] variant rather
//! than panicking or reading past a buffer. `MultiFormatReader` (see
//! [`crate::reader`]) is the only place a `NotFound` from one reader is
//! swallowed in favor of trying the next.

use std::fmt;

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Exceptions>;

/// The closed set of ways a decode can fail.
///
/// Each variant carries an optional human-readable detail message for
/// diagnostics; the detail is never parsed by callers and carries no
/// semantics of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exceptions {
    /// No symbol located, or a sampled grid point landed off-image.
    NotFound(Option<String>),
    /// A symbol was located but its structure violates the symbology spec.
    FormatError(Option<String>),
    /// Reed-Solomon decoding exceeded the block's correction capability.
    ChecksumError(Option<String>),
    /// The caller violated a public contract (bad coordinates, empty input).
    InvalidArgument(Option<String>),
    /// The operation is not supported by this source/reader.
    Unsupported(Option<String>),
}

impl Exceptions {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(Some(msg.into()))
    }

    pub const fn not_found_bare() -> Self {
        Self::NotFound(None)
    }

    pub fn format_error(msg: impl Into<String>) -> Self {
        Self::FormatError(Some(msg.into()))
    }

    pub const fn format_error_bare() -> Self {
        Self::FormatError(None)
    }

    pub fn checksum_error(msg: impl Into<String>) -> Self {
        Self::ChecksumError(Some(msg.into()))
    }

    pub const fn checksum_error_bare() -> Self {
        Self::ChecksumError(None)
    }

    pub fn invalid_argument_with(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(Some(msg.into()))
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(Some(msg.into()))
    }

    /// The error "kind" with the detail message stripped, useful for
    /// `MultiFormatReader`'s "try next format on NotFound" dispatch rule.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::FormatError(_) => "FormatError",
            Self::ChecksumError(_) => "ChecksumError",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::Unsupported(_) => "Unsupported",
        }
    }
}

impl fmt::Display for Exceptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, detail) = match self {
            Self::NotFound(d) => ("symbol not found", d),
            Self::FormatError(d) => ("malformed symbol", d),
            Self::ChecksumError(d) => ("checksum failed", d),
            Self::InvalidArgument(d) => ("invalid argument", d),
            Self::Unsupported(d) => ("unsupported operation", d),
        };
        match detail {
            Some(d) => write!(f, "{kind}: {d}"),
            None => write!(f, "{kind}"),
        }
    }
}

impl std::error::Error for Exceptions {}
