//! # BServer Errors
//!
//! Error classification and wire translation between a remote block server
//! and its client.
//!
//! The server reports failures as a generic [`Status`] envelope: a numeric
//! code, a symbolic name, free-form description text and key/value fields.
//! This crate reconstructs a precise, typed [`BServerError`] from that
//! envelope so calling code can branch on the failure kind, and exports a
//! typed error back into an envelope.
//!
//! ## Design Philosophy
//!
//! 1. **The taxonomy is closed**: six known kinds, one wire code each
//! 2. **Unknown codes degrade, never fail**: they become [`BServerError::Unknown`]
//!    with every detail of the envelope preserved
//! 3. **No error is a first-class outcome**: code `0` classifies to `None`
//! 4. **Protocol defects are not application errors**: a mistyped decode
//!    target is a [`DispatchError`], kept apart from [`BServerError`]
//! 5. **Default text is presentation only**: [`BServerError::message`]
//!    substitutes it, the exported envelope never does
//! 6. **Owned error text is zeroized on drop**
//!
//! ## Pipeline
//!
//! ```text
//! wire bytes ──transport──▶ Status ──unwrap_error──▶ Option<BServerError>
//!                              ▲                          │
//!                              └──────── to_status ───────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use bserver_errors::{classify, BServerError, ExportableError, RecoveryHint, Status};
//!
//! let status = Status::new(2704, "BLOCK_NONEXISTENT", "missing block xyz");
//! let err = classify(Some(&status)).unwrap();
//!
//! assert!(matches!(err, BServerError::BlockNonExistent { .. }));
//! assert_eq!(err.message(), "missing block xyz");
//! assert_eq!(err.recovery(), RecoveryHint::Surface);
//!
//! // Re-export is faithful to what was received.
//! assert_eq!(err.to_status(), status);
//! ```
//!
//! ## Permission Failures
//!
//! ```rust
//! use bserver_errors::{classify, Status};
//! use std::io;
//!
//! let err = classify(Some(&Status::new(2702, "SESSION_UNAUTHORIZED", ""))).unwrap();
//! assert!(err.is_permission_denied());
//! assert_eq!(err.message(), "BServer: session not validated");
//!
//! let os: io::Error = err.into();
//! assert_eq!(os.kind(), io::ErrorKind::PermissionDenied);
//! ```
//!
//! ## Features
//!
//! - `trusted_debug`: Enable `StatusLog::format_for_trusted_debug` (debug builds only)

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::result;
use zeroize::Zeroize;

pub mod codes;
pub mod definitions;
pub mod export;
pub mod logging;
pub mod status;
pub mod unwrap;

pub use codes::*;
pub use logging::*;
pub use status::*;
pub use unwrap::*;

/// Type alias for Results using the block server error type.
pub type Result<T> = result::Result<T, BServerError>;

// ============================================================================
// Unknown-Code Fallback
// ============================================================================

/// Application status error for a code outside the known taxonomy.
///
/// Preserves the envelope's code, name and description, and its fields
/// flattened into a map (later duplicate key wins). Fields are kept sorted
/// by key so display and re-export are deterministic.
///
/// The code is always a non-zero code outside the assigned table; a value
/// carrying `0` or a known code cannot be built.
#[must_use = "errors should be handled or logged"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStatusError {
    code: i32,
    name: String,
    desc: String,
    fields: BTreeMap<String, String>,
}

impl AppStatusError {
    /// Create a fallback error without fields.
    ///
    /// Returns `None` when `code` is `0` or belongs to a known kind; those
    /// are built with [`BServerError::new`] or not at all.
    pub fn new(code: i32, name: impl Into<String>, desc: impl Into<String>) -> Option<Self> {
        if !definitions::is_unassigned(code) {
            return None;
        }
        Some(Self {
            code,
            name: name.into(),
            desc: desc.into(),
            fields: BTreeMap::new(),
        })
    }

    /// Capture everything an envelope carries. The caller has already
    /// checked that the code is unassigned.
    pub(crate) fn from_status(status: &Status) -> Self {
        debug_assert!(definitions::is_unassigned(status.code));
        Self {
            code: status.code,
            name: status.name.clone(),
            desc: status.desc.clone(),
            fields: status.fields_map(),
        }
    }

    /// Insert a field, replacing any previous value for the key.
    #[inline]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Wire code as received.
    #[inline]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Symbolic name as received.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description as received.
    #[inline]
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Flattened fields.
    #[inline]
    pub const fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

impl Zeroize for AppStatusError {
    // Code is kept; it must stay unassigned.
    fn zeroize(&mut self) {
        self.name.zeroize();
        self.desc.zeroize();
        // BTreeMap keys are immutable in place; take ownership to clear them.
        for (mut key, mut value) in std::mem::take(&mut self.fields) {
            key.zeroize();
            value.zeroize();
        }
    }
}

impl Drop for AppStatusError {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Display for AppStatusError {
    /// `desc (k=v, k=v)`, or `NAME (code N)` when there is nothing else to show.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.desc.is_empty() && self.fields.is_empty() {
            return write!(f, "{} (code {})", self.name, self.code);
        }
        f.write_str(&self.desc)?;
        if !self.fields.is_empty() {
            if !self.desc.is_empty() {
                f.write_str(" ")?;
            }
            f.write_str("(")?;
            for (i, (key, value)) in self.fields.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppStatusError {}

// ============================================================================
// Block Server Error Taxonomy
// ============================================================================

/// Typed error reconstructed from a block server status envelope.
///
/// One arm per known [`ErrorKind`], each holding the raw message the server
/// sent (possibly empty), plus [`BServerError::Unknown`] for every other
/// non-zero code.
///
/// # Key Properties
///
/// - [`message`](Self::message) substitutes a fixed default for an empty
///   message on the kinds that define one
/// - [`to_status`](ExportableError::to_status) exports the raw message
/// - All owned text is zeroized on drop
#[must_use = "errors should be handled or logged"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BServerError {
    /// Generic block server error.
    ServerError {
        /// Raw message, may be empty.
        message: String,
    },
    /// Malformed client request.
    BadRequest {
        /// Raw message, may be empty.
        message: String,
    },
    /// Session not validated.
    Unauthorized {
        /// Raw message, may be empty.
        message: String,
    },
    /// User exceeded their quota.
    OverQuota {
        /// Raw message, may be empty.
        message: String,
    },
    /// Referenced block does not exist.
    BlockNonExistent {
        /// Raw message, may be empty.
        message: String,
    },
    /// Server asks the client to back off.
    Throttle {
        /// Raw message, may be empty.
        message: String,
    },
    /// Any code outside the known taxonomy.
    Unknown(AppStatusError),
}

impl BServerError {
    /// Create an error of a known kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::ServerError => Self::ServerError { message },
            ErrorKind::BadRequest => Self::BadRequest { message },
            ErrorKind::Unauthorized => Self::Unauthorized { message },
            ErrorKind::OverQuota => Self::OverQuota { message },
            ErrorKind::BlockNonExistent => Self::BlockNonExistent { message },
            ErrorKind::Throttle => Self::Throttle { message },
        }
    }

    // Convenience constructors, one per kind. Grep-able at call sites.

    /// Create a generic server error.
    #[inline]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::ServerError {
            message: message.into(),
        }
    }

    /// Create a bad-request error.
    #[inline]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create an unauthorized-session error.
    #[inline]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create an over-quota error.
    #[inline]
    pub fn over_quota(message: impl Into<String>) -> Self {
        Self::OverQuota {
            message: message.into(),
        }
    }

    /// Create a non-existent-block error.
    #[inline]
    pub fn block_non_existent(message: impl Into<String>) -> Self {
        Self::BlockNonExistent {
            message: message.into(),
        }
    }

    /// Create a throttle error.
    #[inline]
    pub fn throttle(message: impl Into<String>) -> Self {
        Self::Throttle {
            message: message.into(),
        }
    }

    /// Known kind, or `None` for the unknown fallback.
    #[inline]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::ServerError { .. } => Some(ErrorKind::ServerError),
            Self::BadRequest { .. } => Some(ErrorKind::BadRequest),
            Self::Unauthorized { .. } => Some(ErrorKind::Unauthorized),
            Self::OverQuota { .. } => Some(ErrorKind::OverQuota),
            Self::BlockNonExistent { .. } => Some(ErrorKind::BlockNonExistent),
            Self::Throttle { .. } => Some(ErrorKind::Throttle),
            Self::Unknown(_) => None,
        }
    }

    /// Message exactly as carried, without default substitution.
    ///
    /// For the unknown fallback this is the envelope description.
    #[inline]
    pub fn raw_message(&self) -> &str {
        match self {
            Self::ServerError { message }
            | Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::OverQuota { message }
            | Self::BlockNonExistent { message }
            | Self::Throttle { message } => message,
            Self::Unknown(inner) => inner.desc(),
        }
    }

    /// Human-readable message.
    ///
    /// Returns the carried message when non-empty, otherwise the kind's
    /// fixed default text. `ServerError`, `Throttle` and the unknown fallback
    /// define no default and may return an empty string.
    pub fn message(&self) -> &str {
        let raw = self.raw_message();
        if !raw.is_empty() {
            return raw;
        }
        self.kind()
            .and_then(ErrorKind::default_message)
            .unwrap_or(raw)
    }

    /// Wire code.
    #[inline]
    pub fn code(&self) -> i32 {
        match self {
            Self::Unknown(inner) => inner.code(),
            known => known.kind().map_or(0, ErrorKind::code),
        }
    }

    /// Symbolic wire name.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Unknown(inner) => inner.name(),
            known => known.kind().map_or("", ErrorKind::name),
        }
    }

    /// Recovery hint for the caller's retry policy.
    #[inline]
    pub const fn recovery(&self) -> RecoveryHint {
        match self.kind() {
            Some(kind) => kind.recovery(),
            None => RecoveryHint::Surface,
        }
    }

    /// Whether the hinted recovery makes a retry worthwhile.
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        self.recovery().is_retryable()
    }

    /// Whether this error denotes an OS-level permission failure.
    ///
    /// Only [`BServerError::Unauthorized`] does.
    #[inline]
    pub const fn is_permission_denied(&self) -> bool {
        match self.kind() {
            Some(kind) => kind.is_permission_denied(),
            None => false,
        }
    }

    /// Permission-denied OS error for filesystem integration.
    ///
    /// `Some` only for [`BServerError::Unauthorized`]; the returned error has
    /// kind [`io::ErrorKind::PermissionDenied`] and wraps a copy of `self`.
    pub fn permission_denied(&self) -> Option<io::Error> {
        if self.is_permission_denied() {
            Some(io::Error::new(io::ErrorKind::PermissionDenied, self.clone()))
        } else {
            None
        }
    }

    /// The fallback detail, if this is an unknown code.
    #[inline]
    pub const fn as_app_status(&self) -> Option<&AppStatusError> {
        match self {
            Self::Unknown(inner) => Some(inner),
            _ => None,
        }
    }

    /// Structured log view borrowing from this error.
    ///
    /// The view cannot outlive the error; hand it to the logger immediately.
    #[inline]
    pub fn status_log(&self) -> StatusLog<'_> {
        StatusLog::new(self)
    }

    /// Callback-style access to the log view.
    #[inline]
    pub fn with_status_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&StatusLog<'_>) -> R,
    {
        let log = self.status_log();
        f(&log)
    }
}

impl Zeroize for BServerError {
    fn zeroize(&mut self) {
        match self {
            Self::ServerError { message }
            | Self::BadRequest { message }
            | Self::Unauthorized { message }
            | Self::OverQuota { message }
            | Self::BlockNonExistent { message }
            | Self::Throttle { message } => message.zeroize(),
            Self::Unknown(inner) => inner.zeroize(),
        }
    }
}

impl Drop for BServerError {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Display for BServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(inner) => fmt::Display::fmt(inner, f),
            known => f.write_str(known.message()),
        }
    }
}

impl std::error::Error for BServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unknown(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<AppStatusError> for BServerError {
    fn from(inner: AppStatusError) -> Self {
        Self::Unknown(inner)
    }
}

impl From<BServerError> for io::Error {
    /// Unauthorized maps to `PermissionDenied`, a missing block to `NotFound`,
    /// everything else to `Other`. The typed error is kept as the inner error.
    fn from(err: BServerError) -> Self {
        let kind = match err {
            BServerError::Unauthorized { .. } => io::ErrorKind::PermissionDenied,
            BServerError::BlockNonExistent { .. } => io::ErrorKind::NotFound,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
