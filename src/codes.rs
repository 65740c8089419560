//! Error kind table - the closed set of conditions the block server reports.
//!
//! Each [`ErrorKind`] maps to exactly one wire code and one symbolic name,
//! and each assigned wire code maps back to exactly one kind. The mapping is
//! total and injective over the known set; every other non-zero code is
//! handled by the unknown fallback in [`crate::AppStatusError`].
//!
//! # Zero-Allocation Guarantee
//!
//! All lookups here are `const fn` over static data. Nothing in this module
//! allocates or touches shared mutable state, so it is safe to call from any
//! number of response-handling threads.
//!
//! # Example
//!
//! ```rust
//! use bserver_errors::{ErrorKind, RecoveryHint, definitions};
//!
//! let kind = ErrorKind::from_code(definitions::STATUS_CODE_BSERVER_ERROR_THROTTLE).unwrap();
//! assert_eq!(kind, ErrorKind::Throttle);
//! assert_eq!(kind.name(), "THROTTLE");
//! assert_eq!(kind.recovery(), RecoveryHint::Backoff);
//! ```

use crate::definitions::{
    STATUS_CODE_BSERVER_ERROR, STATUS_CODE_BSERVER_ERROR_BAD_REQUEST,
    STATUS_CODE_BSERVER_ERROR_BLOCK_NON_EXISTENT, STATUS_CODE_BSERVER_ERROR_OVER_QUOTA,
    STATUS_CODE_BSERVER_ERROR_THROTTLE, STATUS_CODE_BSERVER_ERROR_UNAUTHORIZED,
};
use std::fmt;

// ============================================================================
// Error Kind
// ============================================================================

/// Known block-server error kinds.
///
/// Small fieldless enum, `Copy` so callers can extract and branch on it
/// without holding a borrow of the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Generic or internal server-side failure.
    ServerError,
    /// Malformed client request.
    BadRequest,
    /// Session or credential not validated.
    Unauthorized,
    /// Storage quota exceeded.
    OverQuota,
    /// Referenced block is absent.
    BlockNonExistent,
    /// Server requests client-side backoff.
    Throttle,
}

impl ErrorKind {
    /// Every known kind, in wire-code order.
    pub const ALL: [ErrorKind; 6] = [
        Self::ServerError,
        Self::BadRequest,
        Self::Unauthorized,
        Self::OverQuota,
        Self::BlockNonExistent,
        Self::Throttle,
    ];

    /// Classify a wire code.
    ///
    /// Returns `None` for zero, for the reserved gap and for any code this
    /// client does not know. Callers route `None` to the unknown fallback.
    #[inline]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            STATUS_CODE_BSERVER_ERROR => Some(Self::ServerError),
            STATUS_CODE_BSERVER_ERROR_BAD_REQUEST => Some(Self::BadRequest),
            STATUS_CODE_BSERVER_ERROR_UNAUTHORIZED => Some(Self::Unauthorized),
            STATUS_CODE_BSERVER_ERROR_OVER_QUOTA => Some(Self::OverQuota),
            STATUS_CODE_BSERVER_ERROR_BLOCK_NON_EXISTENT => Some(Self::BlockNonExistent),
            STATUS_CODE_BSERVER_ERROR_THROTTLE => Some(Self::Throttle),
            _ => None,
        }
    }

    /// Stable wire code.
    #[inline]
    pub const fn code(self) -> i32 {
        match self {
            Self::ServerError => STATUS_CODE_BSERVER_ERROR,
            Self::BadRequest => STATUS_CODE_BSERVER_ERROR_BAD_REQUEST,
            Self::Unauthorized => STATUS_CODE_BSERVER_ERROR_UNAUTHORIZED,
            Self::OverQuota => STATUS_CODE_BSERVER_ERROR_OVER_QUOTA,
            Self::BlockNonExistent => STATUS_CODE_BSERVER_ERROR_BLOCK_NON_EXISTENT,
            Self::Throttle => STATUS_CODE_BSERVER_ERROR_THROTTLE,
        }
    }

    /// Symbolic name written into exported envelopes.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ServerError => "SERVER_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "SESSION_UNAUTHORIZED",
            Self::OverQuota => "QUOTA_EXCEEDED",
            Self::BlockNonExistent => "BLOCK_NONEXISTENT",
            Self::Throttle => "THROTTLE",
        }
    }

    /// Text shown by `message()` when the server sent an empty description.
    ///
    /// `ServerError` and `Throttle` have no default: their message stays
    /// empty, and callers may rely on detecting that.
    #[inline]
    pub const fn default_message(self) -> Option<&'static str> {
        match self {
            Self::ServerError | Self::Throttle => None,
            Self::BadRequest => Some("BServer: bad client request"),
            Self::Unauthorized => Some("BServer: session not validated"),
            Self::OverQuota => Some("BServer: user has exceeded quota"),
            Self::BlockNonExistent => Some("BServer: non-existent block"),
        }
    }

    /// Recovery hint for the caller's retry policy.
    #[inline]
    pub const fn recovery(self) -> RecoveryHint {
        match self {
            Self::Throttle => RecoveryHint::Backoff,
            Self::Unauthorized => RecoveryHint::RefreshCredentials,
            Self::BadRequest | Self::OverQuota => RecoveryHint::Permanent,
            Self::ServerError | Self::BlockNonExistent => RecoveryHint::Surface,
        }
    }

    /// Whether this kind denotes a permission failure at the OS level.
    #[inline]
    pub const fn is_permission_denied(self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Recovery Hint
// ============================================================================

/// What a caller should do with a classified error.
///
/// This is classification data only. No retry, backoff or credential refresh
/// happens in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryHint {
    /// Delay, then retry the same request.
    Backoff,
    /// Refresh the session, then retry.
    RefreshCredentials,
    /// Retrying the same request shape will fail again.
    Permanent,
    /// Surface to the caller as-is.
    Surface,
}

impl RecoveryHint {
    /// Short label for logs.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backoff => "backoff",
            Self::RefreshCredentials => "refresh_credentials",
            Self::Permanent => "permanent",
            Self::Surface => "surface",
        }
    }

    /// Whether a retry of the same request can succeed after the hinted action.
    #[inline]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Backoff | Self::RefreshCredentials)
    }
}

impl fmt::Display for RecoveryHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
