//! Fixed status codes emitted by the block server.
//!
//! # Taxonomy & Governance
//!
//! The block server owns the 27xx block of the shared status-code space.
//! Codes are stable across protocol versions and are never reassigned:
//! a client built against this table must keep decoding envelopes produced
//! by any later server.
//!
//! | Code | Name                   | Kind                              |
//! |------|------------------------|-----------------------------------|
//! | 2700 | `SERVER_ERROR`         | [`ErrorKind::ServerError`]        |
//! | 2701 | `BAD_REQUEST`          | [`ErrorKind::BadRequest`]         |
//! | 2702 | `SESSION_UNAUTHORIZED` | [`ErrorKind::Unauthorized`]       |
//! | 2703 | `QUOTA_EXCEEDED`       | [`ErrorKind::OverQuota`]          |
//! | 2704 | `BLOCK_NONEXISTENT`    | [`ErrorKind::BlockNonExistent`]   |
//! | 2705 | (reserved)             | routed to the unknown fallback    |
//! | 2706 | (reserved)             | routed to the unknown fallback    |
//! | 2707 | `THROTTLE`             | [`ErrorKind::Throttle`]           |
//!
//! Reserved codes have no assigned meaning. They are classified exactly like
//! any other unrecognized code so that a future server assigning them does
//! not break older clients.
//!
//! [`ErrorKind::ServerError`]: crate::ErrorKind::ServerError
//! [`ErrorKind::BadRequest`]: crate::ErrorKind::BadRequest
//! [`ErrorKind::Unauthorized`]: crate::ErrorKind::Unauthorized
//! [`ErrorKind::OverQuota`]: crate::ErrorKind::OverQuota
//! [`ErrorKind::BlockNonExistent`]: crate::ErrorKind::BlockNonExistent
//! [`ErrorKind::Throttle`]: crate::ErrorKind::Throttle

/// Code range constants for the block-server slice of the status space.
/// Checked for consistency in the `tests` module.
pub mod ranges {
    /// First code owned by the block server.
    pub const BSERVER_START: i32 = 2700;
    /// Last code owned by the block server.
    pub const BSERVER_END: i32 = 2799;
    /// First code of the reserved gap.
    pub const RESERVED_START: i32 = 2705;
    /// Last code of the reserved gap.
    pub const RESERVED_END: i32 = 2706;
}

/// Reserved wire code meaning "no application-level error occurred".
pub const STATUS_CODE_OK: i32 = 0;

// -----------------------------------------------------------------------------
// BSERVER (2700-2799) - Block Server
// -----------------------------------------------------------------------------

/// Generic block server error.
pub const STATUS_CODE_BSERVER_ERROR: i32 = 2700;

/// Generic client error: the request was malformed.
pub const STATUS_CODE_BSERVER_ERROR_BAD_REQUEST: i32 = 2701;

/// The session has not been validated.
pub const STATUS_CODE_BSERVER_ERROR_UNAUTHORIZED: i32 = 2702;

/// The user has exceeded their quota.
pub const STATUS_CODE_BSERVER_ERROR_OVER_QUOTA: i32 = 2703;

/// The block server cannot find the referenced block.
pub const STATUS_CODE_BSERVER_ERROR_BLOCK_NON_EXISTENT: i32 = 2704;

/// The client should initiate backoff.
pub const STATUS_CODE_BSERVER_ERROR_THROTTLE: i32 = 2707;

/// Every assigned block-server code, in ascending order.
pub const ASSIGNED_CODES: [i32; 6] = [
    STATUS_CODE_BSERVER_ERROR,
    STATUS_CODE_BSERVER_ERROR_BAD_REQUEST,
    STATUS_CODE_BSERVER_ERROR_UNAUTHORIZED,
    STATUS_CODE_BSERVER_ERROR_OVER_QUOTA,
    STATUS_CODE_BSERVER_ERROR_BLOCK_NON_EXISTENT,
    STATUS_CODE_BSERVER_ERROR_THROTTLE,
];

/// Whether `code` denotes an application error outside the assigned table.
///
/// False for [`STATUS_CODE_OK`] and for every entry of [`ASSIGNED_CODES`].
/// Only such codes may be carried by the unknown fallback.
pub const fn is_unassigned(code: i32) -> bool {
    if code == STATUS_CODE_OK {
        return false;
    }
    let mut i = 0;
    while i < ASSIGNED_CODES.len() {
        if ASSIGNED_CODES[i] == code {
            return false;
        }
        i += 1;
    }
    true
}
