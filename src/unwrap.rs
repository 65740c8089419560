//! Unwrapper: wire envelope → typed error.
//!
//! The RPC dispatch layer decodes responses in two phases. It first asks the
//! registered [`ErrorUnwrapper`] for an empty decode target
//! ([`ErrorUnwrapper::make_arg`]), decodes the error payload into it, then
//! hands the decoded value back ([`ErrorUnwrapper::unwrap_error`]).
//!
//! # Two Error Universes
//!
//! The result of `unwrap_error` keeps the two outcomes apart:
//!
//! | Outcome                      | Meaning                                        |
//! |------------------------------|------------------------------------------------|
//! | `Err(DispatchError)`         | the decoded value was not a [`Status`]; a protocol defect |
//! | `Ok(None)`                   | absent envelope or code `0`; success at this layer |
//! | `Ok(Some(BServerError))`     | an application error, always classified        |
//!
//! Unrecognized non-zero codes never fail: they degrade into
//! [`BServerError::Unknown`], so a newer server emitting codes this client has
//! never seen cannot break it.
//!
//! # Example
//!
//! ```rust
//! use bserver_errors::{BServerErrorUnwrapper, ErrorUnwrapper, ErrorKind, Status};
//!
//! let unwrapper = BServerErrorUnwrapper;
//! let mut target = unwrapper.make_arg();
//!
//! // The transport decodes the wire bytes into the target.
//! if let Some(status) = target.downcast_mut::<Status>() {
//!     *status = Status::new(2704, "BLOCK_NONEXISTENT", "");
//! }
//!
//! let err = unwrapper.unwrap_error(&*target).unwrap().unwrap();
//! assert_eq!(err.kind(), Some(ErrorKind::BlockNonExistent));
//! assert_eq!(err.message(), "BServer: non-existent block");
//! ```

use crate::codes::ErrorKind;
use crate::status::Status;
use crate::{AppStatusError, BServerError};
use std::any::Any;
use std::fmt;

// ============================================================================
// Dispatch Seam
// ============================================================================

/// Hook the RPC dispatch layer invokes when a response carries an
/// application-level error.
///
/// Implementations hold no state: `make_arg` is a pure factory and
/// `unwrap_error` a pure classification, both callable concurrently.
pub trait ErrorUnwrapper: Send + Sync {
    /// Error type handed to the caller.
    type AppError;

    /// Fresh, empty decode target for the transport.
    fn make_arg(&self) -> Box<dyn Any + Send>;

    /// Classify the value the transport decoded into the target.
    ///
    /// Pass the target itself (`&*boxed`), not a reference to the box; a
    /// boxed target is tolerated and unwrapped once.
    fn unwrap_error(&self, arg: &dyn Any) -> Result<Option<Self::AppError>, DispatchError>;
}

/// Protocol-level failure distinct from any application error.
///
/// This is a compatibility or programming defect between the transport and
/// the unwrapper, not a business condition. Log it as unexpected.
#[must_use = "dispatch errors indicate a protocol defect and should be logged"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The decoded argument is not shaped like the expected envelope.
    ArgTypeMismatch {
        /// Unwrapper that rejected the argument.
        unwrapper: &'static str,
        /// Type the unwrapper expected.
        expected: &'static str,
    },
}

impl DispatchError {
    /// Write a structured log line for the protocol defect.
    ///
    /// Format: `[DISPATCH] unexpected=<what> unwrapper=<name> expected=<type>`
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        match self {
            Self::ArgTypeMismatch {
                unwrapper,
                expected,
            } => write!(
                f,
                "[DISPATCH] unexpected=arg_type_mismatch unwrapper={} expected={}",
                unwrapper, expected
            ),
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgTypeMismatch {
                unwrapper,
                expected,
            } => write!(
                f,
                "error converting arg to {} object in {}::unwrap_error",
                expected, unwrapper
            ),
        }
    }
}

impl std::error::Error for DispatchError {}

// ============================================================================
// Block Server Unwrapper
// ============================================================================

/// Unwrapper registered for the block server's RPC interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BServerErrorUnwrapper;

impl BServerErrorUnwrapper {
    const NAME: &'static str = "BServerErrorUnwrapper";
    const EXPECTED: &'static str = "Status";

    fn mismatch() -> DispatchError {
        DispatchError::ArgTypeMismatch {
            unwrapper: Self::NAME,
            expected: Self::EXPECTED,
        }
    }
}

impl ErrorUnwrapper for BServerErrorUnwrapper {
    type AppError = BServerError;

    #[inline]
    fn make_arg(&self) -> Box<dyn Any + Send> {
        Box::new(Status::default())
    }

    fn unwrap_error(&self, arg: &dyn Any) -> Result<Option<BServerError>, DispatchError> {
        if let Some(status) = arg.downcast_ref::<Status>() {
            return Ok(classify(Some(status)));
        }
        if let Some(status) = arg.downcast_ref::<Option<Status>>() {
            return Ok(classify(status.as_ref()));
        }
        if let Some(status) = arg.downcast_ref::<Box<Status>>() {
            return Ok(classify(Some(status)));
        }
        if let Some(inner) = arg.downcast_ref::<Box<dyn Any + Send>>() {
            let inner: &dyn Any = &**inner;
            if let Some(status) = inner.downcast_ref::<Status>() {
                return Ok(classify(Some(status)));
            }
            if let Some(status) = inner.downcast_ref::<Option<Status>>() {
                return Ok(classify(status.as_ref()));
            }
        }
        Err(Self::mismatch())
    }
}

/// Classify a decoded envelope.
///
/// `None` and code `0` mean no application error. Known codes become their
/// variant with the description as message; every other code becomes
/// [`BServerError::Unknown`] carrying code, name, description and the
/// flattened fields (later duplicate key wins).
pub fn classify(status: Option<&Status>) -> Option<BServerError> {
    let status = status?;
    if status.is_ok() {
        return None;
    }

    let message = status.desc.as_str();
    let err = match ErrorKind::from_code(status.code) {
        Some(ErrorKind::ServerError) => BServerError::server_error(message),
        Some(ErrorKind::BadRequest) => BServerError::bad_request(message),
        Some(ErrorKind::Unauthorized) => BServerError::unauthorized(message),
        Some(ErrorKind::OverQuota) => BServerError::over_quota(message),
        Some(ErrorKind::BlockNonExistent) => BServerError::block_non_existent(message),
        Some(ErrorKind::Throttle) => BServerError::throttle(message),
        None => BServerError::Unknown(AppStatusError::from_status(status)),
    };
    Some(err)
}

/// Turn an envelope into a `Result`: `Ok(())` for code `0`, otherwise the
/// classified error.
///
/// ```rust
/// use bserver_errors::{check, Status};
///
/// assert!(check(&Status::ok()).is_ok());
/// let err = check(&Status::new(2707, "THROTTLE", "slow down")).unwrap_err();
/// assert!(err.is_retryable());
/// ```
pub fn check(status: &Status) -> crate::Result<()> {
    match classify(Some(status)) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ExportableError;
    use crate::{RecoveryHint, definitions};

    fn unwrap(arg: &dyn Any) -> Result<Option<BServerError>, DispatchError> {
        BServerErrorUnwrapper.unwrap_error(arg)
    }

    #[test]
    fn block_non_existent_with_description() {
        let status = Status::new(2704, "BLOCK_NONEXISTENT", "missing block xyz");
        let err = unwrap(&status).unwrap().unwrap();
        assert!(matches!(err, BServerError::BlockNonExistent { .. }));
        assert_eq!(err.message(), "missing block xyz");
    }

    #[test]
    fn block_non_existent_default_message() {
        let status = Status::new(2704, "", "");
        let err = unwrap(&status).unwrap().unwrap();
        assert!(matches!(err, BServerError::BlockNonExistent { .. }));
        assert_eq!(err.message(), "BServer: non-existent block");
    }

    #[test]
    fn unknown_code_falls_back_with_flattened_fields() {
        let status = Status::new(9999, "FUTURE", "new thing")
            .with_field("a", "1")
            .with_field("a", "2");
        let err = unwrap(&status).unwrap().unwrap();
        let app = err.as_app_status().unwrap();
        assert_eq!(app.code(), 9999);
        assert_eq!(app.name(), "FUTURE");
        assert_eq!(app.desc(), "new thing");
        assert_eq!(app.fields().len(), 1);
        assert_eq!(app.fields()["a"], "2");
    }

    #[test]
    fn zero_code_is_no_error() {
        assert_eq!(unwrap(&Status::ok()), Ok(None));
        // Name and description do not matter once the code is zero.
        assert_eq!(unwrap(&Status::new(0, "SERVER_ERROR", "ignored")), Ok(None));
    }

    #[test]
    fn absent_envelope_is_no_error() {
        assert_eq!(unwrap(&None::<Status>), Ok(None));
        assert_eq!(classify(None), None);
    }

    #[test]
    fn unrelated_shape_is_dispatch_error() {
        let err = unwrap(&"not a status").unwrap_err();
        assert_eq!(
            err,
            DispatchError::ArgTypeMismatch {
                unwrapper: "BServerErrorUnwrapper",
                expected: "Status",
            }
        );
        assert!(unwrap(&42_i32).is_err());
        assert!(unwrap(&vec![Status::ok()]).is_err());
    }

    #[test]
    fn unauthorized_exposes_permission_denied() {
        let status = Status::new(2702, "SESSION_UNAUTHORIZED", "");
        let err = unwrap(&status).unwrap().unwrap();
        assert!(matches!(err, BServerError::Unauthorized { .. }));
        assert!(err.is_permission_denied());
        assert_eq!(
            err.permission_denied().map(|e| e.kind()),
            Some(std::io::ErrorKind::PermissionDenied)
        );
        assert_eq!(err.message(), "BServer: session not validated");
        assert_eq!(err.recovery(), RecoveryHint::RefreshCredentials);
    }

    #[test]
    fn reserved_codes_route_to_unknown() {
        for code in [2705, 2706] {
            let status = Status::new(code, "RESERVED", "");
            let err = unwrap(&status).unwrap().unwrap();
            assert_eq!(err.kind(), None);
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn known_code_ignores_envelope_name_and_fields() {
        let status = Status::new(2707, "SOMETHING_ELSE", "slow down").with_field("k", "v");
        let err = unwrap(&status).unwrap().unwrap();
        assert!(matches!(err, BServerError::Throttle { .. }));
        assert_eq!(err.name(), "THROTTLE");
        assert_eq!(err.message(), "slow down");
    }

    #[test]
    fn negative_code_routes_to_unknown() {
        let status = Status::new(-1, "NEGATIVE", "odd");
        let err = unwrap(&status).unwrap().unwrap();
        assert_eq!(err.code(), -1);
        assert!(err.as_app_status().is_some());
    }

    #[test]
    fn make_arg_returns_fresh_empty_status() {
        let unwrapper = BServerErrorUnwrapper;
        let mut first = unwrapper.make_arg();
        if let Some(status) = first.downcast_mut::<Status>() {
            *status = Status::new(2701, "BAD_REQUEST", "dirty");
        }
        let second = unwrapper.make_arg();
        let status = second.downcast_ref::<Status>().unwrap();
        assert_eq!(*status, Status::default());
    }

    #[test]
    fn boxed_targets_are_accepted() {
        let unwrapper = BServerErrorUnwrapper;
        let mut target = unwrapper.make_arg();
        if let Some(status) = target.downcast_mut::<Status>() {
            *status = Status::new(2703, "QUOTA_EXCEEDED", "");
        }
        // Reference to the box rather than its contents.
        let err = unwrapper.unwrap_error(&target).unwrap().unwrap();
        assert_eq!(err.message(), "BServer: user has exceeded quota");

        let boxed = Box::new(Status::new(2701, "BAD_REQUEST", ""));
        let err = unwrapper.unwrap_error(&boxed).unwrap().unwrap();
        assert_eq!(err.message(), "BServer: bad client request");
    }

    #[test]
    fn json_transport_decode_then_unwrap() {
        let unwrapper = BServerErrorUnwrapper;
        let mut target = unwrapper.make_arg();
        let wire = r#"{"code":2703,"name":"QUOTA_EXCEEDED","desc":"","fields":[]}"#;
        if let Some(status) = target.downcast_mut::<Status>() {
            *status = serde_json::from_str(wire).unwrap();
        }
        let err = unwrapper.unwrap_error(&*target).unwrap().unwrap();
        assert!(matches!(err, BServerError::OverQuota { .. }));
        assert_eq!(err.message(), "BServer: user has exceeded quota");
    }

    #[test]
    fn export_then_unwrap_preserves_kind_and_message() {
        for kind in ErrorKind::ALL {
            let original = BServerError::new(kind, "detail");
            let back = classify(Some(&original.to_status())).unwrap();
            assert_eq!(back, original);
        }
    }

    #[test]
    fn dispatch_error_display_and_log_line() {
        let err = BServerErrorUnwrapper.unwrap_error(&()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error converting arg to Status object in BServerErrorUnwrapper::unwrap_error"
        );
        let mut line = String::new();
        err.write_to(&mut line).unwrap();
        assert!(line.starts_with("[DISPATCH] unexpected=arg_type_mismatch"));
        assert!(line.contains("unwrapper=BServerErrorUnwrapper"));
    }

    #[test]
    fn throttle_code_constant_classifies() {
        let status = Status::new(definitions::STATUS_CODE_BSERVER_ERROR_THROTTLE, "THROTTLE", "");
        let err = classify(Some(&status)).unwrap();
        assert_eq!(err.recovery(), RecoveryHint::Backoff);
        assert!(err.is_retryable());
        assert_eq!(err.message(), "");
    }

    #[test]
    fn check_maps_envelope_to_result() {
        assert_eq!(check(&Status::ok()), Ok(()));
        let err = check(&Status::new(2703, "QUOTA_EXCEEDED", "")).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::OverQuota));
        assert_eq!(err.message(), "BServer: user has exceeded quota");
    }
}
