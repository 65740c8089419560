//! Structured log view of a classified error.
//!
//! The crate itself never prints or emits log records. Callers that want to
//! log a [`BServerError`] take a [`StatusLog`], which:
//!
//! - Borrows from the error with an explicit lifetime
//! - CANNOT outlive the error it was created from
//! - Exposes structured accessors for JSON/structured loggers
//! - Writes a bounded single-line form without intermediate allocation
//!   (`write_to`), truncating each field on a UTF-8 boundary
//!
//! Keeping the view short-lived means error text is not retained in log
//! buffers past the error's own drop, where it is zeroized.

use crate::{BServerError, ErrorKind, RecoveryHint};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Maximum length for any individual field in formatted output (DoS prevention)
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Structured log entry borrowing from a [`BServerError`].
///
/// # Example
///
/// ```rust
/// # use bserver_errors::BServerError;
/// let err = BServerError::over_quota("");
/// let log = err.status_log();
/// assert_eq!(log.code(), 2703);
/// assert_eq!(log.message(), "BServer: user has exceeded quota");
/// // log is destroyed when it goes out of scope
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StatusLog<'a> {
    code: i32,
    name: &'a str,
    kind: Option<ErrorKind>,
    message: &'a str,
    raw_message: &'a str,
    recovery: RecoveryHint,
    fields: Option<&'a BTreeMap<String, String>>,
}

impl<'a> StatusLog<'a> {
    pub(crate) fn new(err: &'a BServerError) -> Self {
        Self {
            code: err.code(),
            name: err.name(),
            kind: err.kind(),
            message: err.message(),
            raw_message: err.raw_message(),
            recovery: err.recovery(),
            fields: err.as_app_status().map(|app| app.fields()),
        }
    }

    /// Write structured log data to a formatter without allocating.
    ///
    /// Format: `[<code> <NAME>] message='<message>' recovery=<hint>` followed
    /// by ` key='value'` per fallback field, each field truncated.
    ///
    /// ```rust
    /// # use bserver_errors::BServerError;
    /// let err = BServerError::throttle("slow down");
    /// let mut line = String::new();
    /// err.status_log().write_to(&mut line).unwrap();
    /// assert_eq!(line, "[2707 THROTTLE] message='slow down' recovery=backoff");
    /// ```
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{} {}] message='{}' recovery={}",
            self.code,
            truncate_with_indicator(self.name),
            truncate_with_indicator(self.message),
            self.recovery
        )?;

        for (key, value) in self.fields() {
            write!(
                f,
                " {}='{}'",
                truncate_with_indicator(key),
                truncate_with_indicator(value)
            )?;
        }

        Ok(())
    }

    /// Format for human-readable logs in trusted debug contexts.
    ///
    /// Includes the raw message and kind alongside the presented message.
    /// Only available with BOTH the `trusted_debug` feature AND debug
    /// assertions enabled.
    #[cfg(all(feature = "trusted_debug", debug_assertions))]
    pub fn format_for_trusted_debug(&self) -> String {
        let kind = match self.kind {
            Some(kind) => kind.name(),
            None => "UNKNOWN",
        };
        let mut output = format!(
            "[{} {}] kind={} message='{}' raw='{}' recovery={}",
            self.code,
            truncate_with_indicator(self.name),
            kind,
            truncate_with_indicator(self.message),
            truncate_with_indicator(self.raw_message),
            self.recovery
        );

        for (key, value) in self.fields() {
            output.push_str(&format!(
                " {}='{}'",
                truncate_with_indicator(key),
                truncate_with_indicator(value)
            ));
        }

        output
    }

    /// Wire code.
    #[inline]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Symbolic wire name.
    #[inline]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Known kind, `None` for the unknown fallback.
    #[inline]
    pub const fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    /// Message with default substitution applied.
    #[inline]
    pub const fn message(&self) -> &'a str {
        self.message
    }

    /// Message as carried, without default substitution.
    #[inline]
    pub const fn raw_message(&self) -> &'a str {
        self.raw_message
    }

    /// Recovery hint for the error.
    #[inline]
    pub const fn recovery(&self) -> RecoveryHint {
        self.recovery
    }

    /// Fallback fields in key order; empty for known kinds.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.fields
            .into_iter()
            .flat_map(|map| map.iter())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Truncate a string for display to prevent DoS via extremely long messages.
///
/// Returns a Cow<str> to avoid allocation when no truncation is needed.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    // Last char boundary at or before the limit
    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}
