//! Wire-level status envelope.
//!
//! The block server reports failures as a generic [`Status`]: a numeric code,
//! a short symbolic name, free-form description text and an ordered list of
//! key/value fields. Code `0` means no application-level error occurred.
//!
//! The RPC transport decodes response bytes straight into a [`Status`] (it
//! derives `serde::Deserialize`); the unwrapper in [`crate::unwrap`] then
//! classifies it into a [`crate::BServerError`].
//!
//! # Memory Hygiene
//!
//! Descriptions and field values can carry block identifiers and user
//! details. All owned strings are zeroized on drop. Because of the `Drop`
//! impl, fields cannot be moved out of an envelope; borrow or clone them.

use crate::definitions::STATUS_CODE_OK;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Inline capacity for envelope fields. Most envelopes carry none.
const INLINE_FIELDS: usize = 4;

/// One key/value pair of extensible structured detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct StatusField {
    /// Field name. Not unique within an envelope.
    pub key: String,
    /// Field value.
    pub value: String,
}

impl StatusField {
    /// Build a field from any string-like key and value.
    #[inline]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Application status envelope as carried on the wire.
///
/// `fields` may contain duplicate keys; [`Status::fields_map`] flattens them
/// with the later occurrence winning.
// Per-field defaults: a container default would move out of a `Drop` type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// `0` for no error, otherwise a block-server code or an unrecognized one.
    #[serde(default)]
    pub code: i32,
    /// Symbolic tag, e.g. `BLOCK_NONEXISTENT`.
    #[serde(default)]
    pub name: String,
    /// Free-text detail, may be empty.
    #[serde(default)]
    pub desc: String,
    /// Structured detail in wire order; used by the unknown fallback.
    #[serde(default)]
    pub fields: SmallVec<[StatusField; INLINE_FIELDS]>,
}

impl Status {
    /// Build an envelope without fields.
    #[inline]
    pub fn new(code: i32, name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            desc: desc.into(),
            fields: SmallVec::new(),
        }
    }

    /// The "no error" envelope.
    #[inline]
    pub fn ok() -> Self {
        Self::default()
    }

    /// Append a field, keeping wire order.
    #[inline]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(StatusField::new(key, value));
        self
    }

    /// Whether this envelope reports no application-level error.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.code == STATUS_CODE_OK
    }

    /// Flatten `fields` into a lookup map. Later duplicate keys win.
    pub fn fields_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for field in &self.fields {
            map.insert(field.key.clone(), field.value.clone());
        }
        map
    }
}

impl Zeroize for Status {
    fn zeroize(&mut self) {
        self.code = STATUS_CODE_OK;
        self.name.zeroize();
        self.desc.zeroize();
        for field in self.fields.iter_mut() {
            field.zeroize();
        }
        self.fields.clear();
    }
}

impl Drop for Status {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Errors that can be re-serialized into a wire envelope.
pub trait ExportableError {
    /// Build the envelope for this error. Total and deterministic.
    fn to_status(&self) -> Status;
}
