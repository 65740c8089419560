//! Exporter: typed error → wire envelope.
//!
//! `description` is always the raw message the error carries, never the
//! default text that `message()` substitutes for an empty one. Default
//! expansion is a presentation concern; the envelope stays faithful to what
//! was sent so a re-export of an unwrapped error is byte-for-byte stable.

use crate::status::{ExportableError, Status, StatusField};
use crate::{AppStatusError, BServerError};

impl ExportableError for BServerError {
    fn to_status(&self) -> Status {
        match self {
            Self::Unknown(inner) => inner.to_status(),
            known => Status::new(known.code(), known.name(), known.raw_message()),
        }
    }
}

impl ExportableError for AppStatusError {
    /// Fields are written in sorted key order.
    fn to_status(&self) -> Status {
        let fields = self
            .fields
            .iter()
            .map(|(key, value)| StatusField::new(key.as_str(), value.as_str()))
            .collect();
        Status {
            code: self.code,
            name: self.name.clone(),
            desc: self.desc.clone(),
            fields,
        }
    }
}
