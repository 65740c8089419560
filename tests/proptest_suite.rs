//! Property-based tests for bserver_errors
//!
//! These tests use proptest to generate random envelopes and errors and
//! verify the classification laws hold.

use bserver_errors::{
    AppStatusError, BServerError, BServerErrorUnwrapper, ErrorKind, ErrorUnwrapper,
    ExportableError, Status, classify, definitions,
};
use proptest::prelude::*;
use std::collections::HashMap;

fn any_kind() -> impl Strategy<Value = ErrorKind> {
    prop::sample::select(ErrorKind::ALL.to_vec())
}

fn unknown_code() -> impl Strategy<Value = i32> {
    any::<i32>().prop_filter("must be non-zero and unassigned", |code| {
        *code != definitions::STATUS_CODE_OK && ErrorKind::from_code(*code).is_none()
    })
}

/// Small key alphabet so duplicates are common.
fn field_list() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-d]", "\\PC{0,20}"), 0..12)
}

fn envelope(code: i32, name: &str, desc: &str, fields: &[(String, String)]) -> Status {
    fields
        .iter()
        .fold(Status::new(code, name, desc), |status, (k, v)| {
            status.with_field(k.as_str(), v.as_str())
        })
}

// ============================================================================
// ROUND-TRIP PROPERTIES
// ============================================================================

proptest! {
    /// Export then unwrap reconstructs the same kind and message
    #[test]
    fn round_trip_preserves_kind_and_message(kind in any_kind(), message in "\\PC{1,200}") {
        let original = BServerError::new(kind, message.clone());
        let back = classify(Some(&original.to_status())).unwrap();

        prop_assert_eq!(back.kind(), Some(kind));
        prop_assert_eq!(back.message(), message.as_str());
        prop_assert_eq!(back, original);
    }

    /// Empty message exports empty and unwraps to the kind's default text
    #[test]
    fn default_message_law(kind in any_kind()) {
        let status = BServerError::new(kind, "").to_status();
        prop_assert_eq!(status.desc.as_str(), "");

        let back = classify(Some(&status)).unwrap();
        let expected = kind.default_message().unwrap_or("");
        prop_assert_eq!(back.message(), expected);
    }

    /// Re-exporting an unwrapped envelope of a known code is stable
    #[test]
    fn known_code_export_is_stable(kind in any_kind(), desc in "\\PC{0,100}") {
        let status = Status::new(kind.code(), kind.name(), desc);
        let err = classify(Some(&status)).unwrap();
        prop_assert_eq!(err.to_status(), status);
    }
}

// ============================================================================
// ZERO-CODE AND TYPE-MISMATCH PROPERTIES
// ============================================================================

proptest! {
    /// Code zero is never an error, whatever else the envelope carries
    #[test]
    fn zero_code_law(name in "\\PC{0,30}", desc in "\\PC{0,100}", fields in field_list()) {
        let status = envelope(definitions::STATUS_CODE_OK, &name, &desc, &fields);
        prop_assert_eq!(BServerErrorUnwrapper.unwrap_error(&status), Ok(None));
        prop_assert_eq!(BServerErrorUnwrapper.unwrap_error(&Some(status)), Ok(None));
    }

    /// Values not shaped like an envelope are dispatch errors
    #[test]
    fn type_mismatch_law(n in any::<i32>(), s in "\\PC{0,50}", bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        prop_assert!(BServerErrorUnwrapper.unwrap_error(&n).is_err());
        prop_assert!(BServerErrorUnwrapper.unwrap_error(&s).is_err());
        prop_assert!(BServerErrorUnwrapper.unwrap_error(&bytes).is_err());
    }
}

// ============================================================================
// FALLBACK PROPERTIES
// ============================================================================

proptest! {
    /// Unknown codes preserve code, name, description and flattened fields
    #[test]
    fn fallback_fidelity(
        code in unknown_code(),
        name in "\\PC{0,30}",
        desc in "\\PC{0,100}",
        fields in field_list(),
    ) {
        let status = envelope(code, &name, &desc, &fields);
        let err = BServerErrorUnwrapper.unwrap_error(&status).unwrap().unwrap();
        let app = err.as_app_status().unwrap();

        prop_assert_eq!(app.code(), code);
        prop_assert_eq!(app.name(), name.as_str());
        prop_assert_eq!(app.desc(), desc.as_str());

        let mut expected: HashMap<&str, &str> = HashMap::new();
        for (k, v) in &fields {
            expected.insert(k.as_str(), v.as_str());
        }
        prop_assert_eq!(app.fields().len(), expected.len());
        for (k, v) in app.fields() {
            prop_assert_eq!(expected.get(k.as_str()).copied(), Some(v.as_str()));
        }
    }

    /// Exporting an unwrapped fallback and unwrapping again is a fixed point
    #[test]
    fn fallback_reexport_is_fixed_point(code in unknown_code(), desc in "\\PC{0,50}", fields in field_list()) {
        let status = envelope(code, "FUTURE", &desc, &fields);
        let first = classify(Some(&status)).unwrap();
        let second = classify(Some(&first.to_status())).unwrap();
        prop_assert_eq!(first, second);
    }

    /// The fallback cannot be built for code zero or an assigned code
    #[test]
    fn fallback_rejects_non_fallback_codes(kind in any_kind(), name in "\\PC{0,30}") {
        prop_assert!(AppStatusError::new(definitions::STATUS_CODE_OK, name.clone(), "x").is_none());
        prop_assert!(AppStatusError::new(kind.code(), name, "x").is_none());
    }

    /// The fallback never renders as an empty string
    #[test]
    fn fallback_display_never_empty(code in unknown_code(), name in "[A-Z_]{1,20}") {
        let err = BServerError::from(AppStatusError::new(code, name, "").unwrap());
        prop_assert!(!err.to_string().is_empty());
    }
}

// ============================================================================
// LOGGING PROPERTIES
// ============================================================================

proptest! {
    /// Log lines are valid UTF-8 and bounded for any envelope
    #[test]
    fn log_line_is_bounded(code in any::<i32>(), desc in "\\PC{0,5000}") {
        prop_assume!(code != 0);
        let err = classify(Some(&Status::new(code, "NAME", desc))).unwrap();

        let mut line = String::new();
        err.status_log().write_to(&mut line).unwrap();

        prop_assert!(std::str::from_utf8(line.as_bytes()).is_ok());
        prop_assert!(line.len() < 1024 + 128);
    }
}

// ============================================================================
// CONCURRENT PROPERTIES
// ============================================================================

proptest! {
    /// Classification from many threads agrees with the single-threaded result
    #[test]
    fn concurrent_classification(
        thread_count in 1usize..8,
        codes in prop::collection::vec(2698i32..2710, 1..50),
    ) {
        let expected: Vec<Option<BServerError>> = codes
            .iter()
            .map(|code| classify(Some(&Status::new(*code, "N", "d"))))
            .collect();

        let handles: Vec<_> = (0..thread_count)
            .map(|_| {
                let codes = codes.clone();
                std::thread::spawn(move || {
                    let unwrapper = BServerErrorUnwrapper;
                    codes
                        .iter()
                        .map(|code| {
                            unwrapper
                                .unwrap_error(&Status::new(*code, "N", "d"))
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            let got = handle.join().unwrap();
            prop_assert_eq!(&got, &expected);
        }
    }
}
