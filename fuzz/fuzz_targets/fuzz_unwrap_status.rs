#![no_main]

use bserver_errors::{BServerErrorUnwrapper, ErrorUnwrapper, ExportableError, Status};
use libfuzzer_sys::fuzz_target;

// Layout: 4 bytes code (LE), then NUL-separated name, desc and alternating
// field keys/values, all lossily decoded.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let code = i32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let mut parts = data[4..]
        .split(|b| *b == 0)
        .map(|p| String::from_utf8_lossy(p).into_owned());

    let name = parts.next().unwrap_or_default();
    let desc = parts.next().unwrap_or_default();
    let mut status = Status::new(code, name, desc);
    while let (Some(key), Some(value)) = (parts.next(), parts.next()) {
        status = status.with_field(key, value);
    }

    let unwrapper = BServerErrorUnwrapper;
    match unwrapper.unwrap_error(&status) {
        Ok(None) => assert_eq!(code, 0),
        Ok(Some(err)) => {
            assert_ne!(code, 0);
            assert_eq!(err.code(), code);
            let _ = err.to_string();
            let mut line = String::new();
            let _ = err.status_log().write_to(&mut line);
            let again = unwrapper.unwrap_error(&err.to_status());
            assert_eq!(again, Ok(Some(err)));
        }
        Err(e) => panic!("envelope rejected as dispatch error: {}", e),
    }
});
