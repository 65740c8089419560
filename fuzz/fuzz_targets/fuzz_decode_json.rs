#![no_main]

use bserver_errors::{BServerErrorUnwrapper, ErrorUnwrapper, Status};
use libfuzzer_sys::fuzz_target;

// Transport path: decode arbitrary bytes into the decode target, then unwrap.
fuzz_target!(|data: &[u8]| {
    let unwrapper = BServerErrorUnwrapper;
    let mut target = unwrapper.make_arg();
    let Some(slot) = target.downcast_mut::<Status>() else {
        panic!("make_arg must produce a Status");
    };
    match serde_json::from_slice::<Status>(data) {
        Ok(decoded) => *slot = decoded,
        Err(_) => return,
    }
    let result = unwrapper.unwrap_error(&*target);
    assert!(result.is_ok());
});
