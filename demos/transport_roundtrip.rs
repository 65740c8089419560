use bserver_errors::{BServerError, BServerErrorUnwrapper, ErrorUnwrapper, ExportableError, Status};

fn main() {
    println!("--- Transport Round Trip ---\n");

    // Server side: export a typed error onto the wire
    let server_err = BServerError::throttle("too many puts from this device");
    let wire = match serde_json::to_string(&server_err.to_status()) {
        Ok(wire) => wire,
        Err(e) => {
            eprintln!("encode failed: {}", e);
            return;
        }
    };
    println!("1. [WIRE] {}", wire);

    // Client side: two-phase decode through the registered unwrapper
    let unwrapper = BServerErrorUnwrapper;
    let mut target = unwrapper.make_arg();
    if let Some(slot) = target.downcast_mut::<Status>() {
        match serde_json::from_str(&wire) {
            Ok(decoded) => *slot = decoded,
            Err(e) => {
                eprintln!("decode failed: {}", e);
                return;
            }
        }
    }

    match unwrapper.unwrap_error(&*target) {
        Ok(Some(err)) => {
            println!("2. [CLIENT] kind={:?} retryable={}", err.kind(), err.is_retryable());
            println!("   message: \"{}\"", err.message());
        }
        Ok(None) => println!("2. [CLIENT] no application error"),
        Err(dispatch) => eprintln!("unexpected: {}", dispatch),
    }

    // A code this client has never seen degrades into the fallback
    let future = Status::new(2799, "QUOTA_SOFT_LIMIT", "approaching quota")
        .with_field("used", "95")
        .with_field("used", "96");
    if let Ok(Some(err)) = unwrapper.unwrap_error(&future) {
        println!("\n3. [FALLBACK] {} -> \"{}\"", err.name(), err);
    }
}
