use bserver_errors::{BServerError, ErrorUnwrapper, BServerErrorUnwrapper, RecoveryHint, Status};

fn fetch_block(id: &str) -> Status {
    // Simulate a block server response for a missing block
    Status::new(2704, "BLOCK_NONEXISTENT", format!("missing block {}", id))
}

fn main() {
    println!("--- Basic Usage Example ---\n");

    let unwrapper = BServerErrorUnwrapper;
    let response = fetch_block("xyz");

    match unwrapper.unwrap_error(&response) {
        Ok(None) => println!("Success!"),
        Ok(Some(err)) => {
            // SCENARIO 1: Branch on the failure kind
            println!("1. [CLASSIFIED] {:?}", err.kind());
            println!("   message: \"{}\"", err);

            match err.recovery() {
                RecoveryHint::Backoff => println!("   -> back off and retry"),
                RecoveryHint::RefreshCredentials => println!("   -> refresh session and retry"),
                RecoveryHint::Permanent => println!("   -> do not retry"),
                RecoveryHint::Surface => println!("   -> surface to the user"),
            }

            // SCENARIO 2: Structured log line for the operator
            println!("\n2. [LOG LINE]");
            let mut line = String::new();
            if err.status_log().write_to(&mut line).is_ok() {
                println!("   {}", line);
            }
        }
        Err(dispatch) => {
            // A protocol defect, not an application error
            eprintln!("unexpected: {}", dispatch);
        }
    }

    // SCENARIO 3: Empty description falls back to the default text
    let err = BServerError::unauthorized("");
    println!("\n3. [DEFAULT MESSAGE] \"{}\"", err.message());
    println!("   permission denied: {}", err.is_permission_denied());

    // SCENARIO 4: Envelope as a Result
    match bserver_errors::check(&Status::new(2707, "THROTTLE", "slow down")) {
        Ok(()) => println!("\n4. [CHECK] no error"),
        Err(err) => println!("\n4. [CHECK] {} (retryable: {})", err, err.is_retryable()),
    }
}
