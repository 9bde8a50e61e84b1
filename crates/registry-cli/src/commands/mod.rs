pub mod account;
pub mod catalog;
pub mod lifecycle;

use anyhow::Result;
use serde::Serialize;

use registry_core::{ErrorResponse, RegistryError};

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Maps a failure to an [`ErrorResponse`].
///
/// Registry errors keep their status code; anything else (unreadable input
/// files, malformed JSON) is the caller's fault and reported as 400.
pub fn error_response(err: &anyhow::Error) -> ErrorResponse {
    match err.downcast_ref::<RegistryError>() {
        Some(registry_err) => {
            if registry_err.status_code() >= 500 {
                tracing::error!("[CLI] {:#}", err);
            }
            ErrorResponse::from(registry_err)
        }
        None => ErrorResponse {
            status_code: 400,
            success: false,
            message: format!("{:#}", err),
        },
    }
}

/// Prints the error response for `err` on stderr.
pub fn report_error(err: &anyhow::Error) {
    let response = error_response(err);
    match serde_json::to_string_pretty(&response) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", response.message),
    }
}
