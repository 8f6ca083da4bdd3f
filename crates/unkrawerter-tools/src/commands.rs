//! Subcommand implementations.
use anyhow::Error;
use unkrawerter::RipError;

pub mod rip;
pub mod samples;
pub mod scan;

/// Map an error chain onto the documented process exit codes: 2 for I/O
/// and data failures, 3 when no offsets were found, 10 for the instrument
/// limit.
pub fn exit_code(err: &Error) -> i32 {
    match err.downcast_ref::<RipError>() {
        Some(rip_error) => rip_error.exit_code(),
        None => 2,
    }
}
