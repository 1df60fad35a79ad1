//! Fuzz target for quad.json settings parsing.
//!
//! Tests that parsing plus semantic validation handles arbitrary input
//! without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use uq_config::QuadSettings;

fuzz_target!(|data: &str| {
    // Should never panic, only return a ValidationError
    let _ = QuadSettings::from_json(data);
});
