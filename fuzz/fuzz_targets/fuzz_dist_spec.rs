//! Fuzz target for distribution strings (`family:p1,p2,...`).
//!
//! Tests that parsing and support queries handle arbitrary input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use uq_core::{Distribution, Marginal};

fuzz_target!(|data: &str| {
    if let Ok(marginal) = data.parse::<Marginal>() {
        let (lower, upper) = marginal.range();
        let _ = marginal.pdf(&[0.5 * (lower[0] + upper[0])]);
        let _ = marginal.mom(&[2]);
        // Display output must parse back
        assert!(marginal.to_string().parse::<Marginal>().is_ok());
    }
});
