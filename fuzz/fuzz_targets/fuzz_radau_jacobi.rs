//! Fuzz target for the Gauss-Radau Jacobi modification.
//!
//! Arbitrary recurrence coefficients and fixed points must yield either a
//! modified recurrence or an error, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use uq_core::{radau_jacobi, RecurrenceCoefficients};

#[derive(Debug, Arbitrary)]
struct Input {
    alpha: Vec<f64>,
    beta: Vec<f64>,
    fixed_point: f64,
}

fuzz_target!(|input: Input| {
    let Ok(coefficients) = RecurrenceCoefficients::new(input.alpha, input.beta) else {
        return;
    };
    if let Ok(modified) = radau_jacobi(&coefficients, input.fixed_point) {
        assert_eq!(modified.len(), coefficients.len());
        assert_eq!(modified.beta(), coefficients.beta());
    }
});
