//! Fuzz target for Leja order strings ("3", "2,-1,4").

#![no_main]

use libfuzzer_sys::fuzz_target;
use uq_core::Order;

fuzz_target!(|data: &str| {
    if let Ok(order) = data.parse::<Order>() {
        let dim = match &order {
            Order::Uniform(_) => 1,
            Order::PerDimension(orders) => orders.len(),
        };
        let _ = order.per_dimension(dim);
    }
});
