//! Normal (Gaussian) distribution utilities.

use super::stable::LOG_SQRT_2PI;

/// Log of the Normal(mu, sigma) PDF at x.
pub fn normal_log_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if x.is_nan() || mu.is_nan() || sigma.is_nan() || sigma <= 0.0 {
        return f64::NAN;
    }
    let z = (x - mu) / sigma;
    -0.5 * z * z - LOG_SQRT_2PI - sigma.ln()
}

/// Normal(mu, sigma) PDF at x.
pub fn normal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    let log_pdf = normal_log_pdf(x, mu, sigma);
    if log_pdf.is_nan() {
        return f64::NAN;
    }
    log_pdf.exp()
}

/// Raw moment E[X^k] of Normal(mu, sigma).
///
/// Uses the recursion E[X^k] = mu E[X^(k-1)] + (k-1) sigma^2 E[X^(k-2)].
pub fn normal_raw_moment(k: u32, mu: f64, sigma: f64) -> f64 {
    if mu.is_nan() || sigma.is_nan() || sigma <= 0.0 {
        return f64::NAN;
    }
    let variance = sigma * sigma;
    let mut prev = 1.0;
    let mut cur = mu;
    if k == 0 {
        return prev;
    }
    for j in 2..=k {
        let next = mu * cur + f64::from(j - 1) * variance * prev;
        prev = cur;
        cur = next;
    }
    cur
}
