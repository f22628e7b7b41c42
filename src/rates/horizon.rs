//! Time-horizon metrics: years until capital reaches a multiple of itself

/// Years for capital to double at annual `rate`.
/// Returns `+inf` when the rate is zero or negative.
pub fn years_to_double(rate: f64) -> f64 {
    years_to_multiplier(rate, 2.0)
}

/// Years for capital to grow by `multiplier` at annual `rate`.
///
/// A multiplier of 1 or less is already met (`0.0`); a non-positive rate never
/// reaches a larger multiple (`+inf`).
pub fn years_to_multiplier(rate: f64, multiplier: f64) -> f64 {
    if multiplier <= 1.0 {
        return 0.0;
    }
    if rate <= 0.0 {
        return f64::INFINITY;
    }
    multiplier.ln() / (1.0 + rate).ln()
}
