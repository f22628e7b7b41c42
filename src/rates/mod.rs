//! Pure rate conversions and horizon metrics
//!
//! Free functions with no shared state, safe to call from any thread.

mod conversion;
mod horizon;

pub use conversion::{
    annuity_factor, cagr, effective_annual_rate, growth_factor, nominal_rate, periodic_rate,
    real_rate,
};
pub use horizon::{years_to_double, years_to_multiplier};
