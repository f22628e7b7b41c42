//! Conversions between CAGR, nominal, real and effective annual rates
//!
//! All rates are decimal fractions (0.10 = 10%).

/// Compound annual growth rate that takes `pv` to `fv` over `years`.
///
/// Edge values are sentinels, not errors:
/// * `years == 0` gives `0.0`
/// * `pv == 0, fv > 0` gives `+inf`
/// * `fv == 0, pv > 0` gives exactly `-1.0`
/// * `pv == 0, fv == 0` gives `0.0` (nothing grew)
pub fn cagr(pv: f64, fv: f64, years: f64) -> f64 {
    if years == 0.0 {
        return 0.0;
    }
    if pv == 0.0 {
        return if fv > 0.0 { f64::INFINITY } else { 0.0 };
    }
    if fv == 0.0 && pv > 0.0 {
        return -1.0;
    }

    (fv / pv).powf(1.0 / years) - 1.0
}

/// Real rate from a nominal rate via the Fisher relation.
/// Negative inflation (deflation) yields a real rate above nominal.
pub fn real_rate(nominal: f64, inflation: f64) -> f64 {
    if inflation == 0.0 {
        return nominal;
    }
    (1.0 + nominal) / (1.0 + inflation) - 1.0
}

/// Nominal rate from a real rate; inverse of [`real_rate`]
pub fn nominal_rate(real: f64, inflation: f64) -> f64 {
    if inflation == 0.0 {
        return real;
    }
    (1.0 + real) * (1.0 + inflation) - 1.0
}

/// Effective annual rate of `nominal` compounded `periods_per_year` times.
/// Zero periods is treated as a no-op and returns `nominal` unchanged.
pub fn effective_annual_rate(nominal: f64, periods_per_year: u32) -> f64 {
    match periods_per_year {
        0 | 1 => nominal,
        p => (1.0 + nominal / p as f64).powi(p as i32) - 1.0,
    }
}

/// Rate applied per compounding period (`nominal / periods_per_year`)
pub fn periodic_rate(nominal: f64, periods_per_year: u32) -> f64 {
    if periods_per_year == 0 {
        nominal
    } else {
        nominal / periods_per_year as f64
    }
}

/// Growth of one unit over `periods` at `periodic` rate: `(1+i)^n`.
/// Fractional period counts compound fractionally.
pub fn growth_factor(periodic: f64, periods: f64) -> f64 {
    if periodic == 0.0 || periods == 0.0 {
        return 1.0;
    }
    (periods * periodic.ln_1p()).exp()
}

/// Future value of one unit deposited at the end of each period: `((1+i)^n - 1) / i`
///
/// Evaluated as `exp_m1(n ln_1p(i)) / i` so tiny periodic rates keep full precision.
pub fn annuity_factor(periodic: f64, periods: f64) -> f64 {
    if periods == 0.0 {
        return 0.0;
    }
    if periodic == 0.0 {
        return periods;
    }
    (periods * periodic.ln_1p()).exp_m1() / periodic
}
