//! Sliding-window statistics for critical-slowing-down analysis
//!
//! Rising variance and rising lag-1 autocorrelation in a system's
//! fluctuations are the classic indicators that it is approaching a critical
//! transition. The engine tracks both over the current window, on two series:
//!
//! - consecutive timestamp deltas (timing-based indicator)
//! - response latencies (load-based indicator, canonical for health scoring)
//!
//! Every function here is a pure function of its input: insufficient data is
//! not an error but the defined neutral value 0, and degenerate numeric
//! results (division by zero on a flat series) are coerced to 0 at the
//! boundary so no NaN ever propagates outward.

use crate::types::InteractionRecord;

/// Clamp non-finite intermediate results to the neutral value
fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Population variance of a scalar series; 0 below 2 samples
pub fn population_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    finite_or_zero(var)
}

/// Variance of consecutive timestamp deltas over the window
///
/// Timing-based CSD series: erratic inter-arrival intervals mean the stream's
/// rhythm is destabilizing.
pub fn interval_variance(records: &[InteractionRecord]) -> f64 {
    if records.len() < 2 {
        return 0.0;
    }
    let intervals: Vec<f64> = records
        .windows(2)
        .map(|pair| pair[1].timestamp as f64 - pair[0].timestamp as f64)
        .collect();
    population_variance(&intervals)
}

/// Variance of response latencies over the window
///
/// Load-based CSD series; canonical input to the health classifier.
pub fn response_variance(records: &[InteractionRecord]) -> f64 {
    let latencies: Vec<f64> = records.iter().map(|r| r.response_time_ms).collect();
    population_variance(&latencies)
}

/// Normalized lag-k autocorrelation `c_k / c_0` of a scalar series
///
/// Requires at least `lag + 2` samples, else 0. A flat series (`c_0 == 0`)
/// has autocorrelation 0 by definition here, never NaN.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if lag == 0 || values.len() < lag + 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let c0 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if c0 == 0.0 {
        return 0.0;
    }
    let pairs = values.len() - lag;
    let c_lag = values
        .iter()
        .take(pairs)
        .zip(values.iter().skip(lag))
        .map(|(a, b)| (a - mean) * (b - mean))
        .sum::<f64>()
        / pairs as f64;
    finite_or_zero(c_lag / c0)
}

/// Lag-1 autocorrelation of response latencies over the window
pub fn response_autocorrelation(records: &[InteractionRecord]) -> f64 {
    let latencies: Vec<f64> = records.iter().map(|r| r.response_time_ms).collect();
    autocorrelation(&latencies, 1)
}

/// Arithmetic mean of response times over the window; 0 on empty input
pub fn mean_response_time(records: &[InteractionRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(|r| r.response_time_ms).sum();
    finite_or_zero(sum / records.len() as f64)
}
