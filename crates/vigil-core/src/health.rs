//! Health scoring and risk classification
//!
//! Combines the statistics engine's output into a normalized [0, 1] health
//! score and a discrete risk level. Lower variance, lower autocorrelation and
//! faster responses mean better coordination health.

use crate::config::ThresholdConfig;
use crate::types::RiskLevel;

/// Normalization ceiling for variance in the health score
pub const VARIANCE_CEILING: f64 = 1000.0;

/// Normalization ceiling for mean response time (ms) in the health score
pub const RESPONSE_TIME_CEILING_MS: f64 = 5000.0;

/// Compute the coordination health score in [0, 1]
///
/// `1 − (0.4·norm(variance) + 0.4·norm(|autocorr|) + 0.2·norm(response))`,
/// each norm clipping against its fixed ceiling. Clamping holds for inputs
/// arbitrarily far beyond the ceilings.
pub fn coordination_health(variance: f64, autocorrelation: f64, response_time: f64) -> f64 {
    let variance_norm = (variance / VARIANCE_CEILING).clamp(0.0, 1.0);
    let autocorr_norm = autocorrelation.abs().min(1.0);
    let response_norm = (response_time / RESPONSE_TIME_CEILING_MS).clamp(0.0, 1.0);

    let health = 1.0 - (0.4 * variance_norm + 0.4 * autocorr_norm + 0.2 * response_norm);
    health.clamp(0.0, 1.0)
}

/// Derive the discrete risk level from threshold exceedances
///
/// All three exceedances -> critical; response-time breach, or both variance
/// and autocorrelation -> high; any single one of variance/autocorrelation
/// -> medium; none -> low.
pub fn classify_risk(
    variance: f64,
    autocorrelation: f64,
    response_time: f64,
    thresholds: &ThresholdConfig,
) -> RiskLevel {
    let variance_exceeded = variance > thresholds.variance_threshold;
    let autocorr_exceeded = autocorrelation.abs() > thresholds.autocorr_threshold;
    let response_exceeded = response_time > thresholds.response_time_threshold_ms;

    if variance_exceeded && autocorr_exceeded && response_exceeded {
        RiskLevel::Critical
    } else if response_exceeded || (variance_exceeded && autocorr_exceeded) {
        RiskLevel::High
    } else if variance_exceeded || autocorr_exceeded {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_quiet_system_is_fully_healthy() {
        assert_eq!(coordination_health(0.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_health_with_known_inputs() {
        // variance 500 -> 0.5 norm, autocorr 0.5, response 2500 -> 0.5 norm
        // health = 1 - (0.2 + 0.2 + 0.1) = 0.5
        let health = coordination_health(500.0, 0.5, 2500.0);
        assert!((health - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_health_clips_beyond_ceilings() {
        let health = coordination_health(1e9, 50.0, 1e9);
        assert_eq!(health, 0.0);
    }

    #[test]
    fn test_negative_autocorrelation_is_a_warning_sign_too() {
        assert_eq!(
            coordination_health(0.0, -0.8, 0.0),
            coordination_health(0.0, 0.8, 0.0)
        );
    }

    proptest! {
        #[test]
        fn prop_health_always_in_unit_interval(
            variance in -1e12_f64..1e12,
            autocorr in -100.0_f64..100.0,
            response in -1e12_f64..1e12,
        ) {
            let health = coordination_health(variance, autocorr, response);
            prop_assert!((0.0..=1.0).contains(&health));
        }
    }

    fn thresholds() -> ThresholdConfig {
        ThresholdConfig::default()
    }

    #[test]
    fn test_risk_all_clear() {
        assert_eq!(classify_risk(0.0, 0.0, 0.0, &thresholds()), RiskLevel::Low);
    }

    #[test]
    fn test_risk_single_exceedance_is_medium() {
        let t = thresholds();
        assert_eq!(classify_risk(600.0, 0.0, 0.0, &t), RiskLevel::Medium);
        assert_eq!(classify_risk(0.0, 0.6, 0.0, &t), RiskLevel::Medium);
    }

    #[test]
    fn test_risk_response_breach_alone_is_high() {
        assert_eq!(
            classify_risk(0.0, 0.0, 4000.0, &thresholds()),
            RiskLevel::High
        );
    }

    #[test]
    fn test_risk_variance_plus_autocorr_is_high() {
        assert_eq!(
            classify_risk(600.0, 0.6, 0.0, &thresholds()),
            RiskLevel::High
        );
    }

    #[test]
    fn test_risk_all_three_is_critical() {
        assert_eq!(
            classify_risk(600.0, 0.6, 4000.0, &thresholds()),
            RiskLevel::Critical
        );
    }
}
