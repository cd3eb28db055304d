//! Significance testing for count changes between two periods

use crate::models::{ConfidenceInterval, EffectMagnitude, StatisticalAnalysis};

/// z for a two-sided 95% interval
const Z_95: f64 = 1.96;

#[derive(Debug, Clone, Copy)]
pub struct Stats {
    pub significance_level: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
        }
    }
}

impl Stats {
    /// Chi-square test of `current` vs `baseline` against an even split
    pub fn analyze(&self, current: usize, baseline: usize) -> StatisticalAnalysis {
        let c = current as f64;
        let b = baseline as f64;
        let total = c + b;

        let chi_square = if total > 0.0 { (c - b).powi(2) / total } else { 0.0 };
        let p_value = Self::chi_square_p_value(chi_square);

        let margin = Z_95 * total.sqrt();
        let difference = c - b;

        let effect_size = if b > 0.0 {
            (c - b).abs() / b
        } else if c > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        StatisticalAnalysis {
            chi_square,
            p_value,
            is_significant: p_value < self.significance_level,
            confidence_interval: ConfidenceInterval {
                lower: difference - margin,
                upper: difference + margin,
            },
            effect_size,
            effect_magnitude: Self::effect_magnitude(effect_size),
        }
    }

    /// Upper tail probability of chi-square with one degree of freedom
    pub fn chi_square_p_value(chi_square: f64) -> f64 {
        if chi_square <= 0.0 {
            return 1.0;
        }
        erfc((chi_square / 2.0).sqrt()).clamp(0.0, 1.0)
    }

    pub fn effect_magnitude(effect_size: f64) -> EffectMagnitude {
        if effect_size < 0.2 {
            EffectMagnitude::Negligible
        } else if effect_size < 0.5 {
            EffectMagnitude::Small
        } else if effect_size < 0.8 {
            EffectMagnitude::Medium
        } else {
            EffectMagnitude::Large
        }
    }
}

/// Complementary error function, fractional error below 1.2e-7
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87 + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erfc_known_values() {
        assert!((erfc(0.0) - 1.0).abs() < 1e-6);
        assert!((erfc(1.0) - 0.157_299_2).abs() < 1e-6);
        assert!((erfc(-1.0) - 1.842_700_8).abs() < 1e-6);
    }

    #[test]
    fn test_equal_counts_not_significant() {
        let analysis = Stats::default().analyze(50, 50);
        assert_eq!(analysis.chi_square, 0.0);
        assert_eq!(analysis.p_value, 1.0);
        assert!(!analysis.is_significant);
        assert_eq!(analysis.effect_magnitude, EffectMagnitude::Negligible);
        assert!(analysis.confidence_interval.lower < 0.0);
        assert!(analysis.confidence_interval.upper > 0.0);
    }

    #[test]
    fn test_large_change_is_significant() {
        let analysis = Stats::default().analyze(150, 50);
        // (150 - 50)^2 / 200
        assert_eq!(analysis.chi_square, 50.0);
        assert!(analysis.p_value < 0.001);
        assert!(analysis.is_significant);
        assert_eq!(analysis.effect_size, 2.0);
        assert_eq!(analysis.effect_magnitude, EffectMagnitude::Large);
    }

    #[test]
    fn test_chi_square_critical_value() {
        // 3.841 is the 95% critical value for one degree of freedom
        let p = Stats::chi_square_p_value(3.841);
        assert!((p - 0.05).abs() < 1e-3);
    }
}
