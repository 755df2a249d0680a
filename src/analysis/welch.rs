//! Welch's unequal-variance two-sample t-test
//!
//! Used to compare SIR between two hospital cohorts. The two-sided p-value
//! comes from the Student's t survival function, evaluated through the
//! regularized incomplete beta function (no distribution crate in the
//! dependency tree covers this, so the continued-fraction evaluation is
//! implemented here).

use serde::Serialize;

/// Result of a Welch two-sample t-test
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WelchTTest {
    /// The t statistic (sign follows `a` minus `b`)
    pub t: f64,
    /// Welch–Satterthwaite degrees of freedom
    pub df: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Sample sizes
    pub n_a: usize,
    /// See `n_a`
    pub n_b: usize,
    /// Sample means
    pub mean_a: f64,
    /// See `mean_a`
    pub mean_b: f64,
}

/// Welch's t-test between two samples
///
/// Returns `None` when either sample has fewer than two values, or when
/// both samples have zero variance (the statistic is undefined).
#[must_use]
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<WelchTTest> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let (mean_a, var_a) = mean_and_variance(a);
    let (mean_b, var_b) = mean_and_variance(b);

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let se_a = var_a / n_a;
    let se_b = var_b / n_b;
    let pooled = se_a + se_b;
    if pooled == 0.0 {
        return None;
    }

    let t = (mean_a - mean_b) / pooled.sqrt();
    let df = pooled * pooled
        / (se_a * se_a / (n_a - 1.0) + se_b * se_b / (n_b - 1.0));
    let p_value = students_t_two_sided(t, df);

    Some(WelchTTest {
        t,
        df,
        p_value,
        n_a: a.len(),
        n_b: b.len(),
        mean_a,
        mean_b,
    })
}

/// Sample mean and unbiased (n-1) variance
fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / (n - 1.0);
    (mean, variance)
}

/// Two-sided p-value for a Student's t statistic with `df` degrees of freedom
///
/// P(|T| >= |t|) = I_{df / (df + t^2)}(df / 2, 1 / 2)
fn students_t_two_sided(t: f64, df: f64) -> f64 {
    let x = df / (df + t * t);
    regularized_incomplete_beta(df / 2.0, 0.5, x).clamp(0.0, 1.0)
}

/// Regularized incomplete beta function I_x(a, b)
fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    // the continued fraction converges fast only below this pivot
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Continued-fraction evaluation for the incomplete beta (modified Lentz)
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERATIONS: usize = 300;
    const EPSILON: f64 = 1.0e-14;
    const TINY: f64 = 1.0e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let numerator = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + numerator * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + numerator / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        let numerator = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + numerator * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + numerator / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    h
}

/// Natural log of the gamma function (Lanczos approximation, g = 7)
fn ln_gamma(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // reflection formula
        let pi = std::f64::consts::PI;
        (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut accumulator = COEFFICIENTS[0];
        let t = x + 7.5;
        for (i, coefficient) in COEFFICIENTS.iter().enumerate().skip(1) {
            accumulator += coefficient / (x + i as f64);
        }
        0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t
            + accumulator.ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma_known_values() {
        // Gamma(1) = Gamma(2) = 1
        assert!(ln_gamma(1.0).abs() < 1e-10);
        assert!(ln_gamma(2.0).abs() < 1e-10);
        // Gamma(5) = 24
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
        // Gamma(1/2) = sqrt(pi)
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn test_welch_against_reference_values() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];
        let result = welch_t_test(&a, &b).unwrap();
        // hand computation: t = -3 / sqrt(0.5 + 2.0), df by Welch-Satterthwaite
        assert!((result.t - (-1.897_366_596_101_028)).abs() < 1e-9);
        assert!((result.df - 5.882_352_941_176_47).abs() < 1e-9);
        assert!((result.p_value - 0.107).abs() < 0.005);
        assert_eq!(result.n_a, 5);
        assert!((result.mean_a - 3.0).abs() < 1e-12);
        assert!((result.mean_b - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_samples_give_p_one() {
        let a = [0.4, 0.6, 0.8, 1.0];
        let result = welch_t_test(&a, &a).unwrap();
        assert!(result.t.abs() < 1e-12);
        assert!((result.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_undefined_cases_return_none() {
        assert!(welch_t_test(&[1.0], &[1.0, 2.0]).is_none());
        assert!(welch_t_test(&[], &[]).is_none());
        // zero variance in both samples
        assert!(welch_t_test(&[1.0, 1.0], &[2.0, 2.0]).is_none());
    }

    #[test]
    fn test_far_apart_samples_are_significant() {
        let a = [0.1, 0.2, 0.15, 0.12, 0.18];
        let b = [2.1, 2.2, 2.15, 2.12, 2.18];
        let result = welch_t_test(&a, &b).unwrap();
        assert!(result.t < 0.0);
        assert!(result.p_value < 0.001);
    }
}
