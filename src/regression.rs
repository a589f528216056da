//! Regression routines used to extend cost-index tables and to fit capital cost curves.
//!
//! Cost curves in the reference data are tabulated as (flow, cost) points; the models use
//! power-law fits `y = a * x ^ b`. The fit is an ordinary least-squares regression in
//! log-log space, which requires strictly positive samples.
use anyhow::{Result, ensure};
use itertools::Itertools;

/// Coefficients of a linear fit `y = gradient * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// The gradient of the fitted line
    pub gradient: f64,
    /// The intercept of the fitted line
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.gradient * x + self.intercept
    }
}

/// Coefficients of a power-law fit `y = coefficient * x ^ exponent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerFit {
    /// The multiplier of the fitted curve
    pub coefficient: f64,
    /// The exponent of the fitted curve
    pub exponent: f64,
}

impl PowerFit {
    /// Evaluate the fitted curve at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.coefficient * x.powf(self.exponent)
    }
}

/// Fit a straight line to the given points by ordinary least squares.
///
/// # Arguments
///
/// * `points` - (x, y) samples; at least two distinct x values are required
pub fn linear_fit(points: &[(f64, f64)]) -> Result<LinearFit> {
    ensure!(
        points.len() >= 2,
        "Linear fit requires at least two points (got {})",
        points.len()
    );

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let ss_xx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    ensure!(ss_xx > 0.0, "Linear fit requires at least two distinct x values");

    let ss_xy: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    let gradient = ss_xy / ss_xx;
    Ok(LinearFit {
        gradient,
        intercept: mean_y - gradient * mean_x,
    })
}

/// Fit a power law to the given points via least squares in log-log space.
///
/// # Arguments
///
/// * `points` - (x, y) samples; all values must be strictly positive
pub fn power_fit(points: &[(f64, f64)]) -> Result<PowerFit> {
    ensure!(
        points.iter().all(|&(x, y)| x > 0.0 && y > 0.0),
        "Power fit requires strictly positive samples"
    );

    let log_points = points
        .iter()
        .map(|&(x, y)| (x.ln(), y.ln()))
        .collect_vec();
    let fit = linear_fit(&log_points)?;

    Ok(PowerFit {
        coefficient: fit.intercept.exp(),
        exponent: fit.gradient,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[(2015.0, 100.0), (2016.0, 102.0), (2017.0, 104.0)], 2.0, -3930.0)]
    #[case(&[(0.0, 1.0), (1.0, 1.0)], 0.0, 1.0)]
    fn test_linear_fit(
        #[case] points: &[(f64, f64)],
        #[case] gradient: f64,
        #[case] intercept: f64,
    ) {
        let fit = linear_fit(points).unwrap();
        assert_approx_eq!(f64, fit.gradient, gradient, epsilon = 1e-9);
        assert_approx_eq!(f64, fit.intercept, intercept, epsilon = 1e-6);
    }

    #[test]
    fn test_linear_fit_predict() {
        let fit = linear_fit(&[(2018.0, 110.0), (2020.0, 114.0)]).unwrap();
        assert_approx_eq!(f64, fit.predict(2022.0), 118.0, epsilon = 1e-9);
    }

    #[test]
    fn test_linear_fit_bad_input() {
        assert!(linear_fit(&[(1.0, 1.0)]).is_err());
        assert!(linear_fit(&[(1.0, 1.0), (1.0, 2.0)]).is_err());
    }

    #[test]
    fn test_power_fit_exact() {
        // Samples generated from y = 900.97 * x ^ 0.6179
        let points: Vec<_> = [0.5, 1.0, 3.0, 10.0, 250.0]
            .into_iter()
            .map(|x: f64| (x, 900.97 * x.powf(0.6179)))
            .collect();
        let fit = power_fit(&points).unwrap();
        assert_approx_eq!(f64, fit.coefficient, 900.97, epsilon = 1e-6);
        assert_approx_eq!(f64, fit.exponent, 0.6179, epsilon = 1e-9);
        assert_approx_eq!(f64, fit.predict(1.0), 900.97, epsilon = 1e-6);
    }

    #[test]
    fn test_power_fit_bad_input() {
        assert!(power_fit(&[(0.0, 1.0), (1.0, 2.0)]).is_err());
        assert!(power_fit(&[(1.0, -1.0), (2.0, 2.0)]).is_err());
    }
}
