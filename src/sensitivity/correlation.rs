//! Spearman rank correlation with a two-sided p-value.
//!
//! The p-value uses the t approximation with `n - 2` degrees of freedom.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::ranking::average_rank;
use crate::errors::{IndexError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    /// NaN when undefined (fewer than two points, or a constant side)
    pub rho: f64,
    /// NaN when `rho` is NaN or fewer than three points
    pub p_value: f64,
    pub n: usize,
}

pub fn spearman(x: &[f64], y: &[f64]) -> Result<Correlation> {
    if x.len() != y.len() {
        return Err(IndexError::invalid_argument(format!(
            "Spearman inputs differ in length: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();

    let defined = n >= 2 && x.iter().chain(y).all(|v| v.is_finite());
    let rho = if defined {
        pearson(&average_rank(x), &average_rank(y))
    } else {
        f64::NAN
    };

    Ok(Correlation {
        rho,
        p_value: two_sided_p_value(rho, n),
        n,
    })
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    let den = (den_x * den_y).sqrt();
    if den > 0.0 {
        (num / den).clamp(-1.0, 1.0)
    } else {
        f64::NAN
    }
}

fn two_sided_p_value(rho: f64, n: usize) -> f64 {
    if rho.is_nan() || n < 3 {
        return f64::NAN;
    }
    if rho.abs() >= 1.0 {
        return 0.0;
    }

    let df = (n - 2) as f64;
    let t = rho * (df / ((1.0 + rho) * (1.0 - rho))).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
