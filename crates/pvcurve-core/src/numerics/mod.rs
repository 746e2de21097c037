pub mod kernel;
pub mod spline;

pub use kernel::InterpolationKernel;
pub use spline::CubicSpline;

use serde::Serialize;

fn kahan_add(sum: &mut f64, correction: &mut f64, value: f64) {
    let corrected = value - *correction;
    let next = *sum + corrected;
    *correction = (next - *sum) - corrected;
    *sum = next;
}

pub fn stable_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;

    for &value in values {
        kahan_add(&mut sum, &mut correction, value);
    }

    sum
}

pub fn stable_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(stable_sum(values) / values.len() as f64)
}

/// `count` evenly spaced values from `start` to `end`, both ends included exactly.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = count - 1;
            let step = (end - start) / last as f64;
            (0..count)
                .map(|index| {
                    if index == last {
                        end
                    } else {
                        start + step * index as f64
                    }
                })
                .collect()
        }
    }
}

/// Index of the entry closest to `target`; the lower index wins a tie.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (index, value)| {
            let distance = (value - target).abs();
            match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((index, distance)),
            }
        })
        .map(|(index, _)| index)
}

/// Ordinary least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub point_count: usize,
}

/// Returns `None` for fewer than two points or when every `x` is identical.
pub fn fit_linear(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let mean_x = stable_mean(x)?;
    let mean_y = stable_mean(y)?;

    let dx: Vec<f64> = x.iter().map(|value| value - mean_x).collect();
    let dy: Vec<f64> = y.iter().map(|value| value - mean_y).collect();
    let sxx = stable_sum(&dx.iter().map(|d| d * d).collect::<Vec<_>>());
    let syy = stable_sum(&dy.iter().map(|d| d * d).collect::<Vec<_>>());
    let sxy = stable_sum(&dx.iter().zip(&dy).map(|(a, b)| a * b).collect::<Vec<_>>());

    if sxx <= 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy > 0.0 {
        (sxy * sxy) / (sxx * syy)
    } else {
        1.0
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
        point_count: x.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::{fit_linear, linspace, nearest_index, stable_mean, stable_sum};

    #[test]
    fn stable_sum_recovers_small_terms() {
        let mut values = vec![1.0e16];
        values.extend(std::iter::repeat_n(1.0, 10));
        values.push(-1.0e16);
        assert_eq!(stable_sum(&values), 10.0);
        assert_eq!(stable_mean(&[]), None);
    }

    #[test]
    fn linspace_hits_both_ends_exactly() {
        let grid = linspace(0.1, 0.7, 7);
        assert_eq!(grid.len(), 7);
        assert_eq!(grid[0], 0.1);
        assert_eq!(grid[6], 0.7);
        assert!((grid[3] - 0.4).abs() < 1.0e-15);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
    }

    #[test]
    fn nearest_index_prefers_lower_index_on_tie() {
        let values = [-0.2, -0.1, 0.1, 0.3];
        assert_eq!(nearest_index(&values, 0.0), Some(1));
        assert_eq!(nearest_index(&values, 0.25), Some(3));
        assert_eq!(nearest_index(&[], 0.0), None);
    }

    #[test]
    fn linear_fit_recovers_exact_line() {
        let x = [0.0, 0.5, 1.0, 1.5];
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 2.0).collect();
        let fit = fit_linear(&x, &y).expect("fit should exist");
        assert!((fit.slope - 3.0).abs() < 1.0e-12);
        assert!((fit.intercept + 2.0).abs() < 1.0e-12);
        assert!((fit.r_squared - 1.0).abs() < 1.0e-12);
        assert_eq!(fit.point_count, 4);
    }

    #[test]
    fn linear_fit_rejects_degenerate_inputs() {
        assert!(fit_linear(&[1.0], &[2.0]).is_none());
        assert!(fit_linear(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(fit_linear(&[1.0, 2.0], &[1.0]).is_none());
    }
}
