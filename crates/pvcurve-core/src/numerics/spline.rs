//! Not-a-knot cubic spline.
//!
//! The spline stores second derivatives `M_i` at each knot. The not-a-knot end conditions
//! (continuous third derivative across the second and second-to-last knots) are eliminated
//! into the first and last interior rows, leaving a tridiagonal system that is solved with
//! the Thomas algorithm.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplineError {
    #[error("cubic spline requires at least 4 knots, got {actual}")]
    InsufficientKnots { actual: usize },
    #[error("spline input length mismatch: x={x}, y={y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("spline knots must be strictly increasing, index {index} has {current} after {previous}")]
    NonIncreasingKnots {
        index: usize,
        previous: f64,
        current: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second_derivatives: Vec<f64>,
}

impl CubicSpline {
    pub const MIN_KNOTS: usize = 4;

    pub fn not_a_knot(xs: &[f64], ys: &[f64]) -> Result<Self, SplineError> {
        if xs.len() != ys.len() {
            return Err(SplineError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        let n = xs.len();
        if n < Self::MIN_KNOTS {
            return Err(SplineError::InsufficientKnots { actual: n });
        }
        for index in 1..n {
            if xs[index] <= xs[index - 1] {
                return Err(SplineError::NonIncreasingKnots {
                    index,
                    previous: xs[index - 1],
                    current: xs[index],
                });
            }
        }

        let h: Vec<f64> = xs.windows(2).map(|pair| pair[1] - pair[0]).collect();
        let slopes: Vec<f64> = ys
            .windows(2)
            .zip(&h)
            .map(|(pair, width)| (pair[1] - pair[0]) / width)
            .collect();

        // Unknowns are M_1 ..= M_{n-2}.
        let m = n - 2;
        let mut lower = vec![0.0; m];
        let mut diag = vec![0.0; m];
        let mut upper = vec![0.0; m];
        let mut rhs = vec![0.0; m];

        for row in 0..m {
            let knot = row + 1;
            lower[row] = h[knot - 1];
            diag[row] = 2.0 * (h[knot - 1] + h[knot]);
            upper[row] = h[knot];
            rhs[row] = 6.0 * (slopes[knot] - slopes[knot - 1]);
        }

        // M_0 = ((h0 + h1) M_1 - h0 M_2) / h1
        let (h0, h1) = (h[0], h[1]);
        diag[0] = (h0 + h1) * (h0 + 2.0 * h1) / h1;
        upper[0] = (h1 - h0) * (h1 + h0) / h1;
        lower[0] = 0.0;

        // M_{n-1} = ((h_a + h_b) M_{n-2} - h_b M_{n-3}) / h_a
        let (ha, hb) = (h[n - 3], h[n - 2]);
        let last = m - 1;
        lower[last] = (ha - hb) * (ha + hb) / ha;
        diag[last] = (ha + hb) * (2.0 * ha + hb) / ha;
        upper[last] = 0.0;

        let interior = solve_tridiagonal(&lower, &diag, &upper, &rhs);

        let mut second_derivatives = vec![0.0; n];
        second_derivatives[1..n - 1].copy_from_slice(&interior);
        second_derivatives[0] =
            ((h0 + h1) * second_derivatives[1] - h0 * second_derivatives[2]) / h1;
        second_derivatives[n - 1] =
            ((ha + hb) * second_derivatives[n - 2] - hb * second_derivatives[n - 3]) / ha;

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            second_derivatives,
        })
    }

    /// Evaluates the spline; queries outside the knot range use the boundary cubic.
    pub fn evaluate(&self, x: f64) -> f64 {
        let (lo, hi) = bracket(&self.xs, x);
        let width = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / width;
        let b = (x - self.xs[lo]) / width;

        a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.second_derivatives[lo]
                + (b * b * b - b) * self.second_derivatives[hi])
                * width
                * width
                / 6.0
    }
}

/// Indices `(lo, lo + 1)` of the knot interval holding `x`, clamped to the end intervals.
pub(crate) fn bracket(xs: &[f64], x: f64) -> (usize, usize) {
    let upper = xs.partition_point(|value| *value <= x);
    let hi = upper.clamp(1, xs.len() - 1);
    (hi - 1, hi)
}

fn solve_tridiagonal(lower: &[f64], diag: &[f64], upper: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    c_prime[0] = upper[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];
    for index in 1..n {
        let denominator = diag[index] - lower[index] * c_prime[index - 1];
        c_prime[index] = upper[index] / denominator;
        d_prime[index] = (rhs[index] - lower[index] * d_prime[index - 1]) / denominator;
    }

    let mut solution = vec![0.0; n];
    solution[n - 1] = d_prime[n - 1];
    for index in (0..n - 1).rev() {
        solution[index] = d_prime[index] - c_prime[index] * solution[index + 1];
    }
    solution
}

#[cfg(test)]
mod tests {
    use super::{CubicSpline, SplineError};

    fn assert_close(label: &str, expected: f64, actual: f64, tol: f64) {
        assert!(
            (expected - actual).abs() <= tol,
            "{label}: expected {expected}, got {actual}"
        );
    }

    #[test]
    fn spline_passes_through_knots() {
        let xs = [0.0, 0.2, 0.4, 0.6, 0.8];
        let ys = [20.0, 19.0, 17.0, 10.0, 0.0];
        let spline = CubicSpline::not_a_knot(&xs, &ys).expect("spline should build");
        for (x, y) in xs.iter().zip(ys) {
            assert_eq!(spline.evaluate(*x), y);
        }
    }

    #[test]
    fn spline_reproduces_cubic_polynomials_exactly() {
        let cubic = |x: f64| 2.0 * x * x * x - x * x + 0.5 * x - 3.0;
        let xs = [-1.0, -0.3, 0.2, 0.9, 1.5, 2.0];
        let ys: Vec<f64> = xs.iter().map(|x| cubic(*x)).collect();
        let spline = CubicSpline::not_a_knot(&xs, &ys).expect("spline should build");

        for step in 0..=60 {
            let x = -1.0 + 3.0 * step as f64 / 60.0;
            assert_close("cubic reproduction", cubic(x), spline.evaluate(x), 1.0e-10);
        }
    }

    #[test]
    fn four_knots_give_the_interpolating_cubic() {
        let cubic = |x: f64| x * x * x - 2.0 * x;
        let xs = [0.0, 1.0, 2.5, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| cubic(*x)).collect();
        let spline = CubicSpline::not_a_knot(&xs, &ys).expect("spline should build");
        assert_close("midpoint", cubic(1.75), spline.evaluate(1.75), 1.0e-10);
        assert_close("first interval", cubic(0.4), spline.evaluate(0.4), 1.0e-10);
    }

    #[test]
    fn spline_rejects_invalid_knots() {
        assert_eq!(
            CubicSpline::not_a_knot(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]),
            Err(SplineError::InsufficientKnots { actual: 3 })
        );
        assert!(matches!(
            CubicSpline::not_a_knot(&[0.0, 1.0, 1.0, 2.0], &[0.0; 4]),
            Err(SplineError::NonIncreasingKnots { index: 2, .. })
        ));
        assert!(matches!(
            CubicSpline::not_a_knot(&[0.0, 1.0, 2.0, 3.0], &[0.0; 3]),
            Err(SplineError::LengthMismatch { x: 4, y: 3 })
        ));
    }
}
