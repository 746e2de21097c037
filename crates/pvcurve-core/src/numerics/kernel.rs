use super::spline::{CubicSpline, SplineError, bracket};
use crate::domain::InterpolationKind;

/// A fitted interpolation kernel over strictly increasing knots.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationKernel {
    Linear { xs: Vec<f64>, ys: Vec<f64> },
    Nearest { xs: Vec<f64>, ys: Vec<f64> },
    Cubic(CubicSpline),
}

impl InterpolationKernel {
    /// Callers validate knot counts and ordering; the spline re-checks its own requirements.
    pub fn fit(kind: InterpolationKind, xs: &[f64], ys: &[f64]) -> Result<Self, SplineError> {
        Ok(match kind {
            InterpolationKind::Linear => Self::Linear {
                xs: xs.to_vec(),
                ys: ys.to_vec(),
            },
            InterpolationKind::Nearest => Self::Nearest {
                xs: xs.to_vec(),
                ys: ys.to_vec(),
            },
            InterpolationKind::Cubic => Self::Cubic(CubicSpline::not_a_knot(xs, ys)?),
        })
    }

    pub fn kind(&self) -> InterpolationKind {
        match self {
            Self::Linear { .. } => InterpolationKind::Linear,
            Self::Nearest { .. } => InterpolationKind::Nearest,
            Self::Cubic(_) => InterpolationKind::Cubic,
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Linear { xs, ys } => {
                let (lo, hi) = bracket(xs, x);
                let fraction = (x - xs[lo]) / (xs[hi] - xs[lo]);
                ys[lo] + (ys[hi] - ys[lo]) * fraction
            }
            Self::Nearest { xs, ys } => {
                let (lo, hi) = bracket(xs, x);
                if x - xs[lo] <= xs[hi] - x {
                    ys[lo]
                } else {
                    ys[hi]
                }
            }
            Self::Cubic(spline) => spline.evaluate(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InterpolationKernel;
    use crate::domain::InterpolationKind;

    #[test]
    fn linear_kernel_interpolates_between_knots() {
        let kernel =
            InterpolationKernel::fit(InterpolationKind::Linear, &[0.0, 1.0, 3.0], &[1.0, 3.0, 7.0])
                .expect("linear kernel");
        assert_eq!(kernel.evaluate(0.5), 2.0);
        assert_eq!(kernel.evaluate(2.0), 5.0);
        assert_eq!(kernel.evaluate(3.0), 7.0);
        assert_eq!(kernel.kind(), InterpolationKind::Linear);
    }

    #[test]
    fn nearest_kernel_breaks_ties_toward_lower_knot() {
        let kernel =
            InterpolationKernel::fit(InterpolationKind::Nearest, &[0.0, 1.0, 2.0], &[5.0, 6.0, 7.0])
                .expect("nearest kernel");
        assert_eq!(kernel.evaluate(0.5), 5.0);
        assert_eq!(kernel.evaluate(0.51), 6.0);
        assert_eq!(kernel.evaluate(1.9), 7.0);
        assert_eq!(kernel.evaluate(2.0), 7.0);
    }

    #[test]
    fn cubic_kernel_requires_four_knots() {
        assert!(
            InterpolationKernel::fit(InterpolationKind::Cubic, &[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0])
                .is_err()
        );
    }
}
