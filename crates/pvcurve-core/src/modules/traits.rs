use crate::domain::{InterpolatedCurve, IvCurve};

/// Raw samples next to the curve interpolated from them.
#[derive(Debug, Clone, Copy)]
pub struct CurveComparison<'a> {
    pub raw: &'a IvCurve,
    pub interpolated: &'a InterpolatedCurve,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to render curve comparison: {message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Optional visualization capability. The numerical core only ever sees this trait; a caller
/// that wants no plots passes no renderer.
pub trait CurveRenderer {
    fn render_comparison(&self, comparison: CurveComparison<'_>) -> Result<(), RenderError>;
}

#[cfg(test)]
mod tests {
    use super::{CurveComparison, CurveRenderer, RenderError};
    use crate::common::InterpolationConfig;
    use crate::domain::{CurveQuantity, InterpolationKind, IvCurve};
    use crate::modules::interpolate::interpolate_curve;

    struct FailingRenderer;

    impl CurveRenderer for FailingRenderer {
        fn render_comparison(&self, _comparison: CurveComparison<'_>) -> Result<(), RenderError> {
            Err(RenderError::new("no display attached"))
        }
    }

    #[test]
    fn renderer_errors_carry_their_message() {
        let raw = IvCurve::from_samples(CurveQuantity::Current, &[0.0, 1.0], &[1.0, 0.0])
            .expect("valid curve");
        let interpolated = interpolate_curve(
            &raw,
            &InterpolationConfig {
                num_points: 3,
                kind: InterpolationKind::Linear,
            },
        )
        .expect("interpolation should succeed");

        let error = FailingRenderer
            .render_comparison(CurveComparison {
                raw: &raw,
                interpolated: &interpolated,
            })
            .expect_err("renderer should fail");
        assert_eq!(error.message(), "no display attached");
        assert_eq!(
            error.to_string(),
            "failed to render curve comparison: no display attached"
        );
    }
}
