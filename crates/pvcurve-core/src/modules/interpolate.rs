use super::traits::{CurveComparison, CurveRenderer};
use crate::common::InterpolationConfig;
use crate::domain::{CurveQuantity, InterpolatedCurve, IvCurve, PvError, PvResult};
use crate::numerics::{InterpolationKernel, linspace};

/// Resamples `curve` onto `config.num_points` evenly spaced voltages spanning its domain.
pub fn interpolate_curve(
    curve: &IvCurve,
    config: &InterpolationConfig,
) -> PvResult<InterpolatedCurve> {
    if config.num_points < 2 {
        return Err(PvError::invalid_input(
            "INPUT.NUM_POINTS",
            format!(
                "interpolation needs at least 2 output points, got {}",
                config.num_points
            ),
        ));
    }

    let required = config.kind.min_points();
    if curve.len() < required {
        return Err(PvError::insufficient_data(
            format!("{} interpolation", config.kind),
            required,
            curve.len(),
        ));
    }

    let kernel = InterpolationKernel::fit(config.kind, curve.voltage(), curve.current())
        .map_err(|source| PvError::invalid_input("INPUT.INTERPOLATION", source.to_string()))?;

    let (start, end) = curve
        .domain()
        .ok_or_else(|| PvError::insufficient_data("interpolation", required, 0))?;
    let grid = linspace(start, end, config.num_points);
    let values: Vec<f64> = grid.iter().map(|voltage| kernel.evaluate(*voltage)).collect();

    tracing::debug!(
        kind = %config.kind,
        knots = curve.len(),
        num_points = config.num_points,
        start,
        end,
        "resampled IV curve"
    );

    Ok(InterpolatedCurve::new(
        IvCurve::from_sorted_parts(curve.quantity(), grid, values),
        config.kind,
    ))
}

/// Builds the curve from raw columns, interpolates it and, when a renderer is supplied,
/// hands it the raw-versus-interpolated comparison. Render failures are logged and ignored.
pub fn interpolate_iv_curve(
    quantity: CurveQuantity,
    voltage: &[f64],
    current: &[f64],
    config: &InterpolationConfig,
    renderer: Option<&dyn CurveRenderer>,
) -> PvResult<InterpolatedCurve> {
    let raw = IvCurve::from_samples(quantity, voltage, current)?;
    if raw.len() < voltage.len() {
        tracing::debug!(
            samples = voltage.len(),
            knots = raw.len(),
            "averaged samples sharing a voltage"
        );
    }

    let interpolated = interpolate_curve(&raw, config)?;

    if let Some(renderer) = renderer {
        let comparison = CurveComparison {
            raw: &raw,
            interpolated: &interpolated,
        };
        if let Err(error) = renderer.render_comparison(comparison) {
            tracing::warn!(
                %error,
                quantity = quantity.label(),
                "curve comparison was not rendered"
            );
        }
    }

    Ok(interpolated)
}
