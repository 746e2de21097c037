use plotters::prelude::*;
use pvcurve_core::modules::{CurveComparison, CurveRenderer, RenderError};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub(super) struct PlotStyle {
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) line: RGBColor,
    pub(super) marker: RGBColor,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            line: BLUE,
            marker: RED,
        }
    }
}

/// Writes the raw-versus-interpolated comparison to an SVG file.
pub(super) struct SvgCurveRenderer {
    path: PathBuf,
    style: PlotStyle,
}

impl SvgCurveRenderer {
    pub(super) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            style: PlotStyle::default(),
        }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }
}

impl CurveRenderer for SvgCurveRenderer {
    fn render_comparison(&self, comparison: CurveComparison<'_>) -> Result<(), RenderError> {
        let svg = render_comparison_svg(comparison, &self.style)?;
        fs::write(self.path(), svg).map_err(|source| {
            RenderError::new(format!("failed to write '{}': {source}", self.path.display()))
        })?;
        tracing::info!(path = %self.path.display(), "wrote curve comparison plot");
        Ok(())
    }
}

fn render_comparison_svg(
    comparison: CurveComparison<'_>,
    style: &PlotStyle,
) -> Result<String, RenderError> {
    let raw = comparison.raw;
    let interpolated = comparison.interpolated;
    let (x_min, x_max) = raw
        .domain()
        .ok_or_else(|| RenderError::new("raw curve has no samples"))?;
    let (y_min, y_max) = raw
        .current()
        .iter()
        .chain(interpolated.current())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
            (low.min(*value), high.max(*value))
        });
    let (x_low, x_high) = padded(x_min, x_max);
    let (y_low, y_high) = padded(y_min, y_max);

    let label = raw.quantity().label();
    let kind = interpolated.kind();
    let line = style.line;
    let marker = style.marker;

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(format!("{label} vs Voltage"), ("sans-serif", 20))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 45)
            .build_cartesian_2d(x_low..x_high, y_low..y_high)
            .map_err(drawing_error)?;
        chart
            .configure_mesh()
            .x_desc("Voltage (V)")
            .y_desc(label)
            .light_line_style(&BLACK.mix(0.05))
            .draw()
            .map_err(drawing_error)?;

        let series = interpolated
            .voltage()
            .iter()
            .copied()
            .zip(interpolated.current().iter().copied());
        chart
            .draw_series(LineSeries::new(series, &line))
            .map_err(drawing_error)?
            .label(format!("Interpolated ({kind})"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &line));
        chart
            .draw_series(
                raw.points()
                    .map(|point| Circle::new(point, 3, marker.filled())),
            )
            .map_err(drawing_error)?
            .label("Raw data")
            .legend(move |(x, y)| Circle::new((x + 10, y), 3, marker.filled()));

        chart
            .configure_series_labels()
            .border_style(&BLACK.mix(0.3))
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(drawing_error)?;
        root.present().map_err(drawing_error)?;
    }
    Ok(svg)
}

fn padded(low: f64, high: f64) -> (f64, f64) {
    if high > low {
        let margin = 0.05 * (high - low);
        (low - margin, high + margin)
    } else {
        (low - 1.0, high + 1.0)
    }
}

fn drawing_error<E>(error: DrawingAreaErrorKind<E>) -> RenderError
where
    E: std::error::Error + Send + Sync,
{
    RenderError::new(error.to_string())
}
