use serde::Serialize;

use crate::common::ResistanceConfig;
use crate::domain::{CurveQuantity, IvCurve, PvError, PvResult, ResistancePair};
use crate::numerics::{LinearFit, fit_linear};

const SHUNT: &str = "shunt";
const SERIES: &str = "series";

/// Linear regression of current (A) on voltage (V) over one voltage window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionFit {
    pub region: &'static str,
    /// Inclusive window bound in V; upper bound for the shunt window, lower for the series one.
    pub limit: f64,
    pub fit: LinearFit,
    /// |1 / slope| in ohm.
    pub resistance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResistanceEstimate {
    pub series: RegionFit,
    pub shunt: RegionFit,
}

impl ResistanceEstimate {
    pub fn pair(&self) -> ResistancePair {
        ResistancePair {
            rs: self.series.resistance,
            rsh: self.shunt.resistance,
        }
    }
}

/// Shunt resistance from the points with `V <= config.low_voltage_limit`.
pub fn shunt_resistance(curve: &IvCurve, config: &ResistanceConfig) -> PvResult<RegionFit> {
    let limit = config.low_voltage_limit;
    fit_region(curve, SHUNT, "<=", limit, config.min_slope, |voltage| {
        voltage <= limit
    })
}

/// Series resistance from the points with `V >= high_voltage_limit`. The limit is already
/// resolved (see [`ResistanceConfig::effective_high_voltage_limit`]).
pub fn series_resistance(
    curve: &IvCurve,
    high_voltage_limit: f64,
    config: &ResistanceConfig,
) -> PvResult<RegionFit> {
    fit_region(
        curve,
        SERIES,
        ">=",
        high_voltage_limit,
        config.min_slope,
        |voltage| voltage >= high_voltage_limit,
    )
}

pub fn estimate_resistances(
    curve: &IvCurve,
    high_voltage_limit: f64,
    config: &ResistanceConfig,
) -> PvResult<ResistanceEstimate> {
    let shunt = shunt_resistance(curve, config)?;
    let series = series_resistance(curve, high_voltage_limit, config)?;

    tracing::debug!(
        rs = series.resistance,
        rs_points = series.fit.point_count,
        rsh = shunt.resistance,
        rsh_points = shunt.fit.point_count,
        "estimated parasitic resistances"
    );

    Ok(ResistanceEstimate { series, shunt })
}

fn fit_region(
    curve: &IvCurve,
    region: &'static str,
    bound: &'static str,
    limit: f64,
    min_slope: f64,
    in_window: impl Fn(f64) -> bool,
) -> PvResult<RegionFit> {
    if curve.quantity() != CurveQuantity::Current {
        return Err(PvError::invalid_input(
            "INPUT.CURVE_QUANTITY",
            format!(
                "resistance estimation needs an absolute current curve, got {}",
                curve.quantity().label()
            ),
        ));
    }

    let (voltage, current_a): (Vec<f64>, Vec<f64>) = curve
        .points()
        .filter(|(voltage, _)| in_window(*voltage))
        .map(|(voltage, current_ma)| (voltage, current_ma / 1000.0))
        .unzip();

    if voltage.len() < 2 {
        return Err(PvError::InsufficientRange {
            region,
            bound,
            limit,
            actual: voltage.len(),
        });
    }

    let fit = fit_linear(&voltage, &current_a).ok_or_else(|| {
        PvError::degenerate_region(region, "all points in the window share one voltage")
    })?;
    if !fit.slope.is_finite() || fit.slope.abs() < min_slope {
        return Err(PvError::degenerate_region(
            region,
            format!(
                "slope {:e} A/V is below {min_slope:e} A/V; the resistance is unbounded",
                fit.slope
            ),
        ));
    }

    Ok(RegionFit {
        region,
        limit,
        fit,
        resistance: (1.0 / fit.slope).abs(),
    })
}
