use crate::common::ExtractionConfig;
use crate::domain::{
    CurveQuantity, ExtractedParameters, InterpolatedCurve, OperatingPoint, PvError, PvResult,
};
use crate::numerics::nearest_index;

/// Current density at V = 0. The grid point nearest zero is used; when zero lies outside the
/// grid the value is extrapolated linearly from the two closest end points.
pub fn short_circuit_point(curve: &InterpolatedCurve) -> PvResult<OperatingPoint> {
    let (voltage, density) = density_columns(curve)?;
    let (start, end) = (voltage[0], voltage[voltage.len() - 1]);

    if start <= 0.0 && 0.0 <= end {
        let index = nearest_index(voltage, 0.0).unwrap_or(0);
        return Ok(OperatingPoint {
            index: Some(index),
            voltage: voltage[index],
            current_density: density[index],
        });
    }

    let last = voltage.len() - 1;
    let (a, b) = if start > 0.0 { (0, 1) } else { (last - 1, last) };
    let slope = (density[b] - density[a]) / (voltage[b] - voltage[a]);
    let current_density = density[a] - slope * voltage[a];
    tracing::warn!(
        start,
        end,
        jsc = current_density,
        "V = 0 lies outside the measured range; short-circuit current density is extrapolated"
    );

    Ok(OperatingPoint {
        index: None,
        voltage: 0.0,
        current_density,
    })
}

/// Voltage where the current density first changes sign, scanning toward higher voltage from
/// the short-circuit point. Without a crossing the point of minimum |J| is used.
pub fn open_circuit_point(
    curve: &InterpolatedCurve,
    short_circuit: &OperatingPoint,
) -> PvResult<OperatingPoint> {
    let (voltage, density) = density_columns(curve)?;
    let start = short_circuit
        .index
        .or_else(|| nearest_index(voltage, 0.0))
        .unwrap_or(0);

    let index = first_crossing(density, start).unwrap_or_else(|| {
        let fallback = (start..density.len())
            .min_by(|a, b| density[*a].abs().total_cmp(&density[*b].abs()))
            .unwrap_or(start);
        tracing::warn!(
            voltage = voltage[fallback],
            current_density = density[fallback],
            "current density never changes sign; using the point of minimum |J| as Voc"
        );
        fallback
    });

    if voltage[index] == 0.0 {
        return Err(PvError::degenerate_curve(
            "open-circuit voltage is zero; the curve does not generate power",
        ));
    }

    Ok(OperatingPoint {
        index: Some(index),
        voltage: voltage[index],
        current_density: density[index],
    })
}

fn first_crossing(density: &[f64], start: usize) -> Option<usize> {
    if density.get(start).copied() == Some(0.0) {
        return Some(start);
    }
    (start..density.len().saturating_sub(1)).find_map(|index| {
        let (here, next) = (density[index], density[index + 1]);
        if next == 0.0 {
            Some(index + 1)
        } else if here * next < 0.0 {
            Some(if next.abs() < here.abs() { index + 1 } else { index })
        } else {
            None
        }
    })
}

/// Grid point of maximum |V·J| inside the power-generating window between 0 and `voc`.
pub fn max_power_point(curve: &InterpolatedCurve, voc: f64) -> PvResult<OperatingPoint> {
    let (voltage, density) = density_columns(curve)?;
    let (low, high) = if voc >= 0.0 { (0.0, voc) } else { (voc, 0.0) };

    let index = (0..voltage.len())
        .filter(|index| (low..=high).contains(&voltage[*index]))
        .fold(None, |best: Option<(usize, f64)>, index| {
            let power = (voltage[index] * density[index]).abs();
            match best {
                Some((_, best_power)) if best_power >= power => best,
                _ => Some((index, power)),
            }
        })
        .map(|(index, _)| index)
        .ok_or_else(|| {
            PvError::degenerate_curve(format!(
                "no grid point lies in the power-generating window [{low}, {high}] V"
            ))
        })?;

    Ok(OperatingPoint {
        index: Some(index),
        voltage: voltage[index],
        current_density: density[index],
    })
}

/// `pmax / (|jsc| · |voc|)`.
pub fn fill_factor(pmax: f64, jsc: f64, voc: f64) -> PvResult<f64> {
    if jsc == 0.0 {
        return Err(PvError::degenerate_curve("short-circuit current density is zero"));
    }
    if voc == 0.0 {
        return Err(PvError::degenerate_curve("open-circuit voltage is zero"));
    }
    Ok(pmax.abs() / (jsc.abs() * voc.abs()))
}

/// Efficiency in percent for an incident power density in mW/cm².
pub fn power_conversion_efficiency(
    ff: f64,
    jsc: f64,
    voc: f64,
    incident_power: f64,
) -> PvResult<f64> {
    if !incident_power.is_finite() || incident_power <= 0.0 {
        return Err(PvError::invalid_input(
            "INPUT.INCIDENT_POWER",
            format!("incident power must be finite and > 0 mW/cm², got {incident_power}"),
        ));
    }
    Ok((ff * voc * jsc / incident_power).abs() * 100.0)
}

pub fn extract_parameters(
    curve: &InterpolatedCurve,
    config: &ExtractionConfig,
) -> PvResult<ExtractedParameters> {
    let short_circuit = short_circuit_point(curve)?;
    let open_circuit = open_circuit_point(curve, &short_circuit)?;
    let max_power = max_power_point(curve, open_circuit.voltage)?;

    let jsc = short_circuit.current_density;
    let voc = open_circuit.voltage;
    let pmax = (max_power.voltage * max_power.current_density).abs();
    let ff = fill_factor(pmax, jsc, voc)?;
    let pce = power_conversion_efficiency(ff, jsc, voc, config.incident_power_mw_cm2)?;

    tracing::debug!(
        jsc,
        voc,
        vmp = max_power.voltage,
        jmp = max_power.current_density,
        pmax,
        ff,
        pce,
        "extracted photovoltaic parameters"
    );

    Ok(ExtractedParameters {
        jsc: jsc.abs(),
        voc,
        ff,
        pce,
        vmp: max_power.voltage,
        jmp: max_power.current_density.abs(),
        pmax,
    })
}

fn density_columns(curve: &InterpolatedCurve) -> PvResult<(&[f64], &[f64])> {
    if curve.quantity() != CurveQuantity::CurrentDensity {
        return Err(PvError::invalid_input(
            "INPUT.CURVE_QUANTITY",
            format!(
                "parameter extraction needs a current density curve, got {}",
                curve.quantity().label()
            ),
        ));
    }
    if curve.num_points() < 2 {
        return Err(PvError::insufficient_data(
            "parameter extraction",
            2,
            curve.num_points(),
        ));
    }
    Ok((curve.voltage(), curve.current()))
}
