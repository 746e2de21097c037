use crate::common::UnitConfig;
use crate::domain::{CurrentUnit, IvPoint, PvError, PvResult};

/// Columns in canonical units: V, mA and mA/cm².
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumns {
    pub voltage: Vec<f64>,
    /// `None` when the input was an areal unit and no cell area was given.
    pub current_ma: Option<Vec<f64>>,
    pub current_density: Vec<f64>,
}

impl NormalizedColumns {
    pub fn len(&self) -> usize {
        self.voltage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }

    pub fn points(&self) -> Vec<IvPoint> {
        (0..self.len())
            .map(|index| IvPoint {
                voltage: self.voltage[index],
                current: self.current_ma.as_ref().map(|current| current[index]),
                current_density: self.current_density[index],
            })
            .collect()
    }
}

pub fn normalize_columns(
    voltage: &[f64],
    current: &[f64],
    units: &UnitConfig,
) -> PvResult<NormalizedColumns> {
    if voltage.len() != current.len() {
        return Err(PvError::invalid_input(
            "INPUT.LENGTH_MISMATCH",
            format!(
                "voltage and current columns differ in length: voltage={}, current={}",
                voltage.len(),
                current.len()
            ),
        ));
    }

    let area = match units.area_cm2 {
        Some(area) if !area.is_finite() || area <= 0.0 => {
            return Err(PvError::invalid_input(
                "INPUT.AREA",
                format!("cell area must be finite and > 0 cm², got {area}"),
            ));
        }
        area => area,
    };

    let voltage: Vec<f64> = voltage
        .iter()
        .map(|value| units.voltage_unit.to_volts(*value))
        .collect();
    let scale = units.current_unit.milli_scale();
    let scaled: Vec<f64> = current.iter().map(|value| value * scale).collect();

    let (current_ma, current_density) = if units.current_unit.is_areal() {
        let current_ma = area.map(|area| scaled.iter().map(|density| density * area).collect());
        (current_ma, scaled)
    } else {
        let Some(area) = area else {
            return Err(missing_area(units.current_unit));
        };
        let density = scaled.iter().map(|current| current / area).collect();
        (Some(scaled), density)
    };

    Ok(NormalizedColumns {
        voltage,
        current_ma,
        current_density,
    })
}

fn missing_area(unit: CurrentUnit) -> PvError {
    PvError::missing_parameter(
        "area",
        format!(
            "current density cannot be derived from absolute current in '{unit}' \
             without a cell area"
        ),
    )
}
