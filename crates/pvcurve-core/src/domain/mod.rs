pub mod errors;

pub use errors::{PvError, PvErrorCategory, PvResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStage {
    Read,
    Normalize,
    Interpolate,
    Extract,
    Resistance,
}

impl AnalysisStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Normalize => "NORMALIZE",
            Self::Interpolate => "INTERPOLATE",
            Self::Extract => "EXTRACT",
            Self::Resistance => "RESISTANCE",
        }
    }
}

impl Display for AnalysisStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VoltageUnit {
    #[default]
    #[serde(rename = "V")]
    Volt,
    #[serde(rename = "mV")]
    Millivolt,
}

impl VoltageUnit {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Volt => "V",
            Self::Millivolt => "mV",
        }
    }

    pub fn to_volts(self, value: f64) -> f64 {
        match self {
            Self::Volt => value,
            Self::Millivolt => value / 1000.0,
        }
    }

    pub fn from_volts(self, volts: f64) -> f64 {
        match self {
            Self::Volt => volts,
            Self::Millivolt => volts * 1000.0,
        }
    }
}

impl Display for VoltageUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for VoltageUnit {
    type Err = PvError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim() {
            "V" => Ok(Self::Volt),
            "mV" => Ok(Self::Millivolt),
            other => Err(PvError::invalid_input(
                "INPUT.VOLTAGE_UNIT",
                format!("unsupported voltage unit '{other}'; use 'V' or 'mV'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurrentUnit {
    #[serde(rename = "A")]
    Ampere,
    #[default]
    #[serde(rename = "mA")]
    Milliampere,
    #[serde(rename = "A/cm2")]
    AmperePerCm2,
    #[serde(rename = "mA/cm2")]
    MilliamperePerCm2,
}

impl CurrentUnit {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ampere => "A",
            Self::Milliampere => "mA",
            Self::AmperePerCm2 => "A/cm2",
            Self::MilliamperePerCm2 => "mA/cm2",
        }
    }

    /// Areal units already describe a current density.
    pub const fn is_areal(self) -> bool {
        matches!(self, Self::AmperePerCm2 | Self::MilliamperePerCm2)
    }

    /// Factor taking a value in this unit to mA (absolute units) or mA/cm² (areal units).
    pub const fn milli_scale(self) -> f64 {
        match self {
            Self::Ampere | Self::AmperePerCm2 => 1000.0,
            Self::Milliampere | Self::MilliamperePerCm2 => 1.0,
        }
    }
}

impl Display for CurrentUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for CurrentUnit {
    type Err = PvError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim() {
            "A" => Ok(Self::Ampere),
            "mA" => Ok(Self::Milliampere),
            "A/cm2" | "A/cm²" => Ok(Self::AmperePerCm2),
            "mA/cm2" | "mA/cm²" => Ok(Self::MilliamperePerCm2),
            other => Err(PvError::invalid_input(
                "INPUT.CURRENT_UNIT",
                format!("unsupported current unit '{other}'; use 'A', 'mA', 'A/cm2' or 'mA/cm2'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationKind {
    #[default]
    Cubic,
    Linear,
    Nearest,
}

impl InterpolationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cubic => "cubic",
            Self::Linear => "linear",
            Self::Nearest => "nearest",
        }
    }

    /// Fewest distinct voltage knots the kernel can be fitted to.
    pub const fn min_points(self) -> usize {
        match self {
            Self::Cubic => 4,
            Self::Linear | Self::Nearest => 2,
        }
    }
}

impl Display for InterpolationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for InterpolationKind {
    type Err = PvError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "cubic" => Ok(Self::Cubic),
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            other => Err(PvError::invalid_input(
                "INPUT.INTERPOLATION_KIND",
                format!("unsupported interpolation kind '{other}'; use cubic, linear or nearest"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurveQuantity {
    /// Absolute current in mA.
    Current,
    /// Current density in mA/cm².
    CurrentDensity,
}

impl CurveQuantity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "Current (mA)",
            Self::CurrentDensity => "Current Density (mA/cm²)",
        }
    }
}

/// One normalized measurement sample. The absolute current is absent when the input was
/// given as a density and no cell area was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IvPoint {
    pub voltage: f64,
    pub current: Option<f64>,
    pub current_density: f64,
}

/// A (voltage, current) relation sorted by ascending voltage with unique voltages.
#[derive(Debug, Clone, PartialEq)]
pub struct IvCurve {
    quantity: CurveQuantity,
    voltage: Vec<f64>,
    current: Vec<f64>,
}

impl IvCurve {
    /// Builds a curve from raw samples in any order. Samples that share a voltage are
    /// averaged into a single knot so the result is a function of voltage.
    pub fn from_samples(
        quantity: CurveQuantity,
        voltage: &[f64],
        current: &[f64],
    ) -> PvResult<Self> {
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

        for (index, (v, i)) in voltage.iter().zip(current).enumerate() {
            if !v.is_finite() || !i.is_finite() {
                return Err(PvError::invalid_input(
                    "INPUT.NON_FINITE",
                    format!("sample {index} is not finite: V={v}, I={i}"),
                ));
            }
        }

        let mut order: Vec<usize> = (0..voltage.len()).collect();
        order.sort_by(|a, b| voltage[*a].total_cmp(&voltage[*b]));

        let mut knots_v: Vec<f64> = Vec::with_capacity(order.len());
        let mut knots_i: Vec<f64> = Vec::with_capacity(order.len());
        let mut start = 0;
        while start < order.len() {
            let v = voltage[order[start]];
            let mut end = start + 1;
            while end < order.len() && voltage[order[end]] == v {
                end += 1;
            }
            let group = &order[start..end];
            let mean = group.iter().map(|index| current[*index]).sum::<f64>() / group.len() as f64;
            knots_v.push(v);
            knots_i.push(mean);
            start = end;
        }

        Ok(Self {
            quantity,
            voltage: knots_v,
            current: knots_i,
        })
    }

    pub(crate) fn from_sorted_parts(
        quantity: CurveQuantity,
        voltage: Vec<f64>,
        current: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(voltage.len(), current.len());
        Self {
            quantity,
            voltage,
            current,
        }
    }

    pub fn quantity(&self) -> CurveQuantity {
        self.quantity
    }

    pub fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    pub fn current(&self) -> &[f64] {
        &self.current
    }

    pub fn len(&self) -> usize {
        self.voltage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }

    /// Closed voltage interval covered by the curve.
    pub fn domain(&self) -> Option<(f64, f64)> {
        Some((*self.voltage.first()?, *self.voltage.last()?))
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.voltage.iter().copied().zip(self.current.iter().copied())
    }
}

/// A curve resampled on a uniform voltage grid. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedCurve {
    curve: IvCurve,
    kind: InterpolationKind,
}

impl InterpolatedCurve {
    pub(crate) fn new(curve: IvCurve, kind: InterpolationKind) -> Self {
        Self { curve, kind }
    }

    pub fn kind(&self) -> InterpolationKind {
        self.kind
    }

    pub fn num_points(&self) -> usize {
        self.curve.len()
    }

    pub fn as_curve(&self) -> &IvCurve {
        &self.curve
    }

    pub fn quantity(&self) -> CurveQuantity {
        self.curve.quantity()
    }

    pub fn voltage(&self) -> &[f64] {
        self.curve.voltage()
    }

    pub fn current(&self) -> &[f64] {
        self.curve.current()
    }

    pub fn step(&self) -> f64 {
        match self.curve.domain() {
            Some((start, end)) if self.num_points() > 1 => {
                (end - start) / (self.num_points() - 1) as f64
            }
            _ => 0.0,
        }
    }
}

/// A grid location on an extracted curve. `index` is `None` when the value was
/// extrapolated beyond the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperatingPoint {
    pub index: Option<usize>,
    pub voltage: f64,
    pub current_density: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedParameters {
    /// |Jsc| in mA/cm².
    pub jsc: f64,
    /// Voc in V.
    pub voc: f64,
    pub ff: f64,
    /// Percent.
    pub pce: f64,
    pub vmp: f64,
    /// |J| at the maximum-power point, mA/cm².
    pub jmp: f64,
    /// Maximum delivered power density, mW/cm².
    pub pmax: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResistancePair {
    /// Series resistance, ohm.
    pub rs: f64,
    /// Shunt resistance, ohm.
    pub rsh: f64,
}
