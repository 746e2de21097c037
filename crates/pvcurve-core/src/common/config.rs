//! Analysis configuration.
//!
//! Every tunable of a run lives in [`AnalysisConfig`] and is passed explicitly into each
//! operation. The structure deserializes from JSON with per-field defaults so a config file
//! only has to name the values it changes.

use crate::domain::{CurrentUnit, InterpolationKind, VoltageUnit};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_VOLTAGE_COLUMN: &str = "Voltage (V)";
pub const DEFAULT_CURRENT_COLUMN: &str = "Current (mA)";
pub const DEFAULT_NUM_POINTS: usize = 1500;
pub const DEFAULT_INCIDENT_POWER_MW_CM2: f64 = 100.0;
pub const DEFAULT_LOW_VOLTAGE_LIMIT: f64 = 0.1;
pub const DEFAULT_HIGH_VOLTAGE_LIMIT: f64 = 0.9;
pub const DEFAULT_MIN_SLOPE: f64 = 1.0e-12;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub reader: ReaderConfig,
    pub units: UnitConfig,
    pub interpolation: InterpolationConfig,
    pub extraction: ExtractionConfig,
    pub resistance: ResistanceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReaderConfig {
    pub voltage_column: String,
    pub current_column: String,
    pub delimiter: char,
    pub decimal_separator: char,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            voltage_column: DEFAULT_VOLTAGE_COLUMN.to_string(),
            current_column: DEFAULT_CURRENT_COLUMN.to_string(),
            delimiter: ',',
            decimal_separator: '.',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnitConfig {
    pub voltage_unit: VoltageUnit,
    pub current_unit: CurrentUnit,
    /// Cell area in cm².
    pub area_cm2: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterpolationConfig {
    pub num_points: usize,
    pub kind: InterpolationKind,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            num_points: DEFAULT_NUM_POINTS,
            kind: InterpolationKind::Cubic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractionConfig {
    /// Incident light power in mW/cm².
    pub incident_power_mw_cm2: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            incident_power_mw_cm2: DEFAULT_INCIDENT_POWER_MW_CM2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResistanceConfig {
    pub enabled: bool,
    /// Upper voltage bound (V) of the shunt-resistance window.
    pub low_voltage_limit: f64,
    /// Lower bound of the series-resistance window: a fraction of Voc when
    /// `high_limit_relative_to_voc` is set, volts otherwise.
    pub high_voltage_limit: f64,
    pub high_limit_relative_to_voc: bool,
    /// Slopes (A/V) smaller than this in magnitude are treated as flat.
    pub min_slope: f64,
}

impl Default for ResistanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            low_voltage_limit: DEFAULT_LOW_VOLTAGE_LIMIT,
            high_voltage_limit: DEFAULT_HIGH_VOLTAGE_LIMIT,
            high_limit_relative_to_voc: true,
            min_slope: DEFAULT_MIN_SLOPE,
        }
    }
}

impl ResistanceConfig {
    pub fn effective_high_voltage_limit(&self, voc: f64) -> f64 {
        if self.high_limit_relative_to_voc {
            self.high_voltage_limit * voc
        } else {
            self.high_voltage_limit
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisConfigError {
    #[error("failed to read analysis config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse analysis config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_analysis_config(
    config_path: impl AsRef<Path>,
) -> Result<AnalysisConfig, AnalysisConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| AnalysisConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| AnalysisConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{AnalysisConfig, AnalysisConfigError, load_analysis_config};
    use crate::domain::{CurrentUnit, InterpolationKind, VoltageUnit};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_reference_script() {
        let config = AnalysisConfig::default();
        assert_eq!(config.reader.voltage_column, "Voltage (V)");
        assert_eq!(config.reader.current_column, "Current (mA)");
        assert_eq!(config.reader.delimiter, ',');
        assert_eq!(config.reader.decimal_separator, '.');
        assert_eq!(config.units.voltage_unit, VoltageUnit::Volt);
        assert_eq!(config.units.current_unit, CurrentUnit::Milliampere);
        assert_eq!(config.units.area_cm2, None);
        assert_eq!(config.interpolation.num_points, 1500);
        assert_eq!(config.interpolation.kind, InterpolationKind::Cubic);
        assert_eq!(config.extraction.incident_power_mw_cm2, 100.0);
        assert!(config.resistance.enabled);
        assert_eq!(config.resistance.low_voltage_limit, 0.1);
        assert_eq!(config.resistance.high_voltage_limit, 0.9);
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config: AnalysisConfig = serde_json::from_str(
            r#"
            {
              "reader": { "delimiter": ";", "decimalSeparator": "," },
              "units": { "currentUnit": "A", "areaCm2": 0.01 },
              "interpolation": { "kind": "linear" }
            }
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.reader.delimiter, ';');
        assert_eq!(config.reader.decimal_separator, ',');
        assert_eq!(config.reader.voltage_column, "Voltage (V)");
        assert_eq!(config.units.current_unit, CurrentUnit::Ampere);
        assert_eq!(config.units.area_cm2, Some(0.01));
        assert_eq!(config.interpolation.kind, InterpolationKind::Linear);
        assert_eq!(config.interpolation.num_points, 1500);
        assert_eq!(config.resistance.min_slope, 1.0e-12);
    }

    #[test]
    fn high_limit_scales_with_voc_only_when_relative() {
        let mut config = AnalysisConfig::default().resistance;
        assert!((config.effective_high_voltage_limit(0.6) - 0.54).abs() < 1.0e-12);

        config.high_limit_relative_to_voc = false;
        assert_eq!(config.effective_high_voltage_limit(0.6), 0.9);
    }

    #[test]
    fn loader_reports_read_and_parse_failures() {
        let temp = TempDir::new().expect("tempdir should be created");
        let missing = temp.path().join("missing.json");
        assert!(matches!(
            load_analysis_config(&missing),
            Err(AnalysisConfigError::Read { .. })
        ));

        let broken = temp.path().join("broken.json");
        fs::write(&broken, "{ \"units\": { \"voltageUnit\": \"kV\" } }").expect("write config");
        let error = load_analysis_config(&broken).expect_err("kV is not a voltage unit");
        assert!(matches!(error, AnalysisConfigError::Parse { .. }));
        assert!(error.to_string().contains("broken.json"));

        let valid = temp.path().join("valid.json");
        fs::write(&valid, "{ \"extraction\": { \"incidentPowerMwCm2\": 50.0 } }")
            .expect("write config");
        let config = load_analysis_config(&valid).expect("valid config should load");
        assert_eq!(config.extraction.incident_power_mw_cm2, 50.0);
    }
}
