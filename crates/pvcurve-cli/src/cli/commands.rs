use super::CliError;
use super::helpers::{load_config_file, parse_separator, render_human_summary};
use super::plot::SvgCurveRenderer;
use anyhow::Context;
use pvcurve_core::common::AnalysisConfig;
use pvcurve_core::domain::{CurrentUnit, InterpolationKind, VoltageUnit};
use pvcurve_core::modules::{CurveRenderer, analyze_file};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct AnalyzeArgs {
    /// Delimited IV table with a header row
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// JSON analysis config; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Header of the voltage column
    #[arg(long)]
    voltage_column: Option<String>,

    /// Header of the current column
    #[arg(long)]
    current_column: Option<String>,

    /// Voltage unit: V or mV
    #[arg(long)]
    voltage_unit: Option<VoltageUnit>,

    /// Current unit: A, mA, A/cm2 or mA/cm2
    #[arg(long)]
    current_unit: Option<CurrentUnit>,

    /// Cell area in cm²
    #[arg(long, value_name = "CM2")]
    area: Option<f64>,

    /// Field delimiter (single character, or "tab")
    #[arg(long, value_parser = parse_separator)]
    delimiter: Option<char>,

    /// Decimal separator
    #[arg(long, value_parser = parse_separator)]
    decimal: Option<char>,

    /// Number of interpolated points
    #[arg(long, value_name = "N")]
    points: Option<usize>,

    /// Interpolation kernel: cubic, linear or nearest
    #[arg(long)]
    kind: Option<InterpolationKind>,

    /// Incident light power in mW/cm²
    #[arg(long, value_name = "MW_CM2")]
    incident_power: Option<f64>,

    /// Upper voltage bound of the shunt-resistance window
    #[arg(long, value_name = "V")]
    low_voltage_limit: Option<f64>,

    /// Lower bound of the series-resistance window, as a fraction of Voc
    #[arg(long, value_name = "LIMIT")]
    high_voltage_limit: Option<f64>,

    /// Read --high-voltage-limit as volts instead of a fraction of Voc
    #[arg(long)]
    absolute_high_limit: bool,

    /// Do not estimate Rs and Rsh
    #[arg(long)]
    skip_resistances: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Write an SVG of raw versus interpolated current density
    #[arg(long, value_name = "FILE.svg")]
    plot: Option<PathBuf>,
}

impl AnalyzeArgs {
    fn resolve_config(&self) -> Result<AnalysisConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(column) = &self.voltage_column {
            config.reader.voltage_column = column.clone();
        }
        if let Some(column) = &self.current_column {
            config.reader.current_column = column.clone();
        }
        if let Some(delimiter) = self.delimiter {
            config.reader.delimiter = delimiter;
        }
        if let Some(decimal) = self.decimal {
            config.reader.decimal_separator = decimal;
        }
        if let Some(unit) = self.voltage_unit {
            config.units.voltage_unit = unit;
        }
        if let Some(unit) = self.current_unit {
            config.units.current_unit = unit;
        }
        if self.area.is_some() {
            config.units.area_cm2 = self.area;
        }
        if let Some(points) = self.points {
            config.interpolation.num_points = points;
        }
        if let Some(kind) = self.kind {
            config.interpolation.kind = kind;
        }
        if let Some(power) = self.incident_power {
            config.extraction.incident_power_mw_cm2 = power;
        }
        if let Some(limit) = self.low_voltage_limit {
            config.resistance.low_voltage_limit = limit;
        }
        if let Some(limit) = self.high_voltage_limit {
            config.resistance.high_voltage_limit = limit;
        }
        if self.absolute_high_limit {
            config.resistance.high_limit_relative_to_voc = false;
        }
        if self.skip_resistances {
            config.resistance.enabled = false;
        }

        Ok(config)
    }
}

pub(super) fn run_analyze_command(args: AnalyzeArgs) -> Result<i32, CliError> {
    let config = args.resolve_config()?;
    let renderer = args.plot.as_ref().map(SvgCurveRenderer::new);
    let renderer = renderer
        .as_ref()
        .map(|renderer| renderer as &dyn CurveRenderer);

    let report = analyze_file(&args.input, &config, renderer)?;

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("failed to serialize analysis report")?;
        println!("{rendered}");
    } else {
        print!("{}", render_human_summary(&report));
    }
    Ok(0)
}

pub(super) fn run_config_command() -> Result<i32, CliError> {
    let rendered = serde_json::to_string_pretty(&AnalysisConfig::default())
        .context("failed to serialize default analysis config")?;
    println!("{rendered}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::AnalyzeArgs;
    use clap::Parser;
    use pvcurve_core::domain::{CurrentUnit, InterpolationKind, VoltageUnit};
    use std::fs;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: AnalyzeArgs,
    }

    fn parse(args: &[&str]) -> AnalyzeArgs {
        Harness::try_parse_from(std::iter::once("pvcurve").chain(args.iter().copied()))
            .expect("arguments should parse")
            .args
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "cell.csv",
            "--voltage-unit",
            "mV",
            "--current-unit",
            "mA/cm2",
            "--delimiter",
            "tab",
            "--decimal",
            ",",
            "--kind",
            "Linear",
            "--points",
            "300",
            "--high-voltage-limit",
            "0.7",
            "--absolute-high-limit",
            "--skip-resistances",
        ])
        .resolve_config()
        .expect("config");

        assert_eq!(config.units.voltage_unit, VoltageUnit::Millivolt);
        assert_eq!(config.units.current_unit, CurrentUnit::MilliamperePerCm2);
        assert_eq!(config.reader.delimiter, '\t');
        assert_eq!(config.reader.decimal_separator, ',');
        assert_eq!(config.interpolation.kind, InterpolationKind::Linear);
        assert_eq!(config.interpolation.num_points, 300);
        assert_eq!(config.resistance.high_voltage_limit, 0.7);
        assert!(!config.resistance.high_limit_relative_to_voc);
        assert!(!config.resistance.enabled);
    }

    #[test]
    fn flags_override_config_file_values() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("analysis.json");
        fs::write(
            &path,
            r#"{ "units": { "areaCm2": 0.5, "currentUnit": "A" }, "extraction": { "incidentPowerMwCm2": 80.0 } }"#,
        )
        .expect("config should be written");

        let config = parse(&[
            "cell.csv",
            "--config",
            path.to_str().expect("utf-8 temp path"),
            "--area",
            "0.25",
        ])
        .resolve_config()
        .expect("config");

        assert_eq!(config.units.area_cm2, Some(0.25));
        assert_eq!(config.units.current_unit, CurrentUnit::Ampere);
        assert_eq!(config.extraction.incident_power_mw_cm2, 80.0);
        assert_eq!(config.interpolation.num_points, 1500);
    }

    #[test]
    fn unknown_units_are_rejected_by_the_parser() {
        let result = Harness::try_parse_from(["pvcurve", "cell.csv", "--voltage-unit", "kV"]);
        assert!(result.is_err());
    }
}
