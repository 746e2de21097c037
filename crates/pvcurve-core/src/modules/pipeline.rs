use std::path::Path;

use serde::Serialize;

use super::extract::extract_parameters;
use super::interpolate::interpolate_iv_curve;
use super::reader::{RawIvTable, read_iv_table};
use super::resistance::{ResistanceEstimate, estimate_resistances};
use super::traits::CurveRenderer;
use super::units::normalize_columns;
use crate::common::AnalysisConfig;
use crate::domain::{
    AnalysisStage, CurveQuantity, ExtractedParameters, IvPoint, PvError, PvResult,
};

/// Everything one analysis run produces, ready to print or serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub source: String,
    pub points_read: usize,
    /// Input samples after unit normalization, in file order.
    pub samples: Vec<IvPoint>,
    pub parameters: ExtractedParameters,
    pub resistances: Option<ResistanceEstimate>,
    pub config: AnalysisConfig,
}

pub fn analyze_file(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
    renderer: Option<&dyn CurveRenderer>,
) -> PvResult<AnalysisReport> {
    let path = path.as_ref();
    tracing::debug!(stage = %AnalysisStage::Read, path = %path.display());
    let table = read_iv_table(path, &config.reader)?;

    let mut report = analyze_table(&table, config, renderer)?;
    report.source = path.display().to_string();
    Ok(report)
}

/// Runs normalization, interpolation, parameter extraction and, when enabled, resistance
/// estimation on an already parsed table. The first failure aborts the run.
pub fn analyze_table(
    table: &RawIvTable,
    config: &AnalysisConfig,
    renderer: Option<&dyn CurveRenderer>,
) -> PvResult<AnalysisReport> {
    tracing::debug!(
        stage = %AnalysisStage::Normalize,
        rows = table.len(),
        voltage_unit = %config.units.voltage_unit,
        current_unit = %config.units.current_unit,
        area_cm2 = ?config.units.area_cm2
    );
    let columns = normalize_columns(&table.voltage, &table.current, &config.units)?;

    tracing::debug!(
        stage = %AnalysisStage::Interpolate,
        kind = %config.interpolation.kind,
        num_points = config.interpolation.num_points
    );
    let density = interpolate_iv_curve(
        CurveQuantity::CurrentDensity,
        &columns.voltage,
        &columns.current_density,
        &config.interpolation,
        renderer,
    )?;

    tracing::debug!(stage = %AnalysisStage::Extract, step = density.step());
    let parameters = extract_parameters(&density, &config.extraction)?;

    let resistances = if config.resistance.enabled {
        let current_ma = columns.current_ma.as_deref().ok_or_else(|| {
            PvError::missing_parameter(
                "area",
                "resistance estimation needs absolute current; give the cell area or skip resistances",
            )
        })?;
        let current = interpolate_iv_curve(
            CurveQuantity::Current,
            &columns.voltage,
            current_ma,
            &config.interpolation,
            None,
        )?;
        let high_voltage_limit = config
            .resistance
            .effective_high_voltage_limit(parameters.voc);
        tracing::debug!(
            stage = %AnalysisStage::Resistance,
            low_voltage_limit = config.resistance.low_voltage_limit,
            high_voltage_limit
        );
        Some(estimate_resistances(
            current.as_curve(),
            high_voltage_limit,
            &config.resistance,
        )?)
    } else {
        tracing::debug!(stage = %AnalysisStage::Resistance, "resistance estimation disabled");
        None
    };

    tracing::info!(
        points = table.len(),
        jsc = parameters.jsc,
        voc = parameters.voc,
        ff = parameters.ff,
        pce = parameters.pce,
        rs = resistances.map(|estimate| estimate.pair().rs),
        rsh = resistances.map(|estimate| estimate.pair().rsh),
        "analysis complete"
    );

    Ok(AnalysisReport {
        source: "<inline>".to_string(),
        points_read: table.len(),
        samples: columns.points(),
        parameters,
        resistances,
        config: config.clone(),
    })
}
