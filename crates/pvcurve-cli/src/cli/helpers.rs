use super::CliError;
use pvcurve_core::common::{AnalysisConfig, AnalysisConfigError, load_analysis_config};
use pvcurve_core::domain::PvError;
use pvcurve_core::modules::AnalysisReport;
use std::path::Path;

pub(super) fn load_config_file(path: &Path) -> Result<AnalysisConfig, CliError> {
    let config = load_analysis_config(path).map_err(|error| match error {
        AnalysisConfigError::Read { path, source } => PvError::Io {
            path,
            message: source.to_string(),
        },
        parse @ AnalysisConfigError::Parse { .. } => {
            PvError::invalid_input("INPUT.CONFIG", parse.to_string())
        }
    })?;
    tracing::info!(path = %path.display(), "loaded analysis config");
    Ok(config)
}

/// Accepts one character, or `tab` / `\t` for a tab.
pub(super) fn parse_separator(token: &str) -> Result<char, String> {
    match token {
        "tab" | "\\t" => Ok('\t'),
        _ => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(separator), None) => Ok(separator),
                _ => Err(format!("expected a single character, got '{token}'")),
            }
        }
    }
}

/// Six-line summary: Jsc and Voc to two decimals, FF in percent, then PCE, Rs and Rsh.
pub(super) fn render_human_summary(report: &AnalysisReport) -> String {
    let parameters = &report.parameters;
    let resistances = match report.resistances.map(|estimate| estimate.pair()) {
        Some(pair) => format!("Rs: {:.2} Ω\nRsh: {:.2} Ω\n", pair.rs, pair.rsh),
        None => "Rs: skipped\nRsh: skipped\n".to_string(),
    };
    format!(
        "Jsc: {:.2} mA/cm²\nVoc: {:.2} V\nFF: {:.2} %\nPCE: {:.2} %\n{resistances}",
        parameters.jsc,
        parameters.voc,
        parameters.ff * 100.0,
        parameters.pce
    )
}

#[cfg(test)]
mod tests {
    use super::{load_config_file, parse_separator, render_human_summary};
    use crate::cli::CliError;
    use pvcurve_core::common::AnalysisConfig;
    use pvcurve_core::domain::ExtractedParameters;
    use pvcurve_core::modules::{AnalysisReport, RegionFit, ResistanceEstimate};
    use pvcurve_core::numerics::LinearFit;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn separators_accept_single_characters_and_tab() {
        assert_eq!(parse_separator(";"), Ok(';'));
        assert_eq!(parse_separator("tab"), Ok('\t'));
        assert_eq!(parse_separator("\\t"), Ok('\t'));
        assert!(parse_separator(";;").is_err());
        assert!(parse_separator("").is_err());
    }

    fn report(resistances: Option<ResistanceEstimate>) -> AnalysisReport {
        AnalysisReport {
            source: "cell.csv".to_string(),
            points_read: 5,
            samples: Vec::new(),
            parameters: ExtractedParameters {
                jsc: 20.004,
                voc: 0.7961,
                ff: 0.71234,
                pce: 11.3456,
                vmp: 0.65,
                jmp: 17.4,
                pmax: 11.31,
            },
            resistances,
            config: AnalysisConfig::default(),
        }
    }

    fn region(region: &'static str, limit: f64, resistance: f64) -> RegionFit {
        RegionFit {
            region,
            limit,
            fit: LinearFit {
                slope: 1.0 / resistance,
                intercept: 0.0,
                r_squared: 1.0,
                point_count: 4,
            },
            resistance,
        }
    }

    #[test]
    fn summary_prints_resistances_in_ohm() {
        let estimate = ResistanceEstimate {
            series: region("series", 0.72, 3.14159),
            shunt: region("shunt", 0.1, 12_345.678),
        };

        let summary = render_human_summary(&report(Some(estimate)));
        assert!(summary.ends_with("PCE: 11.35 %\nRs: 3.14 Ω\nRsh: 12345.68 Ω\n"), "{summary}");
        assert_eq!(summary.lines().count(), 6);
    }

    #[test]
    fn summary_without_resistances_marks_them_skipped() {
        let report = report(None);

        assert_eq!(
            render_human_summary(&report),
            "Jsc: 20.00 mA/cm²\nVoc: 0.80 V\nFF: 71.23 %\nPCE: 11.35 %\nRs: skipped\nRsh: skipped\n"
        );
    }

    #[test]
    fn config_failures_map_to_io_and_input_codes() {
        let temp = TempDir::new().expect("tempdir should be created");

        let missing = load_config_file(&temp.path().join("absent.json"))
            .expect_err("missing file should fail");
        assert!(matches!(&missing, CliError::Analysis(error) if error.exit_code() == 3));

        let broken = temp.path().join("broken.json");
        fs::write(&broken, "{ not json").expect("config should be written");
        let invalid = load_config_file(&broken).expect_err("invalid JSON should fail");
        assert!(matches!(&invalid, CliError::Analysis(error) if error.code() == "INPUT.CONFIG"));
    }
}
