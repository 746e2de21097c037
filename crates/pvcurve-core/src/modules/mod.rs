pub mod extract;
pub mod interpolate;
pub mod pipeline;
pub mod reader;
pub mod resistance;
pub mod units;

mod traits;

pub use extract::{
    extract_parameters, fill_factor, max_power_point, open_circuit_point,
    power_conversion_efficiency, short_circuit_point,
};
pub use interpolate::{interpolate_curve, interpolate_iv_curve};
pub use pipeline::{AnalysisReport, analyze_file, analyze_table};
pub use reader::{RawIvTable, parse_iv_table, read_iv_table};
pub use resistance::{
    RegionFit, ResistanceEstimate, estimate_resistances, series_resistance, shunt_resistance,
};
pub use traits::{CurveComparison, CurveRenderer, RenderError};
pub use units::{NormalizedColumns, normalize_columns};
