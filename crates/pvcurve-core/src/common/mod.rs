pub mod config;

pub use config::{
    AnalysisConfig, AnalysisConfigError, ExtractionConfig, InterpolationConfig, ReaderConfig,
    ResistanceConfig, UnitConfig, load_analysis_config,
};
