use std::path::PathBuf;

pub type PvResult<T> = Result<T, PvError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PvErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
}

impl PvErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
        }
    }
}

/// Every failure the analysis pipeline can raise. Nothing is recovered locally: the first
/// error aborts the run and no partial result is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PvError {
    #[error("{parameter} is required: {reason}")]
    MissingParameter {
        parameter: &'static str,
        reason: String,
    },
    #[error("{context} needs at least {required} points, got {actual}")]
    InsufficientData {
        context: String,
        required: usize,
        actual: usize,
    },
    #[error(
        "{region} regression window (V {bound} {limit} V) holds {actual} point(s), at least 2 are required"
    )]
    InsufficientRange {
        region: &'static str,
        bound: &'static str,
        limit: f64,
        actual: usize,
    },
    #[error("degenerate curve: {reason}")]
    DegenerateCurve { reason: String },
    #[error("degenerate {region} region: {reason}")]
    DegenerateRegion {
        region: &'static str,
        reason: String,
    },
    #[error("{message}")]
    InvalidInput {
        code: &'static str,
        message: String,
    },
    #[error("failed to read '{}': {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("line {line}, column '{column}': {message}")]
    Parse {
        line: usize,
        column: String,
        message: String,
    },
}

impl PvError {
    pub fn missing_parameter(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::MissingParameter {
            parameter,
            reason: reason.into(),
        }
    }

    pub fn insufficient_data(context: impl Into<String>, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            context: context.into(),
            required,
            actual,
        }
    }

    pub fn degenerate_curve(reason: impl Into<String>) -> Self {
        Self::DegenerateCurve {
            reason: reason.into(),
        }
    }

    pub fn degenerate_region(region: &'static str, reason: impl Into<String>) -> Self {
        Self::DegenerateRegion {
            region,
            reason: reason.into(),
        }
    }

    pub fn invalid_input(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code,
            message: message.into(),
        }
    }

    pub const fn category(&self) -> PvErrorCategory {
        match self {
            Self::MissingParameter { .. }
            | Self::InsufficientData { .. }
            | Self::InvalidInput { .. }
            | Self::Parse { .. } => PvErrorCategory::InputValidationError,
            Self::Io { .. } => PvErrorCategory::IoSystemError,
            Self::InsufficientRange { .. }
            | Self::DegenerateCurve { .. }
            | Self::DegenerateRegion { .. } => PvErrorCategory::ComputationError,
        }
    }

    /// Stable identifier printed in diagnostics, e.g. `RUN.DEGENERATE_CURVE`.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "INPUT.MISSING_PARAMETER",
            Self::InsufficientData { .. } => "INPUT.INSUFFICIENT_DATA",
            Self::InsufficientRange { .. } => "RUN.INSUFFICIENT_RANGE",
            Self::DegenerateCurve { .. } => "RUN.DEGENERATE_CURVE",
            Self::DegenerateRegion { .. } => "RUN.DEGENERATE_REGION",
            Self::InvalidInput { code, .. } => *code,
            Self::Io { .. } => "IO.INPUT_READ",
            Self::Parse { .. } => "INPUT.PARSE",
        }
    }

    pub const fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.code(), self)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}
