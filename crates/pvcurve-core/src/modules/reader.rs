use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::common::ReaderConfig;
use crate::domain::{PvError, PvResult};

const INLINE_SOURCE: &str = "<inline>";

/// The two selected columns of a delimited IV table, in file order and in the file's units.
#[derive(Debug, Clone, PartialEq)]
pub struct RawIvTable {
    pub voltage_column: String,
    pub current_column: String,
    pub voltage: Vec<f64>,
    pub current: Vec<f64>,
}

impl RawIvTable {
    pub fn len(&self) -> usize {
        self.voltage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }
}

pub fn read_iv_table(path: impl AsRef<Path>, config: &ReaderConfig) -> PvResult<RawIvTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PvError::Io {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    let table = parse_records(file, config, path)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "read IV table");
    Ok(table)
}

pub fn parse_iv_table<R: Read>(reader: R, config: &ReaderConfig) -> PvResult<RawIvTable> {
    parse_records(reader, config, Path::new(INLINE_SOURCE))
}

fn parse_records<R: Read>(reader: R, config: &ReaderConfig, source: &Path) -> PvResult<RawIvTable> {
    let delimiter = delimiter_byte(config)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|error| csv_error(source, error))?
        .clone();
    let voltage_index = column_index(&headers, &config.voltage_column)?;
    let current_index = column_index(&headers, &config.current_column)?;

    let mut voltage = Vec::new();
    let mut current = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| csv_error(source, error))?;
        let line = record
            .position()
            .map_or(0, |position| position.line() as usize);
        voltage.push(parse_field(
            record.get(voltage_index),
            line,
            &config.voltage_column,
            config.decimal_separator,
        )?);
        current.push(parse_field(
            record.get(current_index),
            line,
            &config.current_column,
            config.decimal_separator,
        )?);
    }

    if voltage.is_empty() {
        return Err(PvError::insufficient_data(
            format!("IV table '{}'", source.display()),
            1,
            0,
        ));
    }

    Ok(RawIvTable {
        voltage_column: config.voltage_column.clone(),
        current_column: config.current_column.clone(),
        voltage,
        current,
    })
}

fn delimiter_byte(config: &ReaderConfig) -> PvResult<u8> {
    if config.delimiter == config.decimal_separator {
        return Err(PvError::invalid_input(
            "INPUT.DELIMITER",
            format!(
                "delimiter and decimal separator must differ, both are '{}'",
                config.delimiter
            ),
        ));
    }
    u8::try_from(config.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            PvError::invalid_input(
                "INPUT.DELIMITER",
                format!("delimiter must be a single ASCII character, got '{}'", config.delimiter),
            )
        })
}

fn column_index(headers: &csv::StringRecord, column: &str) -> PvResult<usize> {
    let wanted = column.trim();
    headers.iter().position(|header| header == wanted).ok_or_else(|| {
        let available: Vec<&str> = headers.iter().collect();
        PvError::invalid_input(
            "INPUT.COLUMN",
            format!(
                "column '{wanted}' not found; available columns: {}",
                available.join(", ")
            ),
        )
    })
}

fn parse_field(field: Option<&str>, line: usize, column: &str, decimal: char) -> PvResult<f64> {
    let parse_error = |message: String| PvError::Parse {
        line,
        column: column.to_string(),
        message,
    };

    let raw = field.ok_or_else(|| parse_error("field is missing".to_string()))?;
    if raw.is_empty() {
        return Err(parse_error("field is empty".to_string()));
    }

    let normalized = if decimal == '.' {
        raw.to_string()
    } else {
        raw.replace(decimal, ".")
    };
    normalized
        .parse::<f64>()
        .map_err(|_| parse_error(format!("'{raw}' is not a number")))
}

fn csv_error(source: &Path, error: csv::Error) -> PvError {
    let line = error
        .position()
        .map_or(0, |position| position.line() as usize);
    match error.kind() {
        csv::ErrorKind::Io(io) => PvError::Io {
            path: PathBuf::from(source),
            message: io.to_string(),
        },
        _ => PvError::Parse {
            line,
            column: "*".to_string(),
            message: error.to_string(),
        },
    }
}
