use crate::data::DataSource;
use crate::error::{GenprogError, Result};
use polars::prelude::{CsvReadOptions, DataFrame, DataType, SerReader};
use std::io::{Cursor, Read};
use std::path::Path;
use super::{types::DatasetMetadata, validator::DataValidator};

/// Loads tab-separated numeric tables without a header line.
pub struct TsvConnector;

impl TsvConnector {
    /// Types are inferred from every row, so a column whose early rows look
    /// like integers still reads later decimals.
    fn options() -> CsvReadOptions {
        CsvReadOptions::default()
            .with_has_header(false)
            .with_infer_schema_length(None)
            .map_parse_options(|parse_options| parse_options.with_separator(b'\t'))
    }

    /// Load a TSV file into a DataFrame
    pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = Self::options()
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| GenprogError::InputMalformed(format!("Failed to read table: {}", e)))?;

        Ok(df)
    }

    /// Load a TSV stream (e.g. stdin) into a DataFrame
    pub fn load_frame_from_reader<R: Read>(mut reader: R) -> Result<DataFrame> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(GenprogError::InputMalformed("Empty rows".to_string()));
        }

        let df = Self::options()
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|e| GenprogError::InputMalformed(format!("Failed to read table: {}", e)))?;

        Ok(df)
    }

    /// Load, validate and convert a TSV file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataSource> {
        let df = Self::load_frame(&path)?;
        Self::into_data_source(&df)
    }

    /// Load, validate and convert a TSV stream
    pub fn load_from_reader<R: Read>(reader: R) -> Result<DataSource> {
        let df = Self::load_frame_from_reader(reader)?;
        Self::into_data_source(&df)
    }

    /// Validate a frame and copy it into a row-major `DataSource`
    pub fn into_data_source(df: &DataFrame) -> Result<DataSource> {
        DataValidator::validate_table(df)?;

        let columns = df.width();
        let mut cells = vec![0.0; df.height() * columns];
        for (x, column) in df.get_columns().iter().enumerate() {
            let values = column.cast(&DataType::Float64)?;
            for (y, value) in values.f64()?.into_iter().enumerate() {
                cells[y * columns + x] = value.ok_or_else(|| {
                    GenprogError::InputMalformed(format!(
                        "Missing value at line {}, column {}",
                        y + 1,
                        x + 1
                    ))
                })?;
            }
        }

        DataSource::new(columns, cells)
    }

    /// Create metadata for a loaded table
    pub fn create_metadata(source: &str, data: &DataSource) -> DatasetMetadata {
        DatasetMetadata {
            source: source.to_string(),
            num_rows: data.row_count(),
            num_columns: data.column_count(),
            target_range: data.target_range(),
        }
    }
}
