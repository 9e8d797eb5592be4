use crate::error::{GenprogError, Result};
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    /// Run every check a regression table must pass before conversion.
    pub fn validate_table(df: &DataFrame) -> Result<()> {
        Self::validate_minimum_columns(df, 2)?;
        Self::validate_minimum_rows(df, 1)?;
        Self::validate_numeric(df)?;

        let null_report = Self::check_nulls(df)?;
        if let Some((column, count)) = null_report.first() {
            return Err(GenprogError::InputMalformed(format!(
                "Column '{}' has {} missing value(s); rows must have a uniform column count",
                column, count
            )));
        }

        Self::validate_target_variance(df)
    }

    pub fn validate_minimum_columns(df: &DataFrame, min_columns: usize) -> Result<()> {
        if df.width() < min_columns {
            return Err(GenprogError::InputMalformed(format!(
                "Not enough columns: {} found, minimum {} required",
                df.width(),
                min_columns
            )));
        }
        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(GenprogError::InputMalformed(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Every column must have been parsed as a number
    pub fn validate_numeric(df: &DataFrame) -> Result<()> {
        for (index, column) in df.get_columns().iter().enumerate() {
            if !matches!(
                column.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                return Err(GenprogError::InputMalformed(format!(
                    "Column {} must be numeric, found {:?}",
                    index + 1,
                    column.dtype()
                )));
            }
        }
        Ok(())
    }

    /// Null counts per column (only columns with at least one null)
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for column in df.get_columns() {
            let null_count = column.null_count();
            if null_count > 0 {
                null_report.push((column.name().to_string(), null_count));
            }
        }

        Ok(null_report)
    }

    /// The target (last) column must not be constant
    pub fn validate_target_variance(df: &DataFrame) -> Result<()> {
        let Some(target) = df.get_columns().last() else {
            return Err(GenprogError::InputMalformed("No target column".to_string()));
        };
        let target = target.cast(&DataType::Float64)?;
        let target = target.f64()?;

        match (target.min(), target.max()) {
            (Some(min), Some(max)) if min < max => Ok(()),
            _ => Err(GenprogError::InputMalformed(
                "Min==Max: target column has zero variance".to_string(),
            )),
        }
    }
}
