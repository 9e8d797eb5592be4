use crate::error::{GenprogError, Result};

/// Immutable `rows x columns` numeric table. The last column is the
/// regression target; its min-max normalization is computed once here.
///
/// A constant target normalizes to all zeros. Rejecting such inputs is the
/// loader's job (see `DataValidator::validate_target_variance`).
#[derive(Debug, Clone)]
pub struct DataSource {
    rows: usize,
    columns: usize,
    cells: Vec<f64>,
    normalized: Vec<f64>,
    target_range: (f64, f64),
}

impl DataSource {
    /// Build from a row-major cell buffer.
    pub fn new(columns: usize, cells: Vec<f64>) -> Result<Self> {
        if columns < 2 {
            return Err(GenprogError::InputMalformed(format!(
                "Need at least 2 columns, found {}",
                columns
            )));
        }
        if cells.is_empty() {
            return Err(GenprogError::InputMalformed("Empty rows".to_string()));
        }
        if cells.len() % columns != 0 {
            return Err(GenprogError::InputMalformed(format!(
                "{} cells do not fill rows of {} columns",
                cells.len(),
                columns
            )));
        }
        if let Some(index) = cells.iter().position(|v| !v.is_finite()) {
            return Err(GenprogError::InputMalformed(format!(
                "Non-finite value at row {}, column {}",
                index / columns + 1,
                index % columns + 1
            )));
        }

        let rows = cells.len() / columns;
        let target = |row: usize| cells[row * columns + columns - 1];
        let (min, max) = (0..rows).fold((f64::MAX, f64::MIN), |(lo, hi), row| {
            (lo.min(target(row)), hi.max(target(row)))
        });
        let span = max - min;
        let normalized = (0..rows)
            .map(|row| if span > 0.0 { (target(row) - min) / span } else { 0.0 })
            .collect();

        Ok(Self {
            rows,
            columns,
            cells,
            normalized,
            target_range: (min, max),
        })
    }

    /// Build from a list of rows, each of the same width.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != columns) {
            return Err(GenprogError::InputMalformed(format!(
                "Inconsistent column number at line {}: expected {}, found {}",
                bad + 1,
                columns,
                rows[bad].len()
            )));
        }
        Self::new(columns, rows.concat())
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Columns a genome may reference (all but the target).
    pub fn input_columns(&self) -> usize {
        self.columns - 1
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Result<f64> {
        if row >= self.rows || column >= self.columns {
            return Err(GenprogError::OutOfRange {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(self.cells[row * self.columns + column])
    }

    /// Raw target value of `row`.
    ///
    /// # Panics
    /// If `row >= row_count()`.
    pub fn target(&self, row: usize) -> f64 {
        self.cells[row * self.columns + self.columns - 1]
    }

    /// Min-max normalized target value of `row`, in `[0, 1]`.
    ///
    /// # Panics
    /// If `row >= row_count()`.
    pub fn normalized_target(&self, row: usize) -> f64 {
        self.normalized[row]
    }

    pub fn target_range(&self) -> (f64, f64) {
        self.target_range
    }
}
