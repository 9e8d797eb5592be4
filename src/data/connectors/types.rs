use serde::{Deserialize, Serialize};

/// Metadata about a loaded dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub source: String,
    pub num_rows: usize,
    pub num_columns: usize,
    pub target_range: (f64, f64), // (min, max)
}
