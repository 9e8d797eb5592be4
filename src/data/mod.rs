pub mod connectors;
pub mod spreadsheet;

pub use connectors::{DataValidator, DatasetMetadata, TsvConnector};
pub use spreadsheet::DataSource;
