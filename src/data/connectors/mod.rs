mod tsv;
mod types;
mod validator;

pub use tsv::TsvConnector;
pub use types::DatasetMetadata;
pub use validator::DataValidator;
