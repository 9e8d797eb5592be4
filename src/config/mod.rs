pub mod traits;
pub mod evolution;
pub mod fitness;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::EvolutionConfig;
pub use fitness::{ErrorMetric, FitnessConfig};
pub use traits::ConfigSection;
