use super::{evolution::EvolutionConfig, fitness::FitnessConfig, traits::ConfigSection};
use crate::error::GenprogError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment overrides, e.g. `GENPROG_EVOLUTION__MAX_GENOMES=80`.
pub const ENV_PREFIX: &str = "GENPROG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub fitness: FitnessConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GenprogError> {
        self.evolution
            .validate()
            .map_err(|e| section_error(EvolutionConfig::section_name(), e))?;
        self.fitness
            .validate()
            .map_err(|e| section_error(FitnessConfig::section_name(), e))?;
        Ok(())
    }
}

fn section_error(section: &str, err: GenprogError) -> GenprogError {
    match err {
        GenprogError::Configuration(msg) => GenprogError::Configuration(format!("[{}] {}", section, msg)),
        other => other,
    }
}

/// Resolves the configuration from defaults, an optional file and the
/// environment, then accepts programmatic overrides.
pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Layer defaults < `path` (TOML or JSON, by extension) < environment.
    pub fn load(path: Option<&Path>) -> Result<Self, GenprogError> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_env_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, GenprogError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        log::debug!("Configuration resolved: {:?}", config);
        Ok(Self { config })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GenprogError> {
        Self::load(Some(path.as_ref()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GenprogError> {
        let toml_str = toml::to_string_pretty(&self.config)
            .map_err(|e| GenprogError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| GenprogError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn to_json(&self) -> Result<String, GenprogError> {
        Ok(serde_json::to_string_pretty(&self.config)?)
    }

    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    /// Apply overrides; the result must still validate.
    pub fn update<F>(&mut self, f: F) -> Result<(), GenprogError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut updated = self.config.clone();
        f(&mut updated);
        updated.validate()?;
        self.config = updated;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fitness::ErrorMetric;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("genprog-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults_without_sources() {
        let manager = ConfigManager::load_with_env_prefix(None, "GENPROG_TEST_NONE").unwrap();
        assert_eq!(manager.get(), AppConfig::default());
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let path = temp_path("roundtrip.toml");
        let mut manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.max_genomes = 80;
                c.evolution.seed = Some(7);
                c.fitness.metric = ErrorMetric::Absolute;
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let loaded = ConfigManager::load_with_env_prefix(Some(&path), "GENPROG_TEST_FILE").unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.get().evolution.max_genomes, 80);
        assert_eq!(loaded.get().evolution.seed, Some(7));
        assert_eq!(loaded.get().fitness.metric, ErrorMetric::Absolute);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("partial.toml");
        std::fs::write(&path, "[evolution]\nmin_genomes = 8\nmax_genomes = 12\n").unwrap();

        let loaded = ConfigManager::load_with_env_prefix(Some(&path), "GENPROG_TEST_PARTIAL").unwrap();
        std::fs::remove_file(&path).ok();
        let config = loaded.get();
        assert_eq!(config.evolution.min_genomes, 8);
        assert_eq!(config.evolution.max_bases, 30);
        assert_eq!(config.fitness, FitnessConfig::default());
    }

    #[test]
    fn test_environment_overrides() {
        std::env::set_var("GENPROG_TEST_ENV_EVOLUTION__MAX_BASES", "40");
        std::env::set_var("GENPROG_TEST_ENV_FITNESS__NORMALIZE_DATA", "true");
        let loaded = ConfigManager::load_with_env_prefix(None, "GENPROG_TEST_ENV").unwrap();
        assert_eq!(loaded.get().evolution.max_bases, 40);
        assert!(loaded.get().fitness.normalize_data);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let path = temp_path("invalid.toml");
        std::fs::write(&path, "[evolution]\nmin_bases = 10\nmax_bases = 2\n").unwrap();

        let result = ConfigManager::load_with_env_prefix(Some(&path), "GENPROG_TEST_INVALID");
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(GenprogError::Configuration(_))));
    }

    #[test]
    fn test_update_rejects_invalid_override() {
        let mut manager = ConfigManager::new();
        let result = manager.update(|c| c.fitness.max_fraction_of_errors = -1.0);
        assert!(result.is_err());
        assert_eq!(manager.get(), AppConfig::default());
    }

    #[test]
    fn test_json_dump() {
        let json = ConfigManager::new().to_json().unwrap();
        assert!(json.contains("\"max_genomes\": 50"));
        assert!(json.contains("\"metric\": \"squared\""));
    }
}
