use super::traits::ConfigSection;
use crate::error::GenprogError;
use serde::{Deserialize, Serialize};

/// Population, genome-size and loop-control settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Survivors kept after each generation (and lower bound of the initial population).
    pub min_genomes: usize,
    /// Each generation is topped up to this size before reproduction.
    pub max_genomes: usize,
    pub min_bases: usize,
    pub max_bases: usize,
    /// `None` runs until convergence.
    pub max_generations: Option<u64>,
    pub probability_mutation: f64,
    /// `None` seeds from the wall clock.
    pub seed: Option<u64>,
    /// Elitism: inject a mutated copy of the best-ever genome each generation.
    pub best_will_survive: bool,
    pub enable_self_crossover: bool,
    /// Drop offspring identical to one of their parents.
    pub remove_clones: bool,
    /// Break fitness ties by preferring shorter genomes.
    pub genome_size_matters: bool,
    /// Empty the surviving pool every N generations.
    pub mass_extinction_every: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            min_genomes: 5,
            max_genomes: 50,
            min_bases: 3,
            max_bases: 30,
            max_generations: None,
            probability_mutation: 0.01,
            seed: None,
            best_will_survive: false,
            enable_self_crossover: false,
            remove_clones: false,
            genome_size_matters: false,
            mass_extinction_every: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GenprogError> {
        if self.min_genomes < 1 {
            return Err(GenprogError::Configuration(
                "min_genomes must be at least 1".to_string()
            ));
        }
        if self.max_genomes < self.min_genomes {
            return Err(GenprogError::Configuration(format!(
                "max_genomes ({}) < min_genomes ({})",
                self.max_genomes, self.min_genomes
            )));
        }
        if self.min_bases < 1 {
            return Err(GenprogError::Configuration(
                "min_bases must be at least 1".to_string()
            ));
        }
        if self.max_bases < self.min_bases {
            return Err(GenprogError::Configuration(format!(
                "max_bases ({}) < min_bases ({})",
                self.max_bases, self.min_bases
            )));
        }
        if !(0.0..1.0).contains(&self.probability_mutation) {
            return Err(GenprogError::Configuration(
                "probability_mutation must be in [0, 1)".to_string()
            ));
        }
        if self.max_generations == Some(0) {
            return Err(GenprogError::Configuration(
                "max_generations must be positive (omit it for no limit)".to_string()
            ));
        }
        if self.mass_extinction_every == Some(0) {
            return Err(GenprogError::Configuration(
                "mass_extinction_every must be positive".to_string()
            ));
        }
        Ok(())
    }
}
