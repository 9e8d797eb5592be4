use crate::config::{AppConfig, EvolutionConfig, FitnessConfig};
use crate::data::DataSource;
use crate::engines::evaluation::{Evaluation, ExpressionEvaluator, FitnessEvaluator};
use crate::engines::generation::{
    genome::Genome,
    hall_of_fame::{HallOfFame, Improvement},
    operators::{crossover, mutate, NodeFactory},
    population::Generation,
};
use crate::error::{GenprogError, Result};
use crate::functions::OperatorCatalog;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionState {
    Initializing,
    Iterating,
    Converged,
    GenerationLimitReached,
}

impl EvolutionState {
    pub fn is_finished(self) -> bool {
        matches!(self, EvolutionState::Converged | EvolutionState::GenerationLimitReached)
    }
}

/// Counters for one generation step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationSummary {
    pub generation: u64,
    pub parents: usize,
    pub offspring: usize,
    /// Empty, out of size bounds, or a clone of a parent.
    pub discarded: usize,
    /// Evaluated and found bad.
    pub rejected: usize,
    pub admitted: usize,
    pub survivors: usize,
    pub best_fitness: Option<f64>,
}

/// A new best-ever genome.
#[derive(Debug, Clone)]
pub struct BestReport {
    pub generation: u64,
    pub fitness: f64,
    pub expression: String,
    /// From the start of the run to the genome's creation.
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub state: EvolutionState,
    pub generations: u64,
    pub seed: u64,
    pub best: Option<Genome>,
    pub history: Vec<Improvement>,
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: u64);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
    fn on_new_best(&mut self, report: &BestReport);
}

pub struct EvolutionEngine {
    catalog: Arc<OperatorCatalog>,
    data: Arc<DataSource>,
    evolution: EvolutionConfig,
    fitness: FitnessConfig,
    hall_of_fame: HallOfFame,
    population: Generation,
    generation: u64,
    state: EvolutionState,
    seed: u64,
    rng: StdRng,
    started_at: DateTime<Utc>,
}

impl EvolutionEngine {
    pub fn new(catalog: Arc<OperatorCatalog>, data: Arc<DataSource>, config: &AppConfig) -> Result<Self> {
        config.validate()?;
        if data.input_columns() == 0 || data.row_count() == 0 {
            return Err(GenprogError::InputMalformed(
                "Need at least one input column and one row".to_string(),
            ));
        }

        let seed = config
            .evolution
            .seed
            .unwrap_or_else(|| Utc::now().timestamp().unsigned_abs());
        log::info!("Random seed: {}", seed);

        Ok(Self {
            catalog,
            data,
            evolution: config.evolution.clone(),
            fitness: config.fitness.clone(),
            hall_of_fame: HallOfFame::new(),
            population: Generation::new(0),
            generation: 0,
            state: EvolutionState::Initializing,
            seed,
            rng: StdRng::seed_from_u64(seed),
            started_at: Utc::now(),
        })
    }

    pub fn state(&self) -> EvolutionState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Index of the next generation to be produced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> &Generation {
        &self.population
    }

    pub fn hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }

    /// Step until converged or the generation cap is reached. Without a cap
    /// and without convergence this never returns.
    pub fn run<C: ProgressCallback>(mut self, callback: &mut C) -> EvolutionOutcome {
        while !self.state.is_finished() {
            self.step(callback);
        }

        match self.state {
            EvolutionState::Converged => log::info!(
                "Converged after {} generations (fitness {:?})",
                self.generation,
                self.hall_of_fame.best_fitness()
            ),
            _ => log::info!("Generation limit of {} reached", self.generation),
        }

        let (best, history) = self.hall_of_fame.into_parts();
        EvolutionOutcome {
            state: self.state,
            generations: self.generation,
            seed: self.seed,
            best,
            history,
        }
    }

    /// Produce one generation. Does nothing once finished.
    pub fn step<C: ProgressCallback>(&mut self, callback: &mut C) -> EvolutionState {
        if self.state.is_finished() {
            return self.state;
        }

        let catalog = Arc::clone(&self.catalog);
        let data = Arc::clone(&self.data);
        let factory = NodeFactory::new(&catalog, data.input_columns());
        let evaluator = FitnessEvaluator::new(ExpressionEvaluator::new(&catalog, &data), &self.fitness);
        let bases = (self.evolution.min_bases, self.evolution.max_bases);

        if self.state == EvolutionState::Initializing {
            self.started_at = Utc::now();
            self.population = Generation::random(
                self.generation,
                self.evolution.min_genomes,
                self.evolution.max_genomes,
                &factory,
                bases,
                &mut self.rng,
            );
            self.state = EvolutionState::Iterating;
        }

        let generation = self.generation;
        callback.on_generation_start(generation);
        log::trace!(
            "Generation {}: breeding from pool {} ({} genomes)",
            generation,
            self.population.index(),
            self.population.len()
        );

        self.population
            .top_up(self.evolution.max_genomes, &factory, bases, &mut self.rng);

        if self.evolution.best_will_survive {
            if let Some(best) = self.hall_of_fame.best() {
                let mut elite = best.clone();
                mutate(
                    elite.nodes_mut(),
                    &factory,
                    self.evolution.probability_mutation,
                    &mut self.rng,
                );
                self.population.push(elite);
            }
        }

        let mut summary = GenerationSummary {
            generation,
            parents: self.population.len(),
            ..Default::default()
        };
        let mut pool = Generation::new(generation + 1);
        let parents = self.population.genomes();
        for (i, first) in parents.iter().enumerate() {
            for (j, second) in parents.iter().enumerate() {
                if i == j && !self.evolution.enable_self_crossover {
                    continue;
                }
                summary.offspring += 1;

                let mut child = crossover(
                    first,
                    second,
                    &factory,
                    self.evolution.probability_mutation,
                    &mut self.rng,
                );
                if !self.admissible(&child, first, second) {
                    summary.discarded += 1;
                    continue;
                }

                match evaluator.evaluate(&mut child) {
                    Evaluation::Fit(_) => {
                        child.set_generation(generation);
                        pool.push(child);
                        summary.admitted += 1;
                    }
                    _ => summary.rejected += 1,
                }
            }
        }

        pool.sort(self.evolution.genome_size_matters);
        pool.dedup_adjacent();
        pool.truncate(self.evolution.min_genomes);
        if let Some(every) = self.evolution.mass_extinction_every {
            if generation % every == 0 {
                log::debug!("Mass extinction at generation {}", generation);
                pool.truncate(0);
            }
        }
        summary.survivors = pool.len();

        match pool.best() {
            Some(best) if !best.is_bad() => {
                summary.best_fitness = Some(best.fitness());
                if self.hall_of_fame.try_improve(best, generation) {
                    let report = BestReport {
                        generation,
                        fitness: best.fitness(),
                        expression: best.display(&catalog).to_string(),
                        elapsed_seconds: seconds_between(self.started_at, best.created_at()),
                    };
                    callback.on_new_best(&report);
                    if best.fitness() <= self.fitness.min_fitness {
                        self.state = EvolutionState::Converged;
                    }
                }
            }
            _ => log::warn!("Generation {}: no usable genome (too many errors)", generation),
        }

        log::debug!(
            "Generation {}: {} parents, {} offspring, {} discarded, {} rejected, {} admitted, {} survivors",
            generation,
            summary.parents,
            summary.offspring,
            summary.discarded,
            summary.rejected,
            summary.admitted,
            summary.survivors
        );
        callback.on_generation_complete(&summary);

        self.population = pool;
        self.generation += 1;
        if self.state == EvolutionState::Iterating
            && self.evolution.max_generations.is_some_and(|cap| self.generation >= cap)
        {
            self.state = EvolutionState::GenerationLimitReached;
        }
        self.state
    }

    fn admissible(&self, child: &Genome, first: &Genome, second: &Genome) -> bool {
        if child.is_empty() || child.len() < self.evolution.min_bases || child.len() > self.evolution.max_bases {
            return false;
        }
        !(self.evolution.remove_clones && (child.same_sequence(first) || child.same_sequence(second)))
    }
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds().max(0) as f64 / 1000.0
}
