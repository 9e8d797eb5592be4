use crate::engines::generation::genome::Genome;
use serde::Serialize;

/// One step down in best-ever fitness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Improvement {
    pub generation: u64,
    pub fitness: f64,
    pub size: usize,
}

/// Best genome seen so far, and the history of how it got there.
#[derive(Debug, Clone, Default)]
pub struct HallOfFame {
    best: Option<Genome>,
    history: Vec<Improvement>,
}

impl HallOfFame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `candidate` if it is usable and strictly better than the
    /// current best. Returns whether it was recorded.
    pub fn try_improve(&mut self, candidate: &Genome, generation: u64) -> bool {
        if candidate.is_bad() || candidate.fitness().is_nan() {
            return false;
        }
        if let Some(best) = &self.best {
            if candidate.fitness() >= best.fitness() {
                return false;
            }
        }

        self.history.push(Improvement {
            generation,
            fitness: candidate.fitness(),
            size: candidate.len(),
        });
        self.best = Some(candidate.clone());
        true
    }

    pub fn best(&self) -> Option<&Genome> {
        self.best.as_ref()
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.best.as_ref().map(Genome::fitness)
    }

    pub fn history(&self) -> &[Improvement] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn into_parts(self) -> (Option<Genome>, Vec<Improvement>) {
        (self.best, self.history)
    }
}
