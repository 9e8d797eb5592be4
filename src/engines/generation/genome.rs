use crate::engines::evaluation::ExpressionDisplay;
use crate::functions::OperatorCatalog;
use crate::types::Node;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Candidate expression encoded as the pre-order traversal of its tree.
///
/// The sequence is not required to be well formed: random construction,
/// mutation and crossover splice freely, and evaluation decides whether the
/// result is usable. A genome that evaluated cleanly holds a complete tree
/// (possibly followed by unreached nodes); a `bad` one has no fitness.
///
/// ```
/// use genprog::engines::generation::Genome;
/// use genprog::functions::OperatorCatalog;
/// use genprog::types::Node;
///
/// let catalog = OperatorCatalog::standard();
/// let mul = catalog.id_of("Mul").unwrap();
/// let genome = Genome::new(vec![Node::Operator(mul), Node::Column(0), Node::Constant(2.0)]);
/// assert_eq!(genome.display(&catalog).to_string(), "Mul(${1},2.000000)");
/// ```
#[derive(Debug, Clone)]
pub struct Genome {
    nodes: Vec<Node>,
    bad: bool,
    fitness: f64,
    generation: Option<u64>,
    created_at: DateTime<Utc>,
}

impl Genome {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            bad: false,
            fitness: f64::NAN,
            generation: None,
            created_at: Utc::now(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_bad(&self) -> bool {
        self.bad
    }

    /// NaN until evaluated, and whenever the genome is bad.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    pub fn set_generation(&mut self, generation: u64) {
        self.generation = Some(generation);
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn same_sequence(&self, other: &Genome) -> bool {
        self.nodes == other.nodes
    }

    /// Ranking order: usable genomes before bad ones, then ascending
    /// fitness, then (optionally) fewer nodes.
    pub fn compare(&self, other: &Genome, size_matters: bool) -> Ordering {
        let by_size = || {
            if size_matters {
                self.len().cmp(&other.len())
            } else {
                Ordering::Equal
            }
        };

        match (self.bad, other.bad) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            (true, true) => by_size(),
            (false, false) => self.fitness.total_cmp(&other.fitness).then_with(by_size),
        }
    }

    pub fn display<'a>(&'a self, catalog: &'a OperatorCatalog) -> ExpressionDisplay<'a> {
        ExpressionDisplay::new(&self.nodes, catalog)
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub(crate) fn reset_evaluation(&mut self) {
        self.bad = false;
        self.fitness = f64::NAN;
    }

    pub fn mark_bad(&mut self) {
        self.bad = true;
        self.fitness = f64::NAN;
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.bad = false;
        self.fitness = fitness;
    }
}
