use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::{random_genome, NodeFactory};
use rand::Rng;

/// Genomes of one generation, in insertion order until sorted.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    index: u64,
    genomes: Vec<Genome>,
}

impl Generation {
    pub fn new(index: u64) -> Self {
        Self {
            index,
            genomes: Vec::new(),
        }
    }

    pub fn with_genomes(index: u64, genomes: Vec<Genome>) -> Self {
        Self { index, genomes }
    }

    /// Between `min_genomes` and `max_genomes` random genomes (inclusive).
    pub fn random<R: Rng>(
        index: u64,
        min_genomes: usize,
        max_genomes: usize,
        factory: &NodeFactory<'_>,
        bases: (usize, usize),
        rng: &mut R,
    ) -> Self {
        let count = min_genomes.min(max_genomes) + rng.gen_range(0..=min_genomes.abs_diff(max_genomes));
        let genomes = (0..count)
            .map(|_| random_genome(factory, bases.0, bases.1, rng))
            .collect();
        Self { index, genomes }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn push(&mut self, genome: Genome) {
        self.genomes.push(genome);
    }

    /// Add random genomes until there are `target` members. Never removes.
    pub fn top_up<R: Rng>(&mut self, target: usize, factory: &NodeFactory<'_>, bases: (usize, usize), rng: &mut R) {
        while self.genomes.len() < target {
            self.genomes.push(random_genome(factory, bases.0, bases.1, rng));
        }
    }

    /// Stable sort, best first.
    pub fn sort(&mut self, size_matters: bool) {
        self.genomes.sort_by(|a, b| a.compare(b, size_matters));
    }

    /// Drop neighbours with identical node sequences, keeping the first.
    pub fn dedup_adjacent(&mut self) {
        self.genomes.dedup_by(|later, earlier| later.same_sequence(earlier));
    }

    pub fn truncate(&mut self, len: usize) {
        self.genomes.truncate(len);
    }

    /// First member; the best one once sorted.
    pub fn best(&self) -> Option<&Genome> {
        self.genomes.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::OperatorCatalog;
    use crate::types::Node;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scored(value: f64, fitness: f64) -> Genome {
        let mut genome = Genome::new(vec![Node::Constant(value)]);
        genome.set_fitness(fitness);
        genome
    }

    #[test]
    fn test_random_size_bounds() {
        let catalog = OperatorCatalog::standard();
        let factory = NodeFactory::new(&catalog, 1);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let generation = Generation::random(0, 5, 20, &factory, (3, 30), &mut rng);
            assert!((5..=20).contains(&generation.len()));
        }
    }

    #[test]
    fn test_top_up_is_additive() {
        let catalog = OperatorCatalog::standard();
        let factory = NodeFactory::new(&catalog, 1);
        let mut rng = StdRng::seed_from_u64(12);

        let mut generation = Generation::with_genomes(3, vec![scored(1.0, 0.5)]);
        generation.top_up(6, &factory, (2, 4), &mut rng);
        assert_eq!(generation.len(), 6);
        assert_eq!(generation.genomes()[0].fitness(), 0.5);

        generation.top_up(2, &factory, (2, 4), &mut rng);
        assert_eq!(generation.len(), 6);
    }

    #[test]
    fn test_sort_dedup_truncate() {
        let mut bad = Genome::new(vec![Node::Column(0)]);
        bad.mark_bad();
        let mut generation = Generation::with_genomes(
            0,
            vec![bad, scored(2.0, 3.0), scored(1.0, 1.0), scored(1.0, 1.0), scored(4.0, 2.0)],
        );

        generation.sort(false);
        generation.dedup_adjacent();
        let fitness: Vec<f64> = generation.genomes().iter().take(3).map(Genome::fitness).collect();
        assert_eq!(fitness, vec![1.0, 2.0, 3.0]);
        assert_eq!(generation.len(), 4);
        assert!(generation.genomes()[3].is_bad());

        generation.truncate(2);
        assert_eq!(generation.len(), 2);
        assert_eq!(generation.best().map(Genome::fitness), Some(1.0));
    }

    #[test]
    fn test_dedup_keeps_distinct_equal_fitness() {
        let mut generation = Generation::with_genomes(0, vec![scored(1.0, 1.0), scored(2.0, 1.0)]);
        generation.sort(false);
        generation.dedup_adjacent();
        assert_eq!(generation.len(), 2);
    }
}
