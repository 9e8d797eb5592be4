use crate::engines::evaluation::subtree_end;
use crate::engines::generation::genome::Genome;
use crate::functions::OperatorCatalog;
use crate::types::Node;
use rand::Rng;

/// Probability that crossover cuts each parent at its own point.
const INDEPENDENT_CUTS: f64 = 0.1;
/// Insertions and deletions touch `1 + gen_range(0..MAX_SPLICE)` nodes.
const MAX_SPLICE: usize = 5;

/// Draws random nodes over a catalog and a number of input columns.
///
/// Both must be non-empty; a catalog always is, and a `DataSource` has at
/// least one input column.
pub struct NodeFactory<'a> {
    catalog: &'a OperatorCatalog,
    input_columns: usize,
}

impl<'a> NodeFactory<'a> {
    pub fn new(catalog: &'a OperatorCatalog, input_columns: usize) -> Self {
        Self { catalog, input_columns }
    }

    pub fn catalog(&self) -> &'a OperatorCatalog {
        self.catalog
    }

    /// Constant, operator or column with roughly equal odds.
    pub fn random_node<R: Rng>(&self, rng: &mut R) -> Node {
        let roll: f64 = rng.gen();
        if roll < 0.333 {
            self.random_constant(rng)
        } else if roll < 0.666 {
            self.random_operator(rng)
        } else {
            self.random_column(rng)
        }
    }

    /// Either a uniform value in `[0, 1)` or a large integer, then a coin
    /// flip for the sign.
    pub fn random_constant<R: Rng>(&self, rng: &mut R) -> Node {
        let magnitude = if rng.gen_bool(0.5) {
            rng.gen::<f64>()
        } else {
            rng.gen_range(0..=i32::MAX) as f64
        };
        if rng.gen_bool(0.5) {
            Node::Constant(-magnitude)
        } else {
            Node::Constant(magnitude)
        }
    }

    pub fn random_operator<R: Rng>(&self, rng: &mut R) -> Node {
        Node::Operator(rng.gen_range(0..self.catalog.len()))
    }

    pub fn random_column<R: Rng>(&self, rng: &mut R) -> Node {
        Node::Column(rng.gen_range(0..self.input_columns))
    }

    /// Fresh payload of the same kind as `node`.
    pub fn reroll<R: Rng>(&self, node: Node, rng: &mut R) -> Node {
        match node {
            Node::Constant(_) => self.random_constant(rng),
            Node::Operator(_) => self.random_operator(rng),
            Node::Column(_) => self.random_column(rng),
        }
    }
}

/// Random genome of `min_bases + gen_range(0..=|max_bases - min_bases|)`
/// independent nodes. The result is not checked for well-formedness.
pub fn random_genome<R: Rng>(
    factory: &NodeFactory<'_>,
    min_bases: usize,
    max_bases: usize,
    rng: &mut R,
) -> Genome {
    let len = min_bases.min(max_bases) + rng.gen_range(0..=min_bases.abs_diff(max_bases));
    Genome::new((0..len).map(|_| factory.random_node(rng)).collect())
}

/// Structural mutation, applied in place zero or more times: each round
/// happens with `probability` and edits one random position.
pub fn mutate<R: Rng>(nodes: &mut Vec<Node>, factory: &NodeFactory<'_>, probability: f64, rng: &mut R) {
    while !nodes.is_empty() && rng.gen::<f64>() < probability {
        let i = rng.gen_range(0..nodes.len());
        let roll: f64 = rng.gen();

        if roll < 0.05 {
            insert_random(nodes, i, factory, rng);
        } else if roll < 0.10 {
            delete_span(nodes, i, rng);
        } else if roll < 0.20 {
            silent_mutation(nodes, i, factory.catalog(), rng);
        } else if roll < 0.30 {
            nodes[i] = factory.random_node(rng);
        } else {
            nodes[i] = factory.reroll(nodes[i], rng);
        }
    }
}

/// Insert `1 + gen_range(0..MAX_SPLICE)` random nodes before position `i`.
/// Returns how many were inserted.
pub fn insert_random<R: Rng>(nodes: &mut Vec<Node>, i: usize, factory: &NodeFactory<'_>, rng: &mut R) -> usize {
    let count = 1 + rng.gen_range(0..MAX_SPLICE);
    let fresh: Vec<Node> = (0..count).map(|_| factory.random_node(rng)).collect();
    nodes.splice(i..i, fresh);
    count
}

/// Remove up to `1 + gen_range(0..MAX_SPLICE)` nodes starting at `i`, stopping
/// at the end of the sequence. Returns how many were removed.
pub fn delete_span<R: Rng>(nodes: &mut Vec<Node>, i: usize, rng: &mut R) -> usize {
    let count = (1 + rng.gen_range(0..MAX_SPLICE)).min(nodes.len().saturating_sub(i));
    nodes.drain(i..i + count);
    count
}

/// Wrap the subtree at `i` in a neutral operation (`+0`, `-0`, or `*1` for
/// two draws out of four). Grows the sequence by two nodes.
///
/// When the subtree is incomplete only the node at `i` is wrapped.
pub fn silent_mutation<R: Rng>(nodes: &mut Vec<Node>, i: usize, catalog: &OperatorCatalog, rng: &mut R) {
    let ids = catalog.identities();
    let (operator, neutral) = match rng.gen_range(0..4) {
        0 => (ids.add, 0.0),
        1 => (ids.minus, 0.0),
        _ => (ids.mul, 1.0),
    };

    let end = subtree_end(nodes, i, catalog).unwrap_or(i + 1);
    nodes.insert(end, Node::Constant(neutral));
    nodes.insert(i, Node::Operator(operator));
}

/// `parent1[..cut1] ++ parent2[cut2..]`, cuts clamped to the parent lengths.
pub fn splice_parents(parent1: &[Node], parent2: &[Node], cut1: usize, cut2: usize) -> Vec<Node> {
    let head = &parent1[..cut1.min(parent1.len())];
    let tail = &parent2[cut2.min(parent2.len())..];
    let mut child = Vec::with_capacity(head.len() + tail.len());
    child.extend_from_slice(head);
    child.extend_from_slice(tail);
    child
}

/// One offspring from a head of `parent1` and a tail of `parent2`, then
/// mutated. The caller stamps its generation.
pub fn crossover<R: Rng>(
    parent1: &Genome,
    parent2: &Genome,
    factory: &NodeFactory<'_>,
    probability_mutation: f64,
    rng: &mut R,
) -> Genome {
    let (cut1, cut2) = if rng.gen::<f64>() < INDEPENDENT_CUTS {
        (random_cut(parent1.len(), rng), random_cut(parent2.len(), rng))
    } else {
        let cut = random_cut(parent1.len().min(parent2.len()), rng);
        (cut, cut)
    };

    let mut nodes = splice_parents(parent1.nodes(), parent2.nodes(), cut1, cut2);
    mutate(&mut nodes, factory, probability_mutation, rng);
    Genome::new(nodes)
}

fn random_cut<R: Rng>(len: usize, rng: &mut R) -> usize {
    if len == 0 {
        0
    } else {
        rng.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSource;
    use crate::engines::evaluation::ExpressionEvaluator;
    use crate::types::NodeKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_genome_length_bounds() {
        let catalog = OperatorCatalog::standard();
        let factory = NodeFactory::new(&catalog, 3);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..200 {
            let genome = random_genome(&factory, 4, 9, &mut rng);
            assert!((4..=9).contains(&genome.len()));
        }
        assert_eq!(random_genome(&factory, 6, 6, &mut rng).len(), 6);
    }

    #[test]
    fn test_random_nodes_stay_in_range() {
        let catalog = OperatorCatalog::standard();
        let factory = NodeFactory::new(&catalog, 2);
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..500 {
            match factory.random_node(&mut rng) {
                Node::Constant(v) => assert!(v.is_finite()),
                Node::Column(c) => assert!(c < 2),
                Node::Operator(id) => assert!(id < catalog.len()),
            }
        }
    }

    #[test]
    fn test_reroll_keeps_kind() {
        let catalog = OperatorCatalog::standard();
        let factory = NodeFactory::new(&catalog, 4);
        let mut rng = StdRng::seed_from_u64(3);

        for node in [Node::Constant(1.0), Node::Column(0), Node::Operator(0)] {
            for _ in 0..50 {
                assert_eq!(factory.reroll(node, &mut rng).kind(), node.kind());
            }
        }
    }

    #[test]
    fn test_zero_probability_leaves_genome_alone() {
        let catalog = OperatorCatalog::standard();
        let factory = NodeFactory::new(&catalog, 1);
        let mut rng = StdRng::seed_from_u64(4);

        let original = vec![Node::Operator(2), Node::Column(0), Node::Constant(2.0)];
        let mut nodes = original.clone();
        mutate(&mut nodes, &factory, 0.0, &mut rng);
        assert_eq!(nodes, original);

        let mut empty = Vec::new();
        mutate(&mut empty, &factory, 0.99, &mut rng);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_insert_lands_at_position() {
        let catalog = OperatorCatalog::standard();
        let factory = NodeFactory::new(&catalog, 2);
        let mut rng = StdRng::seed_from_u64(11);

        let original = vec![Node::Constant(-7.5), Node::Constant(-8.5), Node::Constant(-9.5)];
        let mut counts = std::collections::HashSet::new();
        for i in 0..=original.len() {
            for _ in 0..40 {
                let mut nodes = original.clone();
                let count = insert_random(&mut nodes, i, &factory, &mut rng);
                assert!((1..=MAX_SPLICE).contains(&count));
                assert_eq!(nodes.len(), original.len() + count);
                assert_eq!(&nodes[..i], &original[..i]);
                assert_eq!(&nodes[i + count..], &original[i..]);
                counts.insert(count);
            }
        }
        assert_eq!(counts.len(), MAX_SPLICE);
    }

    #[test]
    fn test_delete_clamps_to_tail() {
        let mut rng = StdRng::seed_from_u64(12);
        let original: Vec<Node> = (0..10).map(|v| Node::Constant(v as f64)).collect();

        for _ in 0..40 {
            let mut nodes = original.clone();
            assert_eq!(delete_span(&mut nodes, original.len() - 1, &mut rng), 1);
            assert_eq!(nodes, &original[..original.len() - 1]);
        }

        for i in 0..original.len() {
            for _ in 0..20 {
                let mut nodes = original.clone();
                let count = delete_span(&mut nodes, i, &mut rng);
                assert!((1..=MAX_SPLICE).contains(&count));
                assert!(i + count <= original.len());
                assert_eq!(nodes.len(), original.len() - count);
                assert_eq!(&nodes[..i], &original[..i]);
                assert_eq!(&nodes[i..], &original[i + count..]);
            }
        }
    }

    #[test]
    fn test_silent_mutation_preserves_value() {
        let catalog = OperatorCatalog::standard();
        let data = DataSource::from_rows(&[vec![3.0, 7.0, 1.0], vec![-2.0, 0.5, 1.0]]).unwrap();
        let evaluator = ExpressionEvaluator::new(&catalog, &data);
        let mut rng = StdRng::seed_from_u64(5);

        // Minus(Mul(${1}, ${2}), Negate(1.5))
        let original = vec![
            Node::Operator(1),
            Node::Operator(2),
            Node::Column(0),
            Node::Column(1),
            Node::Operator(4),
            Node::Constant(1.5),
        ];

        for i in 0..original.len() {
            for _ in 0..8 {
                let mut nodes = original.clone();
                silent_mutation(&mut nodes, i, &catalog, &mut rng);
                assert_eq!(nodes.len(), original.len() + 2);
                assert_eq!(nodes[i].kind(), NodeKind::Operator);
                for row in 0..data.row_count() {
                    let before = evaluator.evaluate_row(&original, row).unwrap();
                    let after = evaluator.evaluate_row(&nodes, row).unwrap();
                    assert_eq!(before.value, after.value);
                    assert_eq!(after.consumed, nodes.len());
                }
            }
        }
    }

    #[test]
    fn test_silent_mutation_on_incomplete_subtree() {
        let catalog = OperatorCatalog::standard();
        let mut rng = StdRng::seed_from_u64(6);

        let mut nodes = vec![Node::Operator(0), Node::Constant(1.0)];
        silent_mutation(&mut nodes, 0, &catalog, &mut rng);
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[1], Node::Operator(0));
        assert_eq!(nodes[3], Node::Constant(1.0));
    }

    #[test]
    fn test_splice_parents() {
        let p1 = vec![Node::Constant(1.0), Node::Constant(2.0), Node::Constant(3.0)];
        let p2 = vec![Node::Column(0), Node::Column(1)];

        assert_eq!(
            splice_parents(&p1, &p2, 2, 1),
            vec![Node::Constant(1.0), Node::Constant(2.0), Node::Column(1)]
        );
        assert_eq!(splice_parents(&p1, &p2, 0, 2), Vec::<Node>::new());
        assert_eq!(splice_parents(&p1, &p2, 3, 0).len(), 5);
    }

    #[test]
    fn test_crossover_without_mutation() {
        let catalog = OperatorCatalog::standard();
        let factory = NodeFactory::new(&catalog, 2);
        let mut rng = StdRng::seed_from_u64(7);

        let p1 = Genome::new(vec![Node::Constant(1.0); 6]);
        let p2 = Genome::new(vec![Node::Column(1); 4]);
        for _ in 0..100 {
            let child = crossover(&p1, &p2, &factory, 0.0, &mut rng);
            assert!(child.len() <= p1.len() + p2.len());
            assert!(child.generation().is_none());
            let head = child.nodes().iter().take_while(|n| **n == Node::Constant(1.0)).count();
            assert!(child.nodes()[head..].iter().all(|n| *n == Node::Column(1)));
        }
    }

    #[test]
    fn test_crossover_with_empty_parent() {
        let catalog = OperatorCatalog::standard();
        let factory = NodeFactory::new(&catalog, 2);
        let mut rng = StdRng::seed_from_u64(8);

        let empty = Genome::new(Vec::new());
        let p2 = Genome::new(vec![Node::Column(0); 3]);
        let child = crossover(&empty, &p2, &factory, 0.0, &mut rng);
        assert!(child.len() <= 3);
    }
}
