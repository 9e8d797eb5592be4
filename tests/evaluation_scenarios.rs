use genprog::config::{ErrorMetric, FitnessConfig};
use genprog::data::DataSource;
use genprog::engines::evaluation::{Evaluation, ExpressionEvaluator, FitnessEvaluator};
use genprog::engines::generation::Genome;
use genprog::error::EvalError;
use genprog::functions::OperatorCatalog;
use genprog::types::Node;

fn op(catalog: &OperatorCatalog, name: &str) -> Node {
    Node::Operator(catalog.id_of(name).unwrap())
}

#[test]
fn test_single_column_single_row() {
    let catalog = OperatorCatalog::standard();
    let data = DataSource::from_rows(&[vec![5.0, 9.0]]).unwrap();
    let nodes = vec![Node::Column(0)];

    let row = ExpressionEvaluator::new(&catalog, &data).evaluate_row(&nodes, 0).unwrap();
    assert_eq!(row.value, 5.0);

    let squared = FitnessConfig::default();
    let evaluator = FitnessEvaluator::new(ExpressionEvaluator::new(&catalog, &data), &squared);
    let mut genome = Genome::new(nodes.clone());
    assert_eq!(evaluator.evaluate(&mut genome), Evaluation::Fit(16.0));
    assert!(!genome.is_bad());

    let absolute = FitnessConfig { metric: ErrorMetric::Absolute, ..Default::default() };
    let evaluator = FitnessEvaluator::new(ExpressionEvaluator::new(&catalog, &data), &absolute);
    let mut genome = Genome::new(nodes);
    assert_eq!(evaluator.evaluate(&mut genome), Evaluation::Fit(4.0));
    assert!(!genome.is_bad());
}

#[test]
fn test_division_by_zero_on_only_row() {
    let catalog = OperatorCatalog::standard();
    let data = DataSource::from_rows(&[vec![5.0, 9.0]]).unwrap();
    let nodes = vec![op(&catalog, "Div"), Node::Constant(1.0), Node::Constant(0.0)];

    let row = ExpressionEvaluator::new(&catalog, &data).evaluate_row(&nodes, 0);
    assert_eq!(row, Err(EvalError::Domain { operator: "Div" }));

    let config = FitnessConfig::default();
    let evaluator = FitnessEvaluator::new(ExpressionEvaluator::new(&catalog, &data), &config);
    let mut genome = Genome::new(nodes);
    assert!(!evaluator.evaluate(&mut genome).is_fit());
    assert!(genome.is_bad());
    assert!(genome.fitness().is_nan());
}

#[test]
fn test_evaluation_is_idempotent() {
    let catalog = OperatorCatalog::standard();
    let data = DataSource::from_rows(&[
        vec![1.0, 0.5, 3.0],
        vec![2.0, 1.5, 1.0],
        vec![3.0, -2.0, 4.0],
    ])
    .unwrap();
    let config = FitnessConfig::default();
    let evaluator = FitnessEvaluator::new(ExpressionEvaluator::new(&catalog, &data), &config);

    // Sqrt(Mul(${1}, Invert(${2}))) fails on the negative third row.
    let nodes = vec![
        op(&catalog, "Sqrt"),
        op(&catalog, "Mul"),
        Node::Column(0),
        op(&catalog, "Invert"),
        Node::Column(1),
    ];
    for fraction in [0.0, 0.4] {
        let config = FitnessConfig { max_fraction_of_errors: fraction, ..config.clone() };
        let evaluator = FitnessEvaluator::new(ExpressionEvaluator::new(&catalog, &data), &config);
        let mut genome = Genome::new(nodes.clone());
        let first = evaluator.evaluate(&mut genome);
        let (bad, fitness) = (genome.is_bad(), genome.fitness().to_bits());
        for _ in 0..3 {
            assert_eq!(evaluator.evaluate(&mut genome), first);
            assert_eq!(genome.is_bad(), bad);
            assert_eq!(genome.fitness().to_bits(), fitness);
        }
    }

    let mut genome = Genome::new(nodes);
    assert_eq!(evaluator.evaluate(&mut genome), Evaluation::TooManyErrors { errors: 1 });
}

#[test]
fn test_intron_removal_keeps_value() {
    let catalog = OperatorCatalog::standard();
    let data = DataSource::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0]]).unwrap();
    let config = FitnessConfig { remove_introns: true, ..Default::default() };
    let evaluator = FitnessEvaluator::new(ExpressionEvaluator::new(&catalog, &data), &config);

    let mut genome = Genome::new(vec![
        op(&catalog, "Mul"),
        Node::Column(0),
        Node::Constant(2.0),
        op(&catalog, "Sqrt"),
        Node::Column(0),
    ]);
    assert_eq!(evaluator.evaluate(&mut genome), Evaluation::Fit(0.0));
    assert_eq!(genome.len(), 3);
    assert_eq!(genome.display(&catalog).to_string(), "Mul(${1},2.000000)");
}

#[test]
fn test_truncated_genome_is_bad() {
    let catalog = OperatorCatalog::standard();
    let data = DataSource::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
    let config = FitnessConfig { max_fraction_of_errors: 1.0, ..Default::default() };
    let evaluator = FitnessEvaluator::new(ExpressionEvaluator::new(&catalog, &data), &config);

    let mut genome = Genome::new(vec![op(&catalog, "Add"), Node::Column(0)]);
    assert_eq!(evaluator.evaluate(&mut genome), Evaluation::TooManyErrors { errors: 2 });
    assert!(genome.is_bad());
    assert_eq!(genome.display(&catalog).to_string(), "Add(${1},<EOF>)");
}
