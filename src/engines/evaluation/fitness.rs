use super::expression::{ExpressionEvaluator, RowValue};
use crate::config::FitnessConfig;
use crate::engines::generation::genome::Genome;

/// Outcome of scoring one genome against every row of the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    Fit(f64),
    /// More rows failed than the error budget allows, or none succeeded.
    TooManyErrors { errors: usize },
    /// Constant output across rows, or a fitness that is not a number.
    Degenerate,
}

impl Evaluation {
    pub fn is_fit(&self) -> bool {
        matches!(self, Evaluation::Fit(_))
    }

    pub fn fitness(&self) -> Option<f64> {
        match self {
            Evaluation::Fit(value) => Some(*value),
            _ => None,
        }
    }
}

/// Scores genomes: sums the configured error metric between each row's
/// output and the target, and records the result on the genome.
pub struct FitnessEvaluator<'a> {
    expression: ExpressionEvaluator<'a>,
    config: &'a FitnessConfig,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(expression: ExpressionEvaluator<'a>, config: &'a FitnessConfig) -> Self {
        Self { expression, config }
    }

    /// Evaluate `genome` on every row. Sets its `bad` flag and fitness, and
    /// truncates trailing introns when configured to.
    pub fn evaluate(&self, genome: &mut Genome) -> Evaluation {
        let outcome = self.score(genome);
        match outcome {
            Evaluation::Fit(value) => genome.set_fitness(value),
            _ => genome.mark_bad(),
        }
        log::trace!("{} nodes -> {:?}", genome.len(), outcome);
        outcome
    }

    fn score(&self, genome: &mut Genome) -> Evaluation {
        genome.reset_evaluation();

        let data = self.expression.data();
        let rows = data.row_count();
        let max_errors = (self.config.max_fraction_of_errors * rows as f64).floor() as usize;

        let mut outputs: Vec<Option<f64>> = Vec::with_capacity(rows);
        let mut errors = 0;
        for row in 0..rows {
            match self.expression.evaluate_row(genome.nodes(), row) {
                Ok(RowValue { value, consumed }) => {
                    if self.config.remove_introns {
                        genome.truncate(consumed);
                    }
                    outputs.push(Some(value));
                }
                Err(err) => {
                    log::trace!("row {}: {}", row, err);
                    errors += 1;
                    if errors > max_errors {
                        return Evaluation::TooManyErrors { errors };
                    }
                    outputs.push(None);
                }
            }
        }

        let successes = outputs.iter().flatten().count();
        if successes == 0 {
            return Evaluation::TooManyErrors { errors };
        }

        let (min, max) = outputs
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        // One unnormalized sample may be constant.
        if min == max && (self.config.normalize_data || successes > 1) {
            return Evaluation::Degenerate;
        }

        let fitness: f64 = outputs
            .iter()
            .enumerate()
            .filter_map(|(row, value)| value.map(|v| (row, v)))
            .map(|(row, value)| {
                let diff = if self.config.normalize_data {
                    (value - min) / (max - min) - data.normalized_target(row)
                } else {
                    value - data.target(row)
                };
                self.config.metric.apply(diff)
            })
            .sum();

        if fitness.is_nan() {
            return Evaluation::Degenerate;
        }
        Evaluation::Fit(fitness)
    }
}
