/// Widest operator the evaluator supports.
pub const MAX_ARITY: usize = 2;

/// Arithmetic primitive usable as an `Operator` node.
pub trait Primitive: Send + Sync {
    /// Display name, used when rendering expressions
    fn name(&self) -> &'static str;

    /// Number of child subtrees consumed (1 or 2)
    fn arity(&self) -> usize;

    /// Apply to exactly `arity()` arguments. Returns NaN on domain errors.
    fn eval(&self, args: &[f64]) -> f64;
}
