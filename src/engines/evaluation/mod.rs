pub mod expression;
pub mod fitness;

pub use expression::{subtree_end, ExpressionDisplay, ExpressionEvaluator, RowValue};
pub use fitness::{Evaluation, FitnessEvaluator};
