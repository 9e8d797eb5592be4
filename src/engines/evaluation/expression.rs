//! Recursive-descent interpretation of pre-order node sequences.
//!
//! A genome is read from index 0 with a single cursor: every node advances it
//! by one, and an operator reads its children one after another, so sibling
//! subtrees occupy disjoint, contiguous ranges. Nothing checks structure up
//! front; a sequence that ends before the root is complete fails with
//! [`EvalError::Truncated`].

use crate::data::DataSource;
use crate::error::EvalError;
use crate::functions::{OperatorCatalog, MAX_ARITY};
use crate::types::Node;
use std::fmt;

/// Value of the root expression for one row, and how many nodes it read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowValue {
    pub value: f64,
    pub consumed: usize,
}

pub struct ExpressionEvaluator<'a> {
    catalog: &'a OperatorCatalog,
    data: &'a DataSource,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(catalog: &'a OperatorCatalog, data: &'a DataSource) -> Self {
        Self { catalog, data }
    }

    pub fn data(&self) -> &'a DataSource {
        self.data
    }

    /// Evaluate the expression rooted at node 0 against one row.
    pub fn evaluate_row(&self, nodes: &[Node], row: usize) -> Result<RowValue, EvalError> {
        let mut cursor = 0;
        let value = self.eval_at(nodes, row, &mut cursor)?;
        Ok(RowValue { value, consumed: cursor })
    }

    fn eval_at(&self, nodes: &[Node], row: usize, cursor: &mut usize) -> Result<f64, EvalError> {
        let position = *cursor;
        let node = nodes
            .get(position)
            .ok_or(EvalError::Truncated { position })?;
        *cursor += 1;

        match *node {
            Node::Constant(value) => Ok(value),
            Node::Column(column) => self
                .data
                .cell_at(row, column)
                .map_err(|_| EvalError::Cell { row, column }),
            Node::Operator(id) => {
                let op = self.catalog.get(id).ok_or(EvalError::UnknownOperator(id))?;
                let arity = op.arity();
                let mut args = [0.0; MAX_ARITY];
                for slot in args.iter_mut().take(arity) {
                    let value = self.eval_at(nodes, row, cursor)?;
                    if value.is_nan() {
                        return Err(EvalError::Domain { operator: op.name() });
                    }
                    *slot = value;
                }

                let value = op.eval(&args[..arity]);
                if value.is_nan() {
                    return Err(EvalError::Domain { operator: op.name() });
                }
                Ok(value)
            }
        }
    }
}

/// End (exclusive) of the subtree starting at `start`, or `None` if the
/// sequence runs out first or references an unknown operator.
pub fn subtree_end(nodes: &[Node], start: usize, catalog: &OperatorCatalog) -> Option<usize> {
    // Number of subtrees still to be read.
    let mut pending = 1usize;
    let mut position = start;
    while pending > 0 {
        let node = nodes.get(position)?;
        pending -= 1;
        if let Node::Operator(id) = node {
            pending += catalog.get(*id)?.arity();
        }
        position += 1;
    }
    Some(position)
}

/// Fully parenthesized prefix rendering, e.g. `Mul(${1},2.000000)`.
///
/// Constants print with six decimals, columns as 1-based `${n}`. A missing
/// subtree prints as `<EOF>`.
pub struct ExpressionDisplay<'a> {
    nodes: &'a [Node],
    catalog: &'a OperatorCatalog,
}

impl<'a> ExpressionDisplay<'a> {
    pub fn new(nodes: &'a [Node], catalog: &'a OperatorCatalog) -> Self {
        Self { nodes, catalog }
    }

    fn write_at(&self, f: &mut fmt::Formatter<'_>, cursor: &mut usize) -> fmt::Result {
        let Some(node) = self.nodes.get(*cursor) else {
            return write!(f, "<EOF>");
        };
        *cursor += 1;

        match *node {
            Node::Constant(value) => write!(f, "{:.6}", value),
            Node::Column(column) => write!(f, "${{{}}}", column + 1),
            Node::Operator(id) => match self.catalog.get(id) {
                None => write!(f, "<op#{}>", id),
                Some(op) => {
                    write!(f, "{}(", op.name())?;
                    for i in 0..op.arity() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        self.write_at(f, cursor)?;
                    }
                    write!(f, ")")
                }
            },
        }
    }
}

impl fmt::Display for ExpressionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cursor = 0;
        self.write_at(f, &mut cursor)
    }
}
