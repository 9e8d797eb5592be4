use serde::{Deserialize, Serialize};

/// One element of a genome's pre-order encoding.
///
/// Operators carry no child pointers: an `Operator` consumes the next
/// `arity` subtrees that follow it in the sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Node {
    Constant(f64),
    /// Zero-based input column; the target column is never referenced.
    Column(usize),
    /// Index into the operator catalog.
    Operator(usize),
}

/// Node kind without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Constant,
    Column,
    Operator,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Constant(_) => NodeKind::Constant,
            Node::Column(_) => NodeKind::Column,
            Node::Operator(_) => NodeKind::Operator,
        }
    }
}

// Bitwise equality on constants, so that clone detection and duplicate
// removal compare exact encodings (0.0 and -0.0 differ).
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Constant(a), Node::Constant(b)) => a.to_bits() == b.to_bits(),
            (Node::Column(a), Node::Column(b)) => a == b,
            (Node::Operator(a), Node::Operator(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Node {}
