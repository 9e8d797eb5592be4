use crate::error::{GenprogError, Result};
use crate::functions::{
    primitives::{Add, Div, Invert, Minus, Mul, Negate, Sqrt},
    traits::{Primitive, MAX_ARITY},
};
use std::{collections::HashMap, sync::Arc};

/// Catalog ids of the operators used to build algebraic identities
/// (`x+0`, `x-0`, `x*1`, `x/1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identities {
    pub add: usize,
    pub minus: usize,
    pub mul: usize,
    pub div: usize,
}

/// Read-only operator registry, built once and shared by every genome
/// operation. An operator's id is its registration index.
pub struct OperatorCatalog {
    operators: Vec<Arc<dyn Primitive>>,
    by_name: HashMap<&'static str, usize>,
    identities: Identities,
}

impl OperatorCatalog {
    /// The fixed arithmetic catalog: Add, Minus, Mul, Div, Negate, Invert, Sqrt.
    pub fn standard() -> Self {
        let operators: Vec<Arc<dyn Primitive>> = vec![
            Arc::new(Add),
            Arc::new(Minus),
            Arc::new(Mul),
            Arc::new(Div),
            Arc::new(Negate),
            Arc::new(Invert),
            Arc::new(Sqrt),
        ];
        let by_name = operators
            .iter()
            .enumerate()
            .map(|(id, op)| (op.name(), id))
            .collect();

        Self {
            operators,
            by_name,
            identities: Identities {
                add: 0,
                minus: 1,
                mul: 2,
                div: 3,
            },
        }
    }

    /// Build a catalog from an arbitrary primitive list. The list must contain
    /// `Add`, `Minus`, `Mul` and `Div`, and every arity must be 1 or 2.
    pub fn with_primitives(primitives: Vec<Arc<dyn Primitive>>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(primitives.len());
        for (id, primitive) in primitives.iter().enumerate() {
            if primitive.arity() == 0 || primitive.arity() > MAX_ARITY {
                return Err(GenprogError::Configuration(format!(
                    "Operator {} has arity {}, expected 1..={}",
                    primitive.name(),
                    primitive.arity(),
                    MAX_ARITY
                )));
            }
            if by_name.insert(primitive.name(), id).is_some() {
                return Err(GenprogError::Configuration(format!(
                    "Operator {} registered twice",
                    primitive.name()
                )));
            }
        }

        let lookup = |name: &str| {
            by_name.get(name).copied().ok_or_else(|| {
                GenprogError::Configuration(format!("Operator catalog lacks {}", name))
            })
        };
        let identities = Identities {
            add: lookup("Add")?,
            minus: lookup("Minus")?,
            mul: lookup("Mul")?,
            div: lookup("Div")?,
        };

        Ok(Self {
            operators: primitives,
            by_name,
            identities,
        })
    }

    pub fn get(&self, id: usize) -> Option<&dyn Primitive> {
        self.operators.get(id).map(|op| op.as_ref())
    }

    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn identities(&self) -> Identities {
        self.identities
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl Default for OperatorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
