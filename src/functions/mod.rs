pub mod primitives;
pub mod registry;
pub mod traits;

pub use registry::{Identities, OperatorCatalog};
pub use traits::{Primitive, MAX_ARITY};
