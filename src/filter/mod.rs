//! Filter compilation
//!
//! Flat `field[operator] -> value` entries become a typed boolean
//! [`FilterExpr`]. Operators are checked against a closed vocabulary and
//! operands against their operator at compile time, so the storage layer
//! only ever sees well-formed expressions.

mod compiler;
mod expr;
mod operator;

pub use compiler::{Combinator, FilterCompiler};
pub use expr::{Condition, FieldClause, FilterExpr};
pub use operator::FilterOperator;
