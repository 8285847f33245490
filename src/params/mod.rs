//! # Query Parameters
//!
//! URL query parameters to filters and page requests.

mod cast;
mod parser;

pub use cast::{ParamType, ParamTypes};
pub use parser::QueryParams;
