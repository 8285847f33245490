//! # Document Store
//!
//! Storage collaborator for the query layer: the [`DocumentStore`] trait,
//! document field access, value ordering, and the in-memory
//! [`MemoryStore`].

mod backend;
mod document;
mod errors;
mod matcher;
mod memory;
mod sorter;
mod value;

pub use backend::{DocumentStore, UpdateMode, UpdateOutcome};
pub use document::{document_id, field_value, ID_FIELD};
pub use errors::{StoreError, StoreResult};
pub use matcher::CompiledFilter;
pub use memory::{MemoryStore, CREATED_AT_FIELD, UPDATED_AT_FIELD};
pub use sorter::ResultSorter;
pub use value::{compare_same_class, compare_values, values_equal};
