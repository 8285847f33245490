//! docquery - filter, sort and cursor pagination over JSON document stores
//!
//! Query parameters compile into a [`FilterExpr`] and a [`SortSpec`];
//! the [`CursorPaginator`] pages through a [`DocumentStore`] with opaque,
//! encrypted cursors, and the [`Repository`] adds capped CRUD helpers.

pub mod cli;
pub mod config;
pub mod cursor;
pub mod errors;
pub mod filter;
pub mod limits;
pub mod logging;
pub mod pagination;
pub mod params;
pub mod repository;
pub mod sort;
pub mod store;

pub use config::{ConfigError, QueryConfig};
pub use cursor::{CursorBinding, CursorCodec};
pub use errors::{QueryError, QueryResult};
pub use filter::{Combinator, FilterCompiler, FilterExpr, FilterOperator};
pub use limits::{CappedOperation, OperationCap, DEFAULT_MAX_OPERATIONS};
pub use pagination::{CursorPaginator, Page, PageRequest};
pub use params::{ParamType, ParamTypes, QueryParams};
pub use repository::Repository;
pub use sort::{SortCompiler, SortDirection, SortSpec};
pub use store::{DocumentStore, MemoryStore, StoreError, UpdateMode, UpdateOutcome};
