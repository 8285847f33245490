//! # Pagination
//!
//! Cursor-based paging with stable ordering and an exact total.

mod page;
mod paginator;
mod request;

pub use page::Page;
pub use paginator::{CursorPaginator, DEFAULT_PAGE_LIMIT};
pub use request::PageRequest;
