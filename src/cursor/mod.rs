//! # Pagination Cursors
//!
//! Opaque, query-bound position tokens and the seek predicates they expand
//! into.

mod codec;
mod seek;

pub use codec::{CursorBinding, CursorCodec, CURSOR_KEY_LEN};
pub use seek::{anchor_values, seek_clause};
