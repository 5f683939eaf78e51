//! Opaque-cursor pagination.
//!
//! # Responsibility
//! - Carry store continuation keys across calls as transport-safe strings.
//! - Normalize caller page sizes.
//!
//! # Invariants
//! - An empty cursor string always means "start" on input and "no further
//!   pages" on output.
//! - A non-empty cursor that cannot be decoded is an error, never a restart.

pub mod cursor;
pub mod page;

pub use cursor::{decode_cursor, encode_cursor, ContinuationKey, CursorError};
pub use page::{Page, PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
