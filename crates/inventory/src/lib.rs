//! Inventory domain module.
//!
//! An id-keyed [`Store`] of validated [`Item`]s, with full-snapshot CSV
//! persistence. Every mutation validates before it commits.

pub mod item;
pub mod persistence;
pub mod store;

pub use item::{Item, ItemChanges};
pub use persistence::{LoadPolicy, PersistenceError, HEADER};
pub use store::Store;
pub use stockpile_core::{DomainError, DomainResult, ItemId};
