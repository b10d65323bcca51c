//! Document layer
//! - edit.rs: applying change batches to a text snapshot
//! - store.rs: per-URI text buffers with serialized access
//! - error.rs: edit errors

pub mod edit;
pub mod error;
pub mod store;

pub use edit::{EditOperation, apply_edits};
pub use error::EditError;
pub use store::{Document, DocumentStore};
