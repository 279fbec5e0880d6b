//! Pure domain types for the costume production backend.
//!
//! Nothing in this crate performs I/O. It defines identifiers, the error
//! vocabulary shared by every layer, the catalog of entity relations, and the
//! small policies (costume numbering, cascade stages, path shape) that the
//! engine applies on top of a store.

pub mod cascade;
pub mod error;
pub mod kinds;
pub mod numbering;
pub mod path;
pub mod relations;
pub mod search;
pub mod types;
