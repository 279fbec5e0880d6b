//! Entity models and their DTOs.
//!
//! Each kind has a row struct (`FromRow` + `Serialize`), a `Create*` DTO for
//! request bodies, a `New*` struct that the store inserts (request fields plus
//! the back-references the engine fills in), and an `Update*` DTO where every
//! field is optional. Reference sets and counters are never part of a DTO;
//! they only change through the relation primitives.

pub mod character;
pub mod costume;
pub mod image;
pub mod location;
pub mod measurements;
pub mod project;
pub mod record;
pub mod scene;

pub use record::{Entity, NewRecord, Record, RecordPatch};
