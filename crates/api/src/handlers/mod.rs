//! HTTP handlers, one module per resource. Each handler extracts the caller
//! and path ids and hands them to the engine unparsed.

pub mod character;
pub mod costume;
pub mod image;
pub mod location;
pub mod measurements;
pub mod project;
pub mod scene;
