pub mod content_types;
pub mod ooxml;
pub mod relationships;

pub use content_types::ContentTypes;
pub use ooxml::{relative_target, resolve_target, OoxmlPackage};
pub use relationships::Relationship;
