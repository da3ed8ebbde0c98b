//! Domain layer: resource paths, the attribute document format and the
//! course hierarchy vocabulary.

pub mod document;
pub mod hierarchy;
pub mod path;
