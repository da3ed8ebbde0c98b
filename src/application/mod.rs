//! Application services layer.

pub mod error;
pub mod hierarchy;
pub mod store;
