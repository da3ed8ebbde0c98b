//! Hydra content layer: resolves course, lesson and problem documents from a
//! content tree and serves their attributes through a TTL-bounded shared cache.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
