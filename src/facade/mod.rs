//! Facade Module
//!
//! Domain-specific wrappers over the generic cache engine. Each facade
//! fixes its own capacity and default TTL and derives cache keys
//! deterministically from semantically meaningful inputs; none of them
//! alters the engine's eviction or expiry policy.

mod exports;
mod templates;

pub use exports::{ExportResultCache, EXPORT_CACHE_CAPACITY, EXPORT_NAMESPACE, EXPORT_TTL};
pub use templates::{TemplateCache, TEMPLATE_CACHE_CAPACITY, TEMPLATE_NAMESPACE, TEMPLATE_TTL};
