//! Block model resolution.
//!
//! Connected texture models inherit geometry, texture variables and
//! overrides from their parents; this module flattens those chains.

pub mod model_resolver;

pub use model_resolver::ModelResolver;
