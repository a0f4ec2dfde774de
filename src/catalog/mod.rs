//! Catalog assembly: data model, content-source boundary, the tree builder,
//! and the bucket classifiers used to re-shape "tools" and "glossary".

pub mod buckets;
pub mod builder;
pub mod model;
pub mod source;

pub use builder::{AssembledLocale, BuildOptions, BuildReport, CatalogBuilder};
pub use model::{Category, Component, Root};
