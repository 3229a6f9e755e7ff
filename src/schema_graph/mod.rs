//! Schema graph model and the one-shot transform that produces it.
//!
//! The raw table/column/relation description delivered by introspection is
//! converted exactly once, at startup, into a [`SchemaGraph`]: tables sorted
//! by name carrying their sorted columns, and an undirected, deduplicated
//! link set between them. The graph is immutable after the build.

pub mod annotations;
pub mod builder;
pub mod errors;
pub mod raw;

pub use annotations::{split_comment, CommentAnnotations};
pub use builder::{build_graph, Column, Link, SchemaGraph, Table};
pub use errors::GraphBuildError;
pub use raw::{RawColumn, RawRelation, RawSchema, RawTable, RelationEnds};
