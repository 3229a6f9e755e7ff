//! Error types for the schema graph build.
//!
//! Both variants abort the whole build: a graph with misrouted or missing
//! links is worse than no graph, and the build only runs once at startup.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphBuildError {
    #[error("duplicate table name `{name}` in introspected schema; table ids would collide")]
    DuplicateTable { name: String },

    #[error("relation references unknown table `{name}` (from `{from_table}` to `{target}`)")]
    UnknownRelationTable {
        name: String,
        from_table: String,
        target: String,
    },
}
