//! Raw schema description as delivered by catalog introspection.
//!
//! These are boundary types: the introspection layer fills them in and the
//! builder consumes them. They carry the source ordering of the catalog
//! queries, which the builder relies on for deterministic id assignment.

use serde::{Deserialize, Serialize};

/// A column as reported by the catalog, before any transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub data_type: String,
    pub comment: Option<String>,
}

/// Both endpoints of a relation, by table name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEnds {
    pub source_table: String,
    pub target_table: String,
}

/// A directional view of a foreign-key constraint.
///
/// One constraint between a referencing and a referenced table shows up
/// twice: as `OneToMany` on the referenced side and `ManyToOne` on the
/// referencing side. Many-to-many is deliberately absent — it decomposes
/// into the pairs already present via the join table, and carrying it would
/// reintroduce the duplicates the deduplicator removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawRelation {
    OneToMany(RelationEnds),
    ManyToOne(RelationEnds),
}

impl RawRelation {
    pub fn ends(&self) -> &RelationEnds {
        match self {
            RawRelation::OneToMany(ends) | RawRelation::ManyToOne(ends) => ends,
        }
    }

    pub fn is_one_to_many(&self) -> bool {
        matches!(self, RawRelation::OneToMany(_))
    }
}

/// A table as reported by the catalog: columns in attribute order and the
/// relation descriptors attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    pub name: String,
    pub comment: Option<String>,
    pub columns: Vec<RawColumn>,
    pub relations: Vec<RawRelation>,
}

/// The whole introspected schema, tables in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSchema {
    pub tables: Vec<RawTable>,
}
