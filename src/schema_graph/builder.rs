//! One-shot transform from the raw schema into the renderable graph.
//!
//! Ids are drawn from a single sequence shared by tables and columns, in
//! traversal order: each table's columns first (source order), then the
//! table itself. Links reference table ids, so the traversal order must be
//! deterministic for the output to be stable across runs — introspection
//! guarantees this by ordering its catalog queries.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::annotations::{split_comment, CommentAnnotations};
use super::errors::GraphBuildError;
use super::raw::{RawSchema, RawTable, RelationEnds};

/// A column node in the output graph.
///
/// `key` is a per-build addressing handle for the frontend, derived from
/// the source position of the table and column, not from the sorted output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    #[serde(rename = "_key")]
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(flatten)]
    pub comments: CommentAnnotations,
}

/// A table node in the output graph, owning its columns sorted by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    #[serde(rename = "_key")]
    pub key: String,
    pub name: String,
    #[serde(flatten)]
    pub comments: CommentAnnotations,
    pub columns: Vec<Column>,
}

/// An undirected relation between two tables, materialized with one fixed
/// direction. Endpoints are table ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

/// The complete graph served by the query endpoint. Immutable once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaGraph {
    pub tables: Vec<Table>,
    pub links: Vec<Link>,
}

/// Sequential id source shared across tables and columns of one build.
#[derive(Debug, Default)]
struct IdSequence {
    next: u64,
}

impl IdSequence {
    fn next_id(&mut self) -> String {
        let id = self.next.to_string();
        self.next += 1;
        id
    }
}

/// Build the graph from an introspected raw schema.
///
/// Fails fast on duplicate table names and on relations referencing tables
/// absent from the schema; a partially wired graph is never returned.
pub fn build_graph(raw: &RawSchema) -> Result<SchemaGraph, GraphBuildError> {
    let mut ids = IdSequence::default();
    let mut tables = Vec::with_capacity(raw.tables.len());
    let mut id_by_name: IndexMap<String, String> = IndexMap::new();

    for (i, raw_table) in raw.tables.iter().enumerate() {
        let row_key = format!("row-{}", i);

        let mut columns: Vec<Column> = raw_table
            .columns
            .iter()
            .enumerate()
            .map(|(j, raw_column)| Column {
                id: ids.next_id(),
                key: format!("{}-col-{}", row_key, j),
                name: raw_column.name.clone(),
                data_type: raw_column.data_type.clone(),
                comments: split_comment(raw_column.comment.as_deref()),
            })
            .collect();
        columns.sort_by(|a, b| a.name.cmp(&b.name));

        // The table takes its id after all of its columns, so a table id is
        // always numerically greater than every column id it owns.
        let table = Table {
            id: ids.next_id(),
            key: row_key,
            name: raw_table.name.clone(),
            comments: split_comment(raw_table.comment.as_deref()),
            columns,
        };

        if id_by_name
            .insert(table.name.clone(), table.id.clone())
            .is_some()
        {
            return Err(GraphBuildError::DuplicateTable { name: table.name });
        }
        tables.push(table);
    }
    tables.sort_by(|a, b| a.name.cmp(&b.name));

    let links = dedupe_links(&raw.tables, &id_by_name)?;

    Ok(SchemaGraph { tables, links })
}

/// Collapse the directional relation descriptors into one link per
/// connected table pair.
///
/// A foreign key is described twice in the raw schema, once from each side.
/// The reverse-edge guard keeps whichever direction is seen first and drops
/// the mirror. Self-referencing relations come through as a link with
/// identical endpoints.
fn dedupe_links(
    raw_tables: &[RawTable],
    id_by_name: &IndexMap<String, String>,
) -> Result<Vec<Link>, GraphBuildError> {
    let mut link_set: IndexMap<String, IndexSet<String>> = IndexMap::new();

    for raw_table in raw_tables {
        // One-to-many descriptors are processed before many-to-one ones
        // within each table.
        let ordered = raw_table
            .relations
            .iter()
            .filter(|r| r.is_one_to_many())
            .chain(raw_table.relations.iter().filter(|r| !r.is_one_to_many()));

        for relation in ordered {
            let ends = relation.ends();
            let source_id = resolve_table_id(id_by_name, &ends.source_table, ends)?;
            let target_id = resolve_table_id(id_by_name, &ends.target_table, ends)?;

            // Skip when the pair is already linked the other way round.
            if link_set
                .get(&target_id)
                .is_some_and(|targets| targets.contains(&source_id))
            {
                continue;
            }
            link_set.entry(source_id).or_default().insert(target_id);
        }
    }

    let links = link_set
        .into_iter()
        .flat_map(|(source, targets)| {
            targets.into_iter().map(move |target| Link {
                source: source.clone(),
                target,
            })
        })
        .collect();

    Ok(links)
}

fn resolve_table_id(
    id_by_name: &IndexMap<String, String>,
    name: &str,
    ends: &RelationEnds,
) -> Result<String, GraphBuildError> {
    id_by_name
        .get(name)
        .cloned()
        .ok_or_else(|| GraphBuildError::UnknownRelationTable {
            name: name.to_string(),
            from_table: ends.source_table.clone(),
            target: ends.target_table.clone(),
        })
}
