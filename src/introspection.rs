//! PostgreSQL catalog introspection.
//!
//! Produces the [`RawSchema`] consumed by the graph builder: tables with
//! their comments, columns in attribute order, and the foreign keys of the
//! target schema expressed as directional relation descriptors. Tables are
//! fetched ordered by name and columns by `attnum`, so the builder's id
//! assignment is deterministic across runs against an unchanged database.

use std::env;

use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use thiserror::Error;

use crate::schema_graph::{RawColumn, RawRelation, RawSchema, RawTable, RelationEnds};

#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("schema introspection query failed: {0}")]
    Query(#[from] sqlx::Error),
}

fn read_env_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Build a lazy connection pool from `DATABASE_URL`, if set and parseable.
pub fn try_get_pool() -> Option<PgPool> {
    let url = read_env_var("DATABASE_URL")?;
    match PgPoolOptions::new().max_connections(4).connect_lazy(&url) {
        Ok(pool) => Some(pool),
        Err(e) => {
            log::error!("Invalid DATABASE_URL: {}", e);
            None
        }
    }
}

/// Test basic PostgreSQL connectivity
pub async fn test_connection(pool: &PgPool) -> Result<(), IntrospectError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[derive(Debug, FromRow)]
struct TableRow {
    name: String,
    comment: Option<String>,
}

#[derive(Debug, FromRow)]
struct ColumnRow {
    name: String,
    data_type: String,
    comment: Option<String>,
}

#[derive(Debug, FromRow)]
struct ForeignKeyRow {
    referencing_table: String,
    referenced_table: String,
}

/// Fetch the raw description of every ordinary table in `db_schema`.
pub async fn fetch_raw_schema(
    pool: &PgPool,
    db_schema: &str,
) -> Result<RawSchema, IntrospectError> {
    let table_rows = list_tables(pool, db_schema).await?;

    let mut tables = Vec::with_capacity(table_rows.len());
    for row in table_rows {
        let columns = list_columns(pool, db_schema, &row.name).await?;
        tables.push(RawTable {
            name: row.name,
            comment: row.comment,
            columns,
            relations: Vec::new(),
        });
    }

    attach_relations(pool, db_schema, &mut tables).await?;

    Ok(RawSchema { tables })
}

async fn list_tables(pool: &PgPool, db_schema: &str) -> Result<Vec<TableRow>, IntrospectError> {
    let rows = sqlx::query_as::<_, TableRow>(
        r#"
        SELECT c.relname AS name,
               obj_description(c.oid, 'pg_class') AS comment
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE c.relkind = 'r' AND n.nspname = $1
        ORDER BY c.relname
        "#,
    )
    .bind(db_schema)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

async fn list_columns(
    pool: &PgPool,
    db_schema: &str,
    table: &str,
) -> Result<Vec<RawColumn>, IntrospectError> {
    let rows = sqlx::query_as::<_, ColumnRow>(
        r#"
        SELECT a.attname AS name,
               format_type(a.atttypid, a.atttypmod) AS data_type,
               col_description(a.attrelid, a.attnum) AS comment
        FROM pg_attribute a
        JOIN pg_class c ON c.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE n.nspname = $1
          AND c.relname = $2
          AND a.attnum > 0
          AND NOT a.attisdropped
        ORDER BY a.attnum
        "#,
    )
    .bind(db_schema)
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| RawColumn {
            name: row.name,
            data_type: row.data_type,
            comment: row.comment,
        })
        .collect())
}

/// Attach both directional views of every foreign key in the schema.
///
/// A constraint `child → parent` becomes a `OneToMany` descriptor on the
/// parent and a `ManyToOne` descriptor on the child. The builder later
/// collapses the pair into one link. Constraints reaching outside the
/// introspected schema are excluded by the query.
async fn attach_relations(
    pool: &PgPool,
    db_schema: &str,
    tables: &mut [RawTable],
) -> Result<(), IntrospectError> {
    let rows = sqlx::query_as::<_, ForeignKeyRow>(
        r#"
        SELECT src.relname AS referencing_table,
               tgt.relname AS referenced_table
        FROM pg_constraint con
        JOIN pg_class src ON src.oid = con.conrelid
        JOIN pg_class tgt ON tgt.oid = con.confrelid
        JOIN pg_namespace sn ON sn.oid = src.relnamespace
        JOIN pg_namespace tn ON tn.oid = tgt.relnamespace
        WHERE con.contype = 'f'
          AND sn.nspname = $1
          AND tn.nspname = $1
        ORDER BY con.conname
        "#,
    )
    .bind(db_schema)
    .fetch_all(pool)
    .await?;

    for fk in rows {
        if let Some(parent) = tables.iter_mut().find(|t| t.name == fk.referenced_table) {
            parent
                .relations
                .push(RawRelation::OneToMany(RelationEnds {
                    source_table: fk.referenced_table.clone(),
                    target_table: fk.referencing_table.clone(),
                }));
        }
        if let Some(child) = tables.iter_mut().find(|t| t.name == fk.referencing_table) {
            child.relations.push(RawRelation::ManyToOne(RelationEnds {
                source_table: fk.referencing_table.clone(),
                target_table: fk.referenced_table.clone(),
            }));
        }
    }

    Ok(())
}
