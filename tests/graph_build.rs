//! End-to-end tests for the schema graph transform and its wire format.

use schemascope::schema_graph::{
    build_graph, RawColumn, RawRelation, RawSchema, RawTable, RelationEnds, SchemaGraph,
};
use serde_json::Value;

fn omop_fixture() -> RawSchema {
    RawSchema {
        tables: vec![
            RawTable {
                name: "orders".to_string(),
                comment: Some("OMOP Comment : order header".to_string()),
                columns: vec![
                    RawColumn {
                        name: "id".to_string(),
                        data_type: "int8".to_string(),
                        comment: None,
                    },
                    RawColumn {
                        name: "customer_id".to_string(),
                        data_type: "int8".to_string(),
                        comment: Some(
                            "OMOP Comment : owner- APHP Annotation :maps to patient".to_string(),
                        ),
                    },
                ],
                relations: vec![RawRelation::ManyToOne(RelationEnds {
                    source_table: "orders".to_string(),
                    target_table: "customers".to_string(),
                })],
            },
            RawTable {
                name: "customers".to_string(),
                comment: None,
                columns: vec![RawColumn {
                    name: "id".to_string(),
                    data_type: "int8".to_string(),
                    comment: None,
                }],
                relations: vec![RawRelation::OneToMany(RelationEnds {
                    source_table: "customers".to_string(),
                    target_table: "orders".to_string(),
                })],
            },
        ],
    }
}

fn keys_of(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("expected a JSON object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn serialized_graph_uses_frontend_field_names() {
    let graph = build_graph(&omop_fixture()).unwrap();
    let value = serde_json::to_value(&graph).unwrap();

    assert_eq!(keys_of(&value), vec!["tables", "links"]);

    let table = &value["tables"][0];
    assert_eq!(
        keys_of(table),
        vec!["id", "_key", "name", "comment_omop", "comment_aphp", "columns"]
    );

    let column = &table["columns"][0];
    assert_eq!(
        keys_of(column),
        vec!["id", "_key", "name", "type", "comment_omop", "comment_aphp"]
    );

    let link = &value["links"][0];
    assert_eq!(keys_of(link), vec!["source", "target"]);
}

#[test]
fn annotations_reach_the_wire() {
    let graph = build_graph(&omop_fixture()).unwrap();
    let value = serde_json::to_value(&graph).unwrap();

    // Tables sort by name, so customers comes first.
    let orders = &value["tables"][1];
    assert_eq!(orders["name"], "orders");
    assert_eq!(orders["comment_omop"], "order header");
    assert_eq!(orders["comment_aphp"], "");

    // Columns sort by name too: customer_id before id.
    let customer_id = &orders["columns"][0];
    assert_eq!(customer_id["name"], "customer_id");
    assert_eq!(customer_id["type"], "int8");
    assert_eq!(customer_id["comment_omop"], "owner");
    assert_eq!(customer_id["comment_aphp"], "maps to patient");
}

#[test]
fn mirrored_foreign_key_serializes_as_one_link() {
    let graph = build_graph(&omop_fixture()).unwrap();
    assert_eq!(graph.links.len(), 1);

    let value = serde_json::to_value(&graph).unwrap();
    let tables = value["tables"].as_array().unwrap();
    let id_of = |name: &str| {
        tables
            .iter()
            .find(|t| t["name"] == name)
            .map(|t| t["id"].clone())
            .unwrap()
    };

    // orders appears first in source order, so its many-to-one descriptor
    // fixes the link direction.
    assert_eq!(value["links"][0]["source"], id_of("orders"));
    assert_eq!(value["links"][0]["target"], id_of("customers"));
}

#[test]
fn graph_round_trips_through_json() {
    let graph = build_graph(&omop_fixture()).unwrap();

    let encoded = serde_json::to_string(&graph).unwrap();
    let decoded: SchemaGraph = serde_json::from_str(&encoded).unwrap();

    assert_eq!(
        serde_json::to_value(&graph).unwrap(),
        serde_json::to_value(&decoded).unwrap()
    );
}

#[test]
fn ids_form_a_dense_zero_based_sequence() {
    let graph = build_graph(&omop_fixture()).unwrap();

    let mut ids: Vec<u64> = graph
        .tables
        .iter()
        .flat_map(|t| {
            std::iter::once(t.id.parse().unwrap())
                .chain(t.columns.iter().map(|c| c.id.parse().unwrap()))
        })
        .collect();
    ids.sort_unstable();

    let total = ids.len() as u64;
    assert_eq!(ids, (0..total).collect::<Vec<_>>());
}
