use crate::{key, Record, Reference, SourceMap};

use indexmap::IndexMap;
use outpost_core::schema::Tables;
use serde_json::Value as Json;
use std::collections::{HashSet, VecDeque};

/// Decoded records by table name and uuid.
pub type Decoded = IndexMap<String, IndexMap<String, Record>>;

/// Decodes the collection of `table` in `tree`, together with every item
/// it transitively references.
///
/// References are looked up anywhere in the tree, nested collections
/// included. Each `(table, uuid)` pair is looked up at most once, so
/// reference cycles terminate. References to items missing from the tree,
/// or to tables not in `tables`, are left unresolved. The result says
/// nothing about the order in which the records can be written.
pub fn decode(tables: &Tables, table: &str, tree: &Json) -> Decoded {
    let mut decoded = Decoded::new();

    let Some(root) = tables.get(table) else {
        tracing::warn!(table, "decoding a table that is not in the schema");
        return decoded;
    };

    let source = SourceMap::new(tree);
    let mut pending = VecDeque::new();

    let items = tree
        .get(key::table_key(table))
        .and_then(Json::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for item in items {
        let record = Record::new(root, item);
        pending.extend(record.references.values().cloned());
        add(&mut decoded, record);
    }

    let mut unknown = HashSet::<Reference>::new();

    while let Some(reference) = pending.pop_front() {
        if unknown.contains(&reference) || is_decoded(&decoded, &reference) {
            continue;
        }

        let found = tables
            .get(&reference.table)
            .zip(source.get(&reference.table, &reference.uuid));

        let Some((table, item)) = found else {
            tracing::debug!(table = %reference.table, uuid = %reference.uuid, "dependency not in source");
            unknown.insert(reference);
            continue;
        };

        let record = Record::new(table, item);
        pending.extend(record.references.values().cloned());
        add(&mut decoded, record);
    }

    decoded
}

fn add(decoded: &mut Decoded, record: Record) {
    decoded
        .entry(record.table.clone())
        .or_default()
        .insert(record.uuid.clone(), record);
}

fn is_decoded(decoded: &Decoded, reference: &Reference) -> bool {
    decoded
        .get(&reference.table)
        .is_some_and(|records| records.contains_key(&reference.uuid))
}
