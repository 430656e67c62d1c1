use crate::key;

use indexmap::IndexMap;
use serde_json::Value as Json;

/// Index of a tree's items by table and uuid.
///
/// Nested collections are indexed too. Items without a uuid cannot be
/// referenced and are left out. When a uuid appears twice in the same
/// table, the later item wins.
#[derive(Debug, Default)]
pub struct SourceMap<'a> {
    tables: IndexMap<&'a str, IndexMap<&'a str, &'a Json>>,
}

impl<'a> SourceMap<'a> {
    pub fn new(tree: &'a Json) -> SourceMap<'a> {
        let mut map = SourceMap::default();
        map.index(tree);
        map
    }

    fn index(&mut self, item: &'a Json) {
        let Some(object) = item.as_object() else {
            return;
        };

        for (name, collection) in object {
            let (Some(table), Some(items)) = (key::table_name(name), collection.as_array())
            else {
                continue;
            };

            for item in items {
                let Some(uuid) = item.get(key::UUID).and_then(Json::as_str) else {
                    continue;
                };

                self.tables.entry(table).or_default().insert(uuid, item);
                self.index(item);
            }
        }
    }

    /// The item of `table` identified by `uuid`.
    pub fn get(&self, table: &str, uuid: &str) -> Option<&'a Json> {
        self.tables.get(table)?.get(uuid).copied()
    }

    /// The first item identified by `uuid` in any table.
    pub fn get_any(&self, uuid: &str) -> Option<(&'a str, &'a Json)> {
        self.tables
            .iter()
            .find_map(|(table, items)| items.get(uuid).map(|item| (*table, *item)))
    }

    /// Names of the indexed tables.
    pub fn tables(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tables.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
