use super::{meta, Table, Tables};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Component description as received with the table settings.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescription {
    /// The component table
    pub table: String,

    /// Key in the master table, defaults to `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkey: Option<String>,

    /// Foreign key in the component (or link) table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joinby: Option<String>,

    /// Whether the master can have more than one component record,
    /// defaults to `true`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,

    /// Link table of a many-to-many relationship
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Key in the link table pointing to the component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Key in the component table referenced by the link table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fkey: Option<String>,
}

/// A registered relationship from a master to a component table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    /// The component table
    pub table: String,

    /// Key in the master table
    pub pkey: String,

    /// Foreign key in the component table; for link-table hooks, the key
    /// in the component table the link points to
    pub fkey: Option<String>,

    pub multiple: bool,

    pub link: Option<Link>,
}

/// The link table of a many-to-many hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub table: String,

    /// Key in the link table pointing to the master
    pub lkey: Option<String>,

    /// Key in the link table pointing to the component
    pub rkey: Option<String>,
}

/// Registry of component hooks, keyed by master table or object type and
/// then by alias.
///
/// One registry lives in each [`Db`](crate::Db). It is filled when the
/// schema loads, pruned when a table is dropped and reset (user tables only)
/// when the schema reloads.
#[derive(Debug, Default, Clone)]
pub struct ComponentRegistry {
    hooks: IndexMap<String, IndexMap<String, Hook>>,
}

impl ComponentRegistry {
    pub fn new() -> ComponentRegistry {
        ComponentRegistry::default()
    }

    /// Registers the component `alias` of `table`.
    ///
    /// When `table` has no field named like the parent key, the hook is
    /// registered against the object type the table declares for that key.
    /// The first registration of an alias wins.
    pub fn add_component(&mut self, table: &Table, alias: &str, description: &ComponentDescription) {
        let pkey = description.pkey.as_deref().unwrap_or(meta::IDENTITY);

        let master = if table.has_field(pkey) {
            Some(table.name.as_str())
        } else {
            table.object_type(pkey)
        };

        let Some(master) = master else {
            tracing::debug!(table = %table.name, alias, pkey, "no master for component; skipping");
            return;
        };

        let hook = match &description.link {
            Some(link) => Hook {
                table: description.table.clone(),
                pkey: pkey.to_string(),
                fkey: Some(description.fkey.clone().unwrap_or_else(|| meta::IDENTITY.to_string())),
                multiple: description.multiple.unwrap_or(true),
                link: Some(Link {
                    table: link.clone(),
                    lkey: description.joinby.clone(),
                    rkey: description.key.clone(),
                }),
            },
            None => Hook {
                table: description.table.clone(),
                pkey: pkey.to_string(),
                fkey: description.joinby.clone(),
                multiple: description.multiple.unwrap_or(true),
                link: None,
            },
        };

        self.hooks
            .entry(master.to_string())
            .or_default()
            .entry(alias.to_string())
            .or_insert(hook);
    }

    /// All hooks of `table`, including those inherited from its object
    /// types. Hooks registered directly against the table win.
    pub fn hooks(&self, table: &Table) -> IndexMap<String, Hook> {
        let mut all = IndexMap::new();

        for object_type in table.object_types() {
            if let Some(hooks) = self.hooks.get(object_type) {
                for (alias, hook) in hooks {
                    all.insert(alias.clone(), object_hook(hook));
                }
            }
        }

        if let Some(hooks) = self.hooks.get(&table.name) {
            for (alias, hook) in hooks {
                all.insert(alias.clone(), hook.clone());
            }
        }

        all
    }

    /// The hook for `alias` of `table`.
    pub fn component(&self, table: &Table, alias: &str) -> Option<Hook> {
        if let Some(hook) = self.hooks.get(&table.name).and_then(|hooks| hooks.get(alias)) {
            return Some(hook.clone());
        }

        table.object_types().find_map(|object_type| {
            self.hooks
                .get(object_type)
                .and_then(|hooks| hooks.get(alias))
                .map(object_hook)
        })
    }

    /// True if `table_name` is the component or link table of any hook.
    pub fn has_parent(&self, table_name: &str) -> bool {
        self.iter().any(|hook| {
            hook.table == table_name
                || hook
                    .link
                    .as_ref()
                    .is_some_and(|link| link.table == table_name)
        })
    }

    /// Removes the hooks of `table`, and the hooks of each of its object
    /// types that no table in `tables` is an instance of anymore.
    pub fn remove_hooks(&mut self, table: &Table, tables: &Tables) {
        self.hooks.shift_remove(&table.name);

        for object_type in table.object_types() {
            let in_use = tables
                .values()
                .filter(|other| other.name != table.name)
                .any(|other| other.object_types().any(|t| t == object_type));

            if !in_use {
                self.hooks.shift_remove(object_type);
            }
        }
    }

    /// Removes every hook involving a user table. Hooks between system
    /// tables survive.
    pub fn reset(&mut self) {
        self.hooks.retain(|master, _| meta::is_system_table(master));

        for hooks in self.hooks.values_mut() {
            hooks.retain(|_, hook| {
                meta::is_system_table(&hook.table)
                    && hook
                        .link
                        .as_ref()
                        .map_or(true, |link| meta::is_system_table(&link.table))
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.values().all(IndexMap::is_empty)
    }

    fn iter(&self) -> impl Iterator<Item = &Hook> + '_ {
        self.hooks.values().flat_map(IndexMap::values)
    }
}

fn object_hook(hook: &Hook) -> Hook {
    Hook {
        pkey: meta::OBJECT_KEY.to_string(),
        ..hook.clone()
    }
}
