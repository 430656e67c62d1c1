//! Key conventions of the wire format.

/// Prefix of the keys holding a table's collection.
pub const TABLE_PREFIX: &str = "$_";

/// Prefix of foreign key entries.
pub const KEY_PREFIX: &str = "$k_";

/// Prefix of meta-attributes.
pub const META_PREFIX: &str = "@";

pub const UUID: &str = "@uuid";
pub const CREATED_ON: &str = "@created_on";
pub const MODIFIED_ON: &str = "@modified_on";

/// Typed scalar wrapper.
pub const VALUE: &str = "@value";

/// Older scalar wrapper, still accepted on decode.
pub const LEGACY_VALUE: &str = "$";

pub const RESOURCE: &str = "@resource";
pub const URL: &str = "@url";
pub const FILENAME: &str = "@filename";

/// The collection key of `table`, `$_<table>`.
pub fn table_key(table: &str) -> String {
    format!("{TABLE_PREFIX}{table}")
}

/// The table named by a collection key.
pub fn table_name(key: &str) -> Option<&str> {
    key.strip_prefix(TABLE_PREFIX)
}

/// The foreign key entry of `field`, `$k_<field>`.
pub fn reference_key(field: &str) -> String {
    format!("{KEY_PREFIX}{field}")
}
