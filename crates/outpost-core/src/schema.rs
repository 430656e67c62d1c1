pub mod component;
pub use component::{ComponentDescription, ComponentRegistry, Hook, Link};

mod field;
pub use field::{DefaultValue, Field, FieldDescription, FieldOptions, FieldType, ForeignKey};

pub mod meta;

mod table;
pub use table::{Settings, Table};

use indexmap::IndexMap;
use std::sync::Arc;

/// Registered tables by name.
pub type Tables = IndexMap<String, Arc<Table>>;
