use super::Value;

use indexmap::IndexMap;

/// Field values of a single record, keyed by field name.
///
/// `Data` is what the write operations of a [`Table`](crate::Table) take.
/// Tagging it with [`Data::skip_defaults`] makes `Table::update` write the
/// values exactly as given, without merging update-defaults.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Data {
    values: IndexMap<String, Value>,
    skip_defaults: bool,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the data so that no update-defaults are merged into it.
    pub fn skip_defaults(mut self) -> Self {
        self.skip_defaults = true;
        self
    }

    pub fn is_skip_defaults(&self) -> bool {
        self.skip_defaults
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Builder form of [`Data::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    /// Copies every value of `other` into `self`, overwriting existing
    /// entries.
    pub fn extend(&mut self, other: Data) {
        self.values.extend(other.values);
    }
}

impl<K, V> FromIterator<(K, V)> for Data
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Data {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
            skip_defaults: false,
        }
    }
}

impl IntoIterator for Data {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl std::ops::Index<&str> for Data {
    type Output = Value;

    #[track_caller]
    fn index(&self, name: &str) -> &Value {
        self.values
            .get(name)
            .unwrap_or_else(|| panic!("no value for field `{name}`"))
    }
}
