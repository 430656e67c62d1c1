use super::Error;

/// Error when a table is not registered with the database.
#[derive(Debug)]
pub(super) struct TableNotFound {
    name: Box<str>,
}

impl std::error::Error for TableNotFound {}

impl core::fmt::Display for TableNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "table not found: {}", self.name)
    }
}

impl Error {
    /// Creates a table-not-found error.
    pub fn table_not_found(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TableNotFound(TableNotFound {
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is a table-not-found error.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TableNotFound(_))
    }
}
