pub mod db;
pub use db::Db;

pub mod driver;
pub use driver::{Adapter, Compiler};

mod error;
pub use error::{Error, IntoError};

pub mod schema;
pub use schema::{Field, Table};

pub mod stmt;

/// A Result type alias that uses Outpost's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
