mod compiler;
pub use compiler::Compiler;

mod response;
pub use response::Response;

mod statement;
pub use statement::Statement;

use crate::{async_trait, Result};

use std::fmt::Debug;

/// A storage adapter.
///
/// All statements of a database funnel through a single adapter, which
/// serializes them. Every call resolves exactly once, with either a response
/// or an error.
#[async_trait]
pub trait Adapter: Debug + Send + Sync + 'static {
    /// Executes a single statement.
    async fn execute(&self, statement: Statement) -> Result<Response>;

    /// Executes `statements` in submission order, as a unit.
    async fn batch(&self, statements: Vec<Statement>) -> Result<()>;
}
