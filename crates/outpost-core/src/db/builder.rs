use super::{Db, Shared};
use crate::{
    driver::{Adapter, Compiler},
    schema::ComponentRegistry,
    Result,
};

use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::broadcast;

const DEFAULT_ERROR_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Default)]
pub struct Builder {
    compiler: Option<Box<dyn Compiler>>,

    /// Buffered errors per subscriber before the oldest are dropped
    error_channel_capacity: Option<usize>,
}

impl Builder {
    /// Sets the statement compiler. Required.
    pub fn compiler(&mut self, compiler: impl Compiler) -> &mut Self {
        self.compiler = Some(Box::new(compiler));
        self
    }

    pub fn error_channel_capacity(&mut self, capacity: usize) -> &mut Self {
        self.error_channel_capacity = Some(capacity);
        self
    }

    /// Opens a database over `adapter`. No table is registered yet; see
    /// [`Db::bootstrap`] and [`Db::load_schema`].
    pub fn connect(&mut self, adapter: impl Adapter) -> Result<Db> {
        let Some(compiler) = self.compiler.take() else {
            crate::bail!("no statement compiler configured");
        };

        let capacity = self
            .error_channel_capacity
            .unwrap_or(DEFAULT_ERROR_CHANNEL_CAPACITY)
            .max(1);
        let (errors, _) = broadcast::channel(capacity);

        Ok(Db {
            shared: Arc::new(Shared {
                adapter: Box::new(adapter),
                compiler,
                tables: RwLock::new(Default::default()),
                components: Mutex::new(ComponentRegistry::new()),
                errors,
            }),
        })
    }
}
