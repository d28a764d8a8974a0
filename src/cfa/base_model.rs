//! Shared load/save plumbing for file-backed configuration models.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::file::FileHandler;
use super::key_value::{KeyValueParser, KeyValueTree};

/// Converts between file text and a model's in-memory data.
pub trait Parser {
    type Data;

    fn parse(&self, content: &str) -> Result<Self::Data>;
    fn serialize(&self, data: &Self::Data) -> Result<String>;
    /// Data of a file that was never loaded.
    fn empty(&self) -> Self::Data;
}

/// A parser bound to one file path and handler.
pub struct BaseModel<P: Parser> {
    parser: P,
    path: PathBuf,
    handler: Arc<dyn FileHandler>,
    data: P::Data,
}

impl<P: Parser> BaseModel<P> {
    pub fn new(parser: P, path: impl Into<PathBuf>, handler: Arc<dyn FileHandler>) -> Self {
        let data = parser.empty();
        Self {
            parser,
            path: path.into(),
            handler,
            data,
        }
    }

    /// Read and parse the file, replacing in-memory data.
    pub fn load(&mut self) -> Result<()> {
        let content = self.handler.read(&self.path)?;
        self.data = self
            .parser
            .parse(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(())
    }

    /// Serialize in-memory data and write it out.
    pub fn save(&self) -> Result<()> {
        let content = self
            .parser
            .serialize(&self.data)
            .with_context(|| format!("Failed to serialize {}", self.path.display()))?;
        self.handler.write(&self.path, &content)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &P::Data {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut P::Data {
        &mut self.data
    }
}

impl BaseModel<KeyValueParser> {
    /// Raw value stored under `key`.
    pub fn value_for(&self, key: &str) -> Option<String> {
        self.data.value_for(key)
    }

    /// Write `value` under `key` (modify, uncomment, or append).
    pub fn generic_set(&mut self, key: &str, value: &str) {
        self.data.generic_set(key, value);
    }

    pub fn tree(&self) -> &KeyValueTree {
        &self.data
    }

    pub fn tree_mut(&mut self) -> &mut KeyValueTree {
        &mut self.data
    }
}
