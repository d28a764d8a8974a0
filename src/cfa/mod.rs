//! Configuration file access layer.
//!
//! Generic building blocks the GRUB2 models are assembled from:
//! - `file` - whole-file read/write backends (disk, memory)
//! - `base_model` - parser trait and load/save plumbing
//! - `key_value` - comment-preserving `KEY=value` / `key value` files
//! - `boolean` - boolean views over string keys
//! - `matcher` - record selection predicates
//! - `placer` - insertion strategies for ordered records

pub mod base_model;
pub mod boolean;
pub mod file;
pub mod key_value;
pub mod matcher;
pub mod placer;

pub use base_model::{BaseModel, Parser};
pub use boolean::BooleanValue;
pub use file::{DiskFile, FileHandler, MemoryFile};
pub use key_value::{KeyValueParser, KeyValueTree, Syntax};
pub use matcher::{Matcher, Record, ValueMatcher};
pub use placer::Placer;
