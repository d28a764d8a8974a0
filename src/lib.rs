//! grub2cfg library exports.
//!
//! Structured, non-destructive access to GRUB2 configuration:
//! - `grub2` - models for `/etc/default/grub`, the generated `grub.cfg`,
//!   `device.map` and `grub_installdevice`
//! - `cfa` - the file/parser/matcher/placer building blocks they share
//! - `config` - where the files live

pub mod cfa;
pub mod common;
pub mod config;
pub mod grub2;
