//! Shared utilities across grub2cfg modules.

pub mod files;

pub use files::{read_text, write_file_with_dirs};
