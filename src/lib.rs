//! Directory-to-Lua installer packager.
//!
//! This crate walks a directory tree and produces one self-contained Lua
//! script that recreates the tree on a target machine. File contents are
//! embedded as escaped long-bracket literals in a content table; a nested
//! manifest records the hierarchy and which content entry belongs to which
//! file.
//!
//! The binary `luapack` wraps [`pack::pack`] with a command line interface.

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod pack;
pub mod packager;

pub use error::{PackError, Result};
