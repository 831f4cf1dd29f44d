//! Lua generation – turn a [`Package`](crate::model::Package) into installer text.
//!
//! This module provides:
//! - [`escape`] – Escaping of file contents for long-bracket literals.
//! - [`manifest`] – Manifest and content-list literals.
//! - [`installer`] – Template substitution and atomic output.

pub mod escape;
pub mod installer;
pub mod manifest;
