//! Core types shared across the silo build tool
//!
//! This crate carries the pieces every other silo crate needs:
//! - Package and installed-artifact identifiers ([`ident`])
//! - The immutable build-environment context ([`env`])
//! - The shared error type ([`Error`]/[`Result`])
//!
//! Nothing in here touches the filesystem or the compiler; those
//! concerns live in the crates that consume these types.

mod error;

pub mod env;
pub mod ident;

pub use error::{Error, Result};
