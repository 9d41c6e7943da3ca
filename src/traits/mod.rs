//! Trait definitions for Gerrit operations.
//!
//! Entity types implement the traits they support, encapsulating the
//! endpoint differences in the implementations.

mod get;

pub use get::Get;
