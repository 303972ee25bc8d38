//! Crypto provider interface.
//!
//! The digest primitives are consumed as black boxes through the
//! [`hash::Hash`] and [`hash::Context`] traits; [`provider`] carries the
//! built-in MD5 and SHA-1 implementations.

pub mod hash;
pub mod provider;
