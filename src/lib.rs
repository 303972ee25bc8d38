//! # ssl3-secrets - legacy SSLv3 handshake secrets
//!
//! This crate implements the SSLv3 handshake-secrets subsystem: the
//! transcript hash, the legacy pad1/pad2 Finished-message and
//! certificate-verify MACs, and the iterative MD5/SHA-1 key expansion
//! used to stretch a master secret into the connection key block.
//!
//! ## Current features
//!
//! * Transcript recording with buffered-then-incremental digesting.
//! * Forkable digest states, so the Finished MAC can be computed for
//!   both senders without re-hashing the transcript.
//! * The dual-hash (MD5 then SHA-1) 36-byte Finished MAC.
//! * Per-algorithm certificate-verify MACs.
//! * SSLv3 key expansion into a cipher-suite-shaped key block.
//! * Zeroization of all secret material on drop, via the `zeroize` crate.
//! * Constant-time Finished MAC comparison, via the `subtle` crate.
//!
//! ## Non-features
//!
//! This crate is the cryptographic core only.  It does not and will not
//! provide:
//!
//! * Record-layer encryption or decryption.
//! * Handshake message parsing or serialization.
//! * Certificate validation.
//! * The TLS 1.0-1.2 HMAC PRFs or the TLS 1.3 key schedule.
//! * Network IO of any kind.
//!
//! The surrounding protocol engine feeds raw handshake bytes into a
//! [`HandshakeHashBuffer`], freezes it into a [`HandshakeHash`] once the
//! active algorithms are known, and asks [`Ssl3Secrets`] for MACs and the
//! key block.  Every handshake owns its own state; nothing here is shared
//! between connections and nothing here blocks.
//!
//! ## Crate features
//!
//! Here's a list of what features are exposed by this crate and what they
//! enable.
//!
//! - `std`: enables `std::error::Error` for [`Error`].  This feature is in
//!   the default set.
//!
//! - `logging`: makes the crate depend on the `log` crate, emitting trace
//!   and debug records around transcript freezing and key derivation.
//!   Secret bytes are never logged.  If you don't do this, the log facade
//!   calls compile to nothing.

#![no_std]
// Require docs for public APIs, deny unsafe code, etc.
#![forbid(unsafe_code, unused_must_use)]
#![deny(
    clippy::use_self,
    trivial_casts,
    trivial_numeric_casts,
    missing_docs,
    unreachable_pub,
    unused_import_braces,
    unused_extern_crates,
    unused_qualifications
)]
#![allow(clippy::new_without_default)]
// Enable documentation for all features on docs.rs
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

// log for logging (optional).
#[cfg(feature = "logging")]
mod log {
    pub(crate) use ::log::{debug, trace};
}

#[cfg(not(feature = "logging"))]
mod log {
    macro_rules! ignore_log ( ($($tt:tt)*) => {{}} );
    pub(crate) use ignore_log as debug;
    pub(crate) use ignore_log as trace;
}

pub mod crypto;
mod error;
mod hash_hs;
mod ssl3;

// The public interface is:
pub use crate::crypto::hash::HashAlgorithm;
pub use crate::error::Error;
pub use crate::hash_hs::{HandshakeHash, HandshakeHashBuffer};
pub use crate::ssl3::{
    ConnectionRandoms, FinishedMac, KeyBlock, KeyBlockLayout, KeyBlockSlices, Side, Ssl3Secrets,
    FINISHED_MAC_LEN, MASTER_SECRET_LEN, RANDOM_LEN,
};
