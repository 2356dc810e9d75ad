//! Keystream backends.
//!
//! Trivium is inherently bit-serial, so there is a single portable backend;
//! the word-parallel step already extracts all the per-word parallelism the
//! algorithm admits.

pub(crate) mod soft;
