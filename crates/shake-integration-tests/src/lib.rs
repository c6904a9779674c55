//! Integration test crate for Clawshake engine components.
//!
//! This crate exists solely to run integration tests that span the record and
//! engine crates. It has no public API - all functionality is in the test modules.

#![forbid(unsafe_code)]
