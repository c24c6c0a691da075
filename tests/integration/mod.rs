//! Integration tests for header_dedup
//!
//! These tests drive the public library API only; no server or
//! environment setup is required.
//! Run with: cargo test --test integration

mod helpers;

mod batch;
mod cache;
mod merge;
mod metrics;
