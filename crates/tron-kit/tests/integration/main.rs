//! Integration tests for tron-kit.
//!
//! These tests drive the public client against an in-memory node that
//! speaks the wallet HTTP API, so they need no network access.
//!
//! Run with: `cargo test --test integration`

mod common;
mod pipeline_integration;
mod preflight_integration;
