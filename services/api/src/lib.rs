//! services/api/src/lib.rs
//!
//! Library surface of the welcomebook API service: configuration,
//! persistence adapters, and the web layer. The `api` binary wires these
//! together; the `openapi` binary only needs the doc definition.

pub mod adapters;
pub mod config;
pub mod error;
pub mod password;
pub mod web;
