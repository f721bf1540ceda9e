//! HTTP interface module.
//!
//! - `POST /api/categorize` streams a categorization as NDJSON
//! - `GET /health` reports liveness

pub mod handlers;
pub mod routes;
