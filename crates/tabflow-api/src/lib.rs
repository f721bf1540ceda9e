//! # TabFlow API
//!
//! HTTP endpoint that categorizes a tab list and streams the outcome back
//! as NDJSON.
//!
//! ```text
//! POST /api/categorize  {tabs}  [X-Gemini-API-Key]
//!   -> 200 application/x-ndjson
//!        {"status":"analyzing",...}
//!        {"status":"retry",...}        (quota hit, next key)
//!        {"status":"success","data":{...},"sources":[...]}  | {"status":"error",...}
//!   -> 4xx/5xx {"error": "..."}        (nothing streamed)
//! GET  /health
//! ```

pub mod error;
pub mod http;
pub mod pipeline;
pub mod server;
pub mod state;

#[cfg(test)]
mod test_support;

pub use error::ApiError;
pub use http::routes::create_router;
pub use pipeline::{CredentialPlan, categorize_stream};
pub use server::{ApiConfig, ApiServer};
pub use state::AppState;
