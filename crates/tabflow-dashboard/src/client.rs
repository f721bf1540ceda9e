//! Client half of the categorization pipeline.

use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use tabflow_protocols::error::PipelineError;
use tabflow_protocols::provider::CREDENTIAL_HEADER;
use tabflow_protocols::types::{StreamUpdate, Tab};

use crate::credential::CategorizeOptions;
use crate::ndjson::NdjsonDecoder;

/// Frames of one categorization request.
pub type UpdateStream = Pin<Box<dyn Stream<Item = StreamUpdate> + Send>>;

#[derive(Serialize)]
struct CategorizeBody<'a> {
    tabs: &'a [Tab],
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the categorization endpoint.
#[derive(Debug, Clone)]
pub struct CategorizeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CategorizeClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PipelineError::Network(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Categorize `tabs`, yielding progress frames and then exactly one
    /// terminal frame. Failures of any kind arrive as a terminal `error`
    /// frame; the stream never ends without one.
    ///
    /// An empty tab list sends nothing and yields an empty stream.
    pub fn categorize(&self, tabs: Vec<Tab>, options: CategorizeOptions) -> UpdateStream {
        if tabs.is_empty() {
            debug!("No tabs to categorize");
            return Box::pin(futures::stream::empty());
        }
        let client = self.clone();
        Box::pin(async_stream::stream! {
            yield StreamUpdate::initializing("Sending tabs to the categorization service...");

            let response = match client.send(&tabs, &options).await {
                Ok(response) => response,
                Err(e) => {
                    error!("Categorization request failed: {}", e);
                    yield StreamUpdate::error(e.to_string());
                    return;
                }
            };

            let mut decoder = NdjsonDecoder::new();
            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let e = PipelineError::Stream(e.to_string());
                        error!("{}", e);
                        yield StreamUpdate::error(e.to_string());
                        return;
                    }
                };
                for update in decoder.push(&chunk) {
                    let terminal = update.is_terminal();
                    debug!("Stream frame: {}", update.status());
                    yield update;
                    if terminal {
                        return;
                    }
                }
            }

            if !decoder.pending().is_empty() {
                warn!("Discarding {} byte(s) of unterminated stream data", decoder.pending().len());
            }
            let e = PipelineError::Incomplete;
            error!("{}", e);
            yield StreamUpdate::error(e.to_string());
        })
    }

    /// Post the tab list; a non-2xx status becomes an error carrying the
    /// server's `{error}` message when it sent one.
    async fn send(
        &self,
        tabs: &[Tab],
        options: &CategorizeOptions,
    ) -> Result<reqwest::Response, PipelineError> {
        let credential = options.resolve().await?;

        info!(
            "Requesting categorization of {} tab(s) (caller credential: {})",
            tabs.len(),
            credential.is_some()
        );
        let mut request = self.http.post(&self.endpoint).json(&CategorizeBody { tabs });
        if let Some(credential) = credential {
            request = request.header(CREDENTIAL_HEADER, credential);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) if text.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
            Err(_) => text,
        };
        Err(PipelineError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
