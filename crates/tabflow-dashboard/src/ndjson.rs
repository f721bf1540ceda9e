//! Incremental NDJSON decoding of the categorization stream.

use tracing::warn;

use tabflow_protocols::types::StreamUpdate;

/// Reassembles [`StreamUpdate`] frames from arbitrarily split byte chunks.
///
/// Only newline-terminated lines are parsed. Whatever follows the last
/// newline stays buffered until the next chunk completes it.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every frame completed by it in order.
    ///
    /// Lines that do not parse as a frame are logged and skipped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamUpdate> {
        self.buffer.extend_from_slice(chunk);

        let Some(last_newline) = self.buffer.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };
        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        complete
            .split(|b| *b == b'\n')
            .filter_map(parse_line)
            .collect()
    }

    /// Bytes received after the last newline.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }
}

fn parse_line(line: &[u8]) -> Option<StreamUpdate> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(line) {
        Ok(update) => Some(update),
        Err(e) => {
            warn!(
                "Skipping malformed stream line ({}): {}",
                e,
                String::from_utf8_lossy(line)
            );
            None
        }
    }
}

#[cfg(test)]
#[path = "ndjson_tests.rs"]
mod tests;
