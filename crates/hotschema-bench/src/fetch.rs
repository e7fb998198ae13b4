// Hotschema - Conditional Schema Compile-Cost Analysis
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Schema fetching from local paths or `http(s)://` URLs.

use crate::error::{BenchError, Result, MAX_SOURCE_SIZE};
use hotschema_core::{json, Document};
use once_cell::sync::Lazy;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::info;

static HTTP_AGENT: Lazy<ureq::Agent> = Lazy::new(|| {
    ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(60))
        .build()
});

/// True for `http://` and `https://` locations.
pub fn is_remote(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads the raw schema text at `location`.
///
/// # Errors
///
/// `Fetch` when the file is missing, too large, not UTF-8, or the request fails.
pub fn fetch_source(location: &str) -> Result<String> {
    if is_remote(location) {
        fetch_url(location)
    } else {
        read_local(Path::new(location))
    }
}

/// Fetches and parses the schema at `location`.
pub fn fetch_document(location: &str) -> Result<Document> {
    let text = fetch_source(location)?;
    let doc = json::from_json_str(&text).map_err(|e| BenchError::Fetch {
        location: location.to_string(),
        message: format!("not a JSON document: {}", e),
    })?;
    info!(location, bytes = text.len(), nodes = doc.node_count(), "fetched schema");
    Ok(doc)
}

fn fetch_error(location: &str, message: impl Into<String>) -> BenchError {
    BenchError::Fetch {
        location: location.to_string(),
        message: message.into(),
    }
}

fn read_local(path: &Path) -> Result<String> {
    let location = path.display().to_string();
    let metadata = fs::metadata(path).map_err(|e| fetch_error(&location, e.to_string()))?;
    if !metadata.is_file() {
        return Err(fetch_error(&location, "not a regular file"));
    }
    check_size(&location, metadata.len())?;
    fs::read_to_string(path).map_err(|e| fetch_error(&location, e.to_string()))
}

fn fetch_url(url: &str) -> Result<String> {
    let response = HTTP_AGENT
        .get(url)
        .call()
        .map_err(|e| fetch_error(url, e.to_string()))?;

    let mut body = String::new();
    response
        .into_reader()
        .take(MAX_SOURCE_SIZE + 1)
        .read_to_string(&mut body)
        .map_err(|e| fetch_error(url, e.to_string()))?;
    check_size(url, body.len() as u64)?;
    Ok(body)
}

/// Applies [`MAX_SOURCE_SIZE`] to a local file or a (capped) response body.
fn check_size(location: &str, len: u64) -> Result<()> {
    if len > MAX_SOURCE_SIZE {
        return Err(fetch_error(
            location,
            format!("source is {} bytes, maximum is {} bytes", len, MAX_SOURCE_SIZE),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_check_size_limit() {
        assert!(check_size("https://example.com/s.json", MAX_SOURCE_SIZE).is_ok());
        let err = check_size("https://example.com/s.json", MAX_SOURCE_SIZE + 1).unwrap_err();
        match err {
            BenchError::Fetch { location, message } => {
                assert_eq!(location, "https://example.com/s.json");
                assert!(message.contains("maximum"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_fetch_deeply_nested_document() {
        let depth = 300;
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}true{}", r##"{"then":"##.repeat(depth), "}".repeat(depth)).unwrap();
        let doc = fetch_document(file.path().to_str().unwrap()).unwrap();
        assert_eq!(doc.depth(), depth + 1);
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.com/schema.json"));
        assert!(is_remote("HTTP://example.com/schema.json"));
        assert!(!is_remote("schemas/http.json"));
        assert!(!is_remote("/tmp/https"));
    }

    #[test]
    fn test_fetch_local_document() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r##"{{"$ref": "#/$defs/a", "$defs": {{"a": true}}}}"##).unwrap();
        let doc = fetch_document(file.path().to_str().unwrap()).unwrap();
        assert!(doc.has_key("$ref"));
    }

    #[test]
    fn test_missing_file_is_fetch_error() {
        let err = fetch_source("/nonexistent/hotschema/schema.json").unwrap_err();
        assert!(matches!(err, BenchError::Fetch { .. }));
    }

    #[test]
    fn test_directory_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = fetch_source(dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, BenchError::Fetch { ref message, .. } if message == "not a regular file"));
    }

    #[test]
    fn test_invalid_json_is_fetch_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = fetch_document(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, BenchError::Fetch { .. }));
    }
}
