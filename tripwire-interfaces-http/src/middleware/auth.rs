use std::io::Read;

use anyhow::{anyhow, Result};
use axum::http::HeaderMap;
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;

use tripwire_domain::{EntityId, RuntimeConfig};

use crate::error::HttpError;

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Decodes a JSON body, gunzipping first when `Content-Encoding: gzip` is set.
/// The decompressed body may not exceed `max_bytes`.
pub fn parse_json_body<T: DeserializeOwned>(
    headers: &HeaderMap,
    body: &[u8],
    max_bytes: u64,
) -> Result<T> {
    let content = maybe_gunzip(headers, body, max_bytes)?;
    serde_json::from_str(&content).map_err(|err| anyhow!("invalid json: {}", err))
}

pub fn parse_entity_id(raw: &str) -> Result<EntityId, HttpError> {
    raw.trim()
        .parse()
        .map_err(|_| HttpError::BadRequest(format!("invalid entity id '{}'", raw)))
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8], max_bytes: u64) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("") == "gzip" {
            let mut decoder = GzDecoder::new(body).take(max_bytes.saturating_add(1));
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            if out.len() as u64 > max_bytes {
                return Err(anyhow!("decompressed body exceeds {} bytes", max_bytes));
            }
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
