// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON encoding of request and response bodies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors turning bytes into bodies or back
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty body")]
    EmptyBody,
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

pub fn encode_string<T: Serialize>(value: &T) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ProtocolError::EmptyBody);
    }
    Ok(serde_json::from_slice(bytes)?)
}

pub fn decode_str<T: DeserializeOwned>(body: &str) -> Result<T, ProtocolError> {
    decode(body.as_bytes())
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
