//! Cache Entry Codec
//!
//! Serializes entries to the transport string stored in the backends and
//! decodes them back, detecting corruption.
//!
//! Large payloads can be base64-wrapped on the way in. Base64 stands in
//! for real compression: the point is the reversible transform plus the
//! `compressed` marker, which tells `decode` to reverse it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CacheEntry, COMPRESSION_THRESHOLD};
use crate::error::{CacheError, Result};

// == Encode ==
/// Serializes an entry to its stored form.
///
/// When `compress` is requested and the serialized payload exceeds
/// [`COMPRESSION_THRESHOLD`], the payload is base64-wrapped and the
/// entry is marked `compressed` before the final serialization pass.
pub fn encode<T: Serialize>(entry: &CacheEntry<T>, compress: bool) -> Result<String> {
    let payload = serde_json::to_string(&entry.data)?;

    if compress && payload.len() > COMPRESSION_THRESHOLD {
        let wrapped = CacheEntry {
            data: BASE64.encode(payload.as_bytes()),
            created_at: entry.created_at,
            ttl_seconds: entry.ttl_seconds,
            compressed: true,
        };
        return Ok(serde_json::to_string(&wrapped)?);
    }

    Ok(serde_json::to_string(entry)?)
}

// == Decode ==
/// Parses a stored string back into an entry.
///
/// Reverses the base64 wrapping when the `compressed` marker is set.
/// Every parse or unwrap failure surfaces as [`CacheError::Corrupted`];
/// callers delete the offending key and treat the read as a miss.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<CacheEntry<T>> {
    let probe: CacheEntry<serde_json::Value> =
        serde_json::from_str(raw).map_err(|e| CacheError::Corrupted(e.to_string()))?;

    if probe.compressed {
        let encoded = probe
            .data
            .as_str()
            .ok_or_else(|| CacheError::Corrupted("compressed payload is not a string".into()))?;
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CacheError::Corrupted(e.to_string()))?;
        let inner =
            String::from_utf8(bytes).map_err(|e| CacheError::Corrupted(e.to_string()))?;
        let data: T =
            serde_json::from_str(&inner).map_err(|e| CacheError::Corrupted(e.to_string()))?;
        return Ok(CacheEntry {
            data,
            created_at: probe.created_at,
            ttl_seconds: probe.ttl_seconds,
            compressed: true,
        });
    }

    let data: T =
        serde_json::from_value(probe.data).map_err(|e| CacheError::Corrupted(e.to_string()))?;
    Ok(CacheEntry {
        data,
        created_at: probe.created_at,
        ttl_seconds: probe.ttl_seconds,
        compressed: false,
    })
}
