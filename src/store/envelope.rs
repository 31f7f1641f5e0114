//! Versioned envelope for persisted values.
//!
//! Stored form: `{"version": <u32>, "payload": <value>}`. Values written
//! before envelopes existed are plain JSON and are read as version 0.

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version written by this build
pub const CURRENT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    payload: T,
}

pub fn encode<T: Serialize>(payload: &T) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&Envelope {
        version: CURRENT_VERSION,
        payload,
    })?)
}

pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    let value: Value = serde_json::from_str(raw)?;
    match envelope_parts(value) {
        Ok((version, payload)) => {
            if version > CURRENT_VERSION {
                return Err(StorageError::UnsupportedVersion {
                    key: key.to_string(),
                    found: version,
                });
            }
            Ok(serde_json::from_value(payload)?)
        }
        // legacy, unversioned
        Err(value) => Ok(serde_json::from_value(value)?),
    }
}

/// Split an envelope into `(version, payload)`, or hand the value back
/// untouched when it is not one.
fn envelope_parts(value: Value) -> Result<(u32, Value), Value> {
    let mut map = match value {
        Value::Object(map) => map,
        other => return Err(other),
    };
    let version = map
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok());
    match (version, map.len() == 2 && map.contains_key("payload")) {
        (Some(version), true) => {
            let payload = map.remove("payload").unwrap_or(Value::Null);
            Ok((version, payload))
        }
        _ => Err(Value::Object(map)),
    }
}
