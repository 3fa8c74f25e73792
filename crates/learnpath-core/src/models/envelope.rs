//! The `{success, message, errors, <resource>}` response wrapper.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::ApiError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    /// Either a list of messages or a field -> messages map.
    #[serde(default)]
    pub errors: Option<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Envelope {
    /// True unless the server explicitly reported `success: false`.
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(true)
    }

    /// Remove and decode the resource stored under `key`.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, ApiError> {
        let value = self
            .rest
            .remove(key)
            .ok_or_else(|| ApiError::InvalidResponse(format!("missing `{}` in response", key)))?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("failed to decode `{}`: {}", key, e)))
    }

    /// Like `take`, but a missing key yields the default value.
    pub fn take_or_default<T: DeserializeOwned + Default>(
        &mut self,
        key: &str,
    ) -> Result<T, ApiError> {
        if self.rest.contains_key(key) {
            self.take(key)
        } else {
            Ok(T::default())
        }
    }

    /// Turn an explicit `success: false` into an error.
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "request was rejected".to_string()),
            ))
        }
    }
}
