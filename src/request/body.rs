//! Decoding response bodies into the controller's `data` type.

use serde::de::DeserializeOwned;

use crate::transport::HttpError;

/// A type a response body can be decoded into.
///
/// Implemented for the common shapes:
/// - [`serde_json::Value`]: JSON, or a JSON string holding the (lossily
///   decoded) text for anything else; never fails
/// - [`String`]: UTF-8 text
/// - `Vec<u8>`: raw bytes
/// - [`Json<T>`]: strict JSON into any deserializable type
///
/// Empty bodies are never decoded; they leave `data` absent.
pub trait ResponseBody: Clone + Send + Sync + 'static {
    /// Decodes a non-empty body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if `body` is not a valid encoding
    /// of `Self`.
    fn decode(body: &[u8]) -> Result<Self, HttpError>;
}

impl ResponseBody for serde_json::Value {
    fn decode(body: &[u8]) -> Result<Self, HttpError> {
        // Anything that is not JSON is kept as text, never rejected
        Ok(serde_json::from_slice(body)
            .unwrap_or_else(|_| Self::String(String::from_utf8_lossy(body).into_owned())))
    }
}

impl ResponseBody for String {
    fn decode(body: &[u8]) -> Result<Self, HttpError> {
        Self::from_utf8(body.to_vec()).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

impl ResponseBody for Vec<u8> {
    fn decode(body: &[u8]) -> Result<Self, HttpError> {
        Ok(body.to_vec())
    }
}

/// Strict JSON body wrapper.
///
/// Unlike [`serde_json::Value`], a body that does not deserialize into
/// `T` is a decode error.
///
/// # Example
///
/// ```
/// use reactive_http::request::{Json, ResponseBody};
///
/// let Json(numbers) = Json::<Vec<u32>>::decode(b"[1, 2, 3]").unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
///
/// assert!(Json::<Vec<u32>>::decode(b"not json").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwraps the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned + Clone + Send + Sync + 'static> ResponseBody for Json<T> {
    fn decode(body: &[u8]) -> Result<Self, HttpError> {
        serde_json::from_slice(body)
            .map(Json)
            .map_err(|e| HttpError::Decode(e.to_string()))
    }
}
