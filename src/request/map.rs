//! Mapping a transport response onto observable fields.

use http::{HeaderMap, StatusCode};

use crate::transport::{HttpError, HttpResponse};

use super::ResponseBody;

/// Status codes at or above this value mark a response as failed.
pub const FAILURE_STATUS: u16 = 400;

/// Fields derived from a settled response.
#[derive(Debug)]
pub struct MappedResponse<T> {
    /// Response status code
    pub status: StatusCode,
    /// Response status text
    pub status_text: String,
    /// `status < 400`
    pub is_successful: bool,
    /// Failure status, or a body that could not be decoded
    pub has_failed: bool,
    /// Decoded body; `None` for an empty or undecodable body
    pub data: Option<T>,
    /// Response headers
    pub headers: HeaderMap,
    /// Why a non-empty body could not be decoded into `T`
    pub decode_error: Option<HttpError>,
}

/// Maps a transport response to the controller's result fields.
///
/// Pure: reads `response` and returns the derived values. Status,
/// status text and headers are always mapped; a body that cannot be
/// decoded into `T` leaves `data` absent, sets `decode_error` and marks
/// the response as failed without touching `is_successful`.
///
/// # Example
///
/// ```
/// use reactive_http::request::map_response;
/// use reactive_http::transport::HttpResponse;
///
/// let response = HttpResponse::new(http::StatusCode::NOT_FOUND, http::HeaderMap::new(), vec![]);
/// let mapped = map_response::<serde_json::Value>(&response);
///
/// assert!(!mapped.is_successful);
/// assert!(mapped.has_failed);
/// assert_eq!(mapped.data, None);
/// ```
#[must_use]
pub fn map_response<T: ResponseBody>(response: &HttpResponse) -> MappedResponse<T> {
    let (data, decode_error) = if response.body.is_empty() {
        (None, None)
    } else {
        match T::decode(&response.body) {
            Ok(data) => (Some(data), None),
            Err(error) => (None, Some(error)),
        }
    };

    let is_successful = response.status.as_u16() < FAILURE_STATUS;

    MappedResponse {
        status: response.status,
        status_text: response.status_text.clone(),
        is_successful,
        has_failed: !is_successful || decode_error.is_some(),
        data,
        headers: response.headers.clone(),
        decode_error,
    }
}
