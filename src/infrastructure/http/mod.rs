//! JSON-over-HTTP helper for plugin command functions
//!
//! Handler `execute` runs on blocking tasks, so plugins get a blocking client
//! here instead of dragging an async runtime into every command function.

use serde::de::DeserializeOwned;

use crate::application::errors::HandlerError;

/// GET a URL with the given query parameters and decode the JSON body.
///
/// Must be called from a blocking context (it is, inside `execute`); calling
/// it from an async task panics in reqwest.
pub fn get_json<T: DeserializeOwned>(url: &str, query: &[(&str, &str)]) -> Result<T, HandlerError> {
    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .query(query)
        .send()
        .map_err(|e| HandlerError::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(HandlerError::Http(format!(
            "unexpected status {} from {}",
            response.status(),
            url
        )));
    }

    response
        .json::<T>()
        .map_err(|e| HandlerError::Http(e.to_string()))
}
