//! Request descriptors.

use std::fmt;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::auth::AccessToken;
use crate::error::{Error, InvalidInputError};

/// HTTP verbs the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the verb as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Reads send their payload as query parameters, everything else as a body.
    pub fn payload_in_query(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A self-contained description of one HTTP call, built before dispatch.
///
/// Descriptors are never mutated once built; a retried request is a copy
/// produced by [`RequestDescriptor::with_bearer`].
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    endpoint: String,
    payload: Option<serde_json::Value>,
    headers: HeaderMap,
    anonymous: bool,
}

impl RequestDescriptor {
    /// Create a descriptor for `method` on a path relative to the backend URL.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: None,
            headers: HeaderMap::new(),
            anonymous: false,
        }
    }

    /// Shorthand for a GET descriptor.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    /// Shorthand for a POST descriptor.
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    /// Attach a payload: query parameters for GET, a JSON body otherwise.
    ///
    /// # Errors
    ///
    /// Fails if the payload cannot be represented as JSON, or if a GET payload
    /// is not a flat object.
    pub fn payload<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(data).map_err(|e| InvalidInputError::Payload {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let value = if self.method.payload_in_query() {
            query_object(&self.endpoint, value)?
        } else {
            value
        };

        self.payload = Some(value);
        Ok(self)
    }

    /// Add a header; caller headers win over anything the transport attaches.
    ///
    /// # Errors
    ///
    /// Fails if the name or value is not a valid HTTP header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| InvalidInputError::Header {
                name: name.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|_| InvalidInputError::Header {
            name: name.to_string(),
        })?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Mark the request as not carrying the stored credential.
    ///
    /// Anonymous requests are never refreshed on 401.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// A copy of this request whose `Authorization` header carries `token`.
    ///
    /// # Errors
    ///
    /// Fails if the token contains characters not allowed in a header.
    pub fn with_bearer(&self, token: &AccessToken) -> Result<Self, Error> {
        let mut copy = self.clone();
        copy.headers.insert(AUTHORIZATION, bearer_value(token)?);
        Ok(copy)
    }

    /// Returns the HTTP verb.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the endpoint path.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the payload, if any.
    pub fn payload_value(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    /// Returns the caller-supplied headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether the stored credential is withheld from this request.
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}

/// Build the `Authorization` header value for a token.
pub(crate) fn bearer_value(token: &AccessToken) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&token.bearer()).map_err(|_| InvalidInputError::Header {
        name: AUTHORIZATION.to_string(),
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// Query payloads must be flat objects; `null` members are dropped.
fn query_object(endpoint: &str, value: serde_json::Value) -> Result<serde_json::Value, Error> {
    let serde_json::Value::Object(mut map) = value else {
        if value.is_null() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }
        return Err(InvalidInputError::Payload {
            endpoint: endpoint.to_string(),
            reason: "query parameters must be an object".to_string(),
        }
        .into());
    };

    map.retain(|_, v| !v.is_null());

    if map.values().any(|v| v.is_object() || v.is_array()) {
        return Err(InvalidInputError::Payload {
            endpoint: endpoint.to_string(),
            reason: "query parameters must be scalar values".to_string(),
        }
        .into());
    }

    Ok(serde_json::Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_payload_drops_nulls() {
        let request = RequestDescriptor::get("/urls")
            .payload(&json!({"page": 2, "search": null}))
            .unwrap();
        assert_eq!(request.payload_value(), Some(&json!({"page": 2})));
    }

    #[test]
    fn get_payload_rejects_nested() {
        let result = RequestDescriptor::get("/urls").payload(&json!({"filter": {"a": 1}}));
        assert!(result.is_err());
    }

    #[test]
    fn post_payload_kept_as_body() {
        let request = RequestDescriptor::post("/shorten")
            .payload(&json!({"url": "https://example.com", "tags": ["a"]}))
            .unwrap();
        assert_eq!(
            request.payload_value(),
            Some(&json!({"url": "https://example.com", "tags": ["a"]}))
        );
    }

    #[test]
    fn with_bearer_copies() {
        let original = RequestDescriptor::get("/urls")
            .header("authorization", "Bearer T1")
            .unwrap();
        let retried = original.with_bearer(&AccessToken::new("T2")).unwrap();

        assert_eq!(original.headers()[AUTHORIZATION], "Bearer T1");
        assert_eq!(retried.headers()[AUTHORIZATION], "Bearer T2");
        assert_eq!(retried.endpoint(), "/urls");
    }

    #[test]
    fn invalid_header_rejected() {
        assert!(RequestDescriptor::get("/urls").header("bad name", "x").is_err());
        assert!(RequestDescriptor::get("/urls").header("x-ok", "bad\nvalue").is_err());
    }

    #[test]
    fn method_payload_placement() {
        assert!(Method::Get.payload_in_query());
        for method in [Method::Post, Method::Put, Method::Patch, Method::Delete] {
            assert!(!method.payload_in_query());
        }
    }
}
