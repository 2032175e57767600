//! HTTP transport.

use std::sync::{Arc, RwLock};

use reqwest::cookie::CookieStore;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use crate::auth::{Credential, MemoryTokenStore, TokenStore};
use crate::error::{ApiError, Error, InvalidInputError, SchemaError};
use crate::types::BackendUrl;

use super::endpoints::{Envelope, error_message};
use super::request::{Method, RequestDescriptor, bearer_value};

/// A response that came back with a 2xx status.
#[derive(Debug)]
pub(crate) struct Received {
    pub(crate) status: u16,
    pub(crate) body: Vec<u8>,
}

/// HTTP client for the shortener backend.
///
/// Attaches the stored bearer token to every non-anonymous request and
/// recovers once from an expired token (see [`Transport::send`]). Cheap to
/// clone; clones share the token store, cookie jar and default headers.
#[derive(Clone)]
pub struct Transport {
    pub(crate) inner: Arc<TransportInner>,
}

pub(crate) struct TransportInner {
    pub(crate) client: reqwest::Client,
    pub(crate) backend: BackendUrl,
    pub(crate) store: Arc<dyn TokenStore>,
    pub(crate) default_headers: RwLock<HeaderMap>,
}

impl Transport {
    /// Create a transport with an in-memory token store.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(backend: BackendUrl) -> Result<Self, Error> {
        Self::builder(backend).build()
    }

    /// Start configuring a transport for `backend`.
    pub fn builder(backend: BackendUrl) -> TransportBuilder {
        TransportBuilder::new(backend)
    }

    /// Returns the backend URL this transport talks to.
    pub fn backend(&self) -> &BackendUrl {
        &self.inner.backend
    }

    /// Returns the token store shared by this transport.
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    /// Whether a credential is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.inner.store.get().is_some()
    }

    /// Returns a copy of the headers attached to every request.
    pub fn default_headers(&self) -> HeaderMap {
        self.inner
            .default_headers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// GET `endpoint` with `params` as query parameters.
    pub async fn get<R, Q>(&self, endpoint: &str, params: &Q) -> Result<R, Error>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(RequestDescriptor::get(endpoint).payload(params)?)
            .await
    }

    /// POST `body` as JSON to `endpoint`.
    pub async fn post<R, B>(&self, endpoint: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(RequestDescriptor::new(Method::Post, endpoint).payload(body)?)
            .await
    }

    /// PUT `body` as JSON to `endpoint`.
    pub async fn put<R, B>(&self, endpoint: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(RequestDescriptor::new(Method::Put, endpoint).payload(body)?)
            .await
    }

    /// PATCH `body` as JSON to `endpoint`.
    pub async fn patch<R, B>(&self, endpoint: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(RequestDescriptor::new(Method::Patch, endpoint).payload(body)?)
            .await
    }

    /// DELETE `endpoint`, sending `body` as JSON.
    pub async fn delete<R, B>(&self, endpoint: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(RequestDescriptor::new(Method::Delete, endpoint).payload(body)?)
            .await
    }

    /// Send a request and decode the whole body as `R`.
    ///
    /// A 401 on a non-anonymous request triggers exactly one token refresh
    /// followed by exactly one replay; every other failure is returned as is.
    #[instrument(skip(self, request), fields(backend = %self.inner.backend, method = %request.method(), endpoint = request.endpoint()))]
    pub async fn send<R: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<R, Error> {
        let received = self.execute(&request, false).await?;
        decode(request.endpoint(), &received)
    }

    /// Send a request whose response is a `{status, message, data}` envelope
    /// and return `data`.
    #[instrument(skip(self, request), fields(backend = %self.inner.backend, method = %request.method(), endpoint = request.endpoint()))]
    pub async fn send_data<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<T, Error> {
        self.send_enveloped(request).await.map(|(_, data)| data)
    }

    /// Like [`Transport::send_data`], also returning the HTTP status.
    pub(crate) async fn send_enveloped<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<(u16, T), Error> {
        let received = self.execute(&request, false).await?;
        let envelope: Envelope<T> = decode(request.endpoint(), &received)?;
        let data = envelope.into_data(request.endpoint(), received.status)?;
        Ok((received.status, data))
    }

    /// Issue one HTTP call: no refresh, no retry.
    pub(crate) async fn dispatch(&self, request: &RequestDescriptor) -> Result<Received, Error> {
        let url = self.inner.backend.endpoint_url(request.endpoint());
        let headers = self.headers_for(request)?;

        debug!(method = %request.method(), endpoint = request.endpoint(), "Dispatching request");

        let mut builder = self
            .inner
            .client
            .request(request.method().into(), &url)
            .headers(headers);

        if let Some(payload) = request.payload_value() {
            builder = if request.method().payload_in_query() {
                builder.query(payload)
            } else {
                builder.json(payload)
            };
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        trace!(status = %status, bytes = body.len(), "Response received");

        if status.is_success() {
            Ok(Received {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(ApiError::new(status.as_u16(), error_message(&body)).into())
        }
    }

    /// Merge defaults, the stored credential and the caller's headers, in
    /// increasing order of precedence.
    fn headers_for(&self, request: &RequestDescriptor) -> Result<HeaderMap, Error> {
        let mut headers = self.default_headers();

        if request.is_anonymous() {
            headers.remove(AUTHORIZATION);
        } else if let Some(credential) = self.inner.store.get() {
            headers.insert(AUTHORIZATION, bearer_value(credential.access_token())?);
        }

        for (name, value) in request.headers() {
            headers.insert(name.clone(), value.clone());
        }

        Ok(headers)
    }

    /// Make `credential` the one used from now on by every request.
    pub(crate) fn adopt(&self, credential: Credential) -> Result<(), Error> {
        let value = bearer_value(credential.access_token())?;
        self.inner.store.set(credential);
        self.inner
            .default_headers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(AUTHORIZATION, value);
        Ok(())
    }

    /// Drop the stored credential and the default `Authorization` header.
    pub(crate) fn forget(&self) {
        self.inner.store.clear();
        self.inner
            .default_headers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(AUTHORIZATION);
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("backend", &self.inner.backend)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Decode a 2xx body as `R`. An empty body decodes as JSON `null`.
pub(crate) fn decode<R: DeserializeOwned>(endpoint: &str, received: &Received) -> Result<R, Error> {
    let body: &[u8] = if received.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &received.body
    };

    serde_json::from_slice(body).map_err(|e| {
        Error::Schema(SchemaError {
            status: received.status,
            endpoint: endpoint.to_string(),
            message: error_message(body),
            detail: e.to_string(),
        })
    })
}

/// Lets a caller-supplied jar stand in for reqwest's own.
struct SharedCookies(Arc<dyn CookieStore>);

impl CookieStore for SharedCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &url::Url) {
        self.0.set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &url::Url) -> Option<HeaderValue> {
        self.0.cookies(url)
    }
}

/// Builder for [`Transport`].
pub struct TransportBuilder {
    backend: BackendUrl,
    store: Option<Arc<dyn TokenStore>>,
    cookies: Option<Arc<dyn CookieStore>>,
    user_agent: Option<String>,
    default_headers: HeaderMap,
}

impl TransportBuilder {
    /// Start a builder for `backend`.
    pub fn new(backend: BackendUrl) -> Self {
        Self {
            backend,
            store: None,
            cookies: None,
            user_agent: None,
            default_headers: HeaderMap::new(),
        }
    }

    /// Use `store` to hold the credential. Defaults to a [`MemoryTokenStore`].
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Keep the backend's session cookie in `jar` instead of an in-memory
    /// jar that dies with the transport.
    ///
    /// The refresh endpoint identifies the session by cookie, so a jar that
    /// outlives the process is what lets a stored token be renewed later.
    pub fn cookie_provider<C: CookieStore + 'static>(mut self, jar: Arc<C>) -> Self {
        self.cookies = Some(jar);
        self
    }

    /// Override the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Attach `name: value` to every request unless the caller overrides it.
    ///
    /// # Errors
    ///
    /// Fails if the name or value is not a valid HTTP header.
    pub fn default_header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| InvalidInputError::Header {
                name: name.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|_| InvalidInputError::Header {
            name: name.to_string(),
        })?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<Transport, Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| concat!("shortlink/", env!("CARGO_PKG_VERSION")).to_string());

        let builder = reqwest::Client::builder().user_agent(user_agent);
        let client = match self.cookies {
            Some(jar) => builder.cookie_provider(Arc::new(SharedCookies(jar))),
            None => builder.cookie_store(true),
        }
        .build()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));

        Ok(Transport {
            inner: Arc::new(TransportInner {
                client,
                backend: self.backend,
                store,
                default_headers: RwLock::new(self.default_headers),
            }),
        })
    }
}
