//! Typed operations against the shortener backend.

use tracing::{debug, info, instrument};

use crate::auth::{AccessToken, Credential, LoginCredentials, RefreshToken, Registration};
use crate::error::{AuthError, Error, InvalidInputError, SchemaError};
use crate::http::endpoints::{
    self, DASHBOARD, LOGIN, LoginData, LoginRequest, REGISTER, RegisterRequest, SHORTEN, URLS,
};
use crate::http::{RequestDescriptor, Transport};
use crate::links::{DashboardSummary, NewShortUrl, ShortUrl, UrlPage, UrlQuery};
use crate::types::BackendUrl;

/// Client for the shortener backend.
///
/// Wraps a [`Transport`], so every call shares its token store and gets the
/// same refresh-and-replay handling of expired tokens. Cheap to clone.
///
/// # Example
///
/// ```no_run
/// use shortlink::{BackendUrl, LoginCredentials, ShortlinkClient, UrlQuery};
///
/// # async fn example() -> Result<(), shortlink::Error> {
/// let client = ShortlinkClient::new(BackendUrl::new("http://localhost:3001")?)?;
/// client.login(LoginCredentials::new("ada", "correct horse")).await?;
///
/// let page = client.list_urls(&UrlQuery::new().search("docs")).await?;
/// for url in page.urls {
///     println!("{} -> {}", url.short_code, url.long_url);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ShortlinkClient {
    transport: Transport,
}

impl ShortlinkClient {
    /// Create a client with an in-memory token store.
    pub fn new(backend: BackendUrl) -> Result<Self, Error> {
        Ok(Self::with_transport(Transport::new(backend)?))
    }

    /// Create a client on top of a configured transport.
    pub fn with_transport(transport: Transport) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Returns the backend URL.
    pub fn backend(&self) -> &BackendUrl {
        self.transport.backend()
    }

    /// Whether an access token is stored.
    ///
    /// Presence only: an expired token still counts until the backend
    /// rejects it and the refresh fails.
    pub fn is_authenticated(&self) -> bool {
        self.transport.is_authenticated()
    }

    /// Returns the stored credential.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotLoggedIn`] when nothing is stored.
    pub fn credential(&self) -> Result<Credential, Error> {
        self.transport
            .token_store()
            .get()
            .ok_or_else(|| AuthError::NotLoggedIn.into())
    }

    /// Log in and store the issued credential.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (typically 401 with its message) or a
    /// schema error if no access token came back. Never triggers a refresh.
    #[instrument(skip(self, credentials), fields(backend = %self.backend(), username = %credentials.username()))]
    pub async fn login(&self, credentials: LoginCredentials) -> Result<Credential, Error> {
        info!("Logging in");

        let request = RequestDescriptor::post(LOGIN)
            .anonymous()
            .payload(&LoginRequest {
                username: credentials.username(),
                password: credentials.password(),
            })?;

        let (status, data): (u16, LoginData) = self.transport.send_enveloped(request).await?;
        if data.access_token.is_empty() {
            return Err(SchemaError {
                status,
                endpoint: LOGIN.to_string(),
                message: None,
                detail: "empty 'access_token'".to_string(),
            }
            .into());
        }

        let credential = Credential::new(
            AccessToken::new(data.access_token),
            data.refresh_token.map(RefreshToken::new),
        );
        self.transport.adopt(credential.clone())?;

        debug!("Logged in");
        Ok(credential)
    }

    /// Sign in with an access token issued elsewhere, for example one handed
    /// over in a redirect after an external login.
    ///
    /// The backend is not contacted. The token replaces any stored
    /// credential, including its refresh companion.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::Token`](crate::error::InvalidInputError::Token)
    /// when the token is blank or cannot be sent as a header.
    #[instrument(skip(self, token), fields(backend = %self.backend()))]
    pub fn use_token(&self, token: AccessToken) -> Result<Credential, Error> {
        if token.as_str().trim().is_empty() {
            return Err(InvalidInputError::Token("Access token is empty".to_string()).into());
        }

        info!("Adopting access token");
        let credential = Credential::new(token, None);
        self.transport.adopt(credential.clone()).map_err(|_| {
            InvalidInputError::Token("Access token is not a valid header value".to_string())
        })?;
        Ok(credential)
    }

    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInputError::Registration`](crate::error::InvalidInputError::Registration)
    /// without contacting the backend when the form is incomplete or
    /// inconsistent, otherwise the backend's rejection.
    #[instrument(skip(self, registration), fields(backend = %self.backend(), username = %registration.username()))]
    pub async fn register(&self, registration: &Registration) -> Result<(), Error> {
        registration.validate()?;
        info!("Registering account");

        let request = RequestDescriptor::post(REGISTER)
            .anonymous()
            .payload(&RegisterRequest {
                username: registration.username(),
                email: registration.email(),
                password: registration.password(),
            })?;

        let _: serde_json::Value = self.transport.send(request).await?;
        Ok(())
    }

    /// Forget the stored credential. The backend is not contacted.
    #[instrument(skip(self), fields(backend = %self.backend()))]
    pub fn logout(&self) {
        info!("Logging out");
        self.transport.forget();
    }

    /// Ask the backend for a new access token now.
    ///
    /// # Errors
    ///
    /// On failure the stored credential is cleared and
    /// [`AuthError::SessionExpired`](crate::error::AuthError::SessionExpired)
    /// is returned.
    pub async fn refresh(&self) -> Result<Credential, Error> {
        self.transport.refresh().await
    }

    /// Fetch the dashboard summary for the signed-in user.
    #[instrument(skip(self), fields(backend = %self.backend()))]
    pub async fn dashboard(&self) -> Result<DashboardSummary, Error> {
        debug!("Fetching dashboard");
        self.transport
            .send_data(RequestDescriptor::get(DASHBOARD))
            .await
    }

    /// List the signed-in user's links.
    #[instrument(skip(self), fields(backend = %self.backend(), page = query.page, limit = query.limit))]
    pub async fn list_urls(&self, query: &UrlQuery) -> Result<UrlPage, Error> {
        debug!("Listing links");
        let request = RequestDescriptor::get(URLS).payload(query)?;
        let urls: Vec<ShortUrl> = self.transport.send_data(request).await?;
        Ok(UrlPage::from_urls(query, urls))
    }

    /// Fetch one link with its click count.
    #[instrument(skip(self), fields(backend = %self.backend()))]
    pub async fn analytics(&self, id: u64) -> Result<ShortUrl, Error> {
        debug!("Fetching analytics");
        self.transport
            .send_data(RequestDescriptor::get(endpoints::analytics(id)))
            .await
    }

    /// Create a short link.
    #[instrument(skip(self, link), fields(backend = %self.backend(), url = %link.url()))]
    pub async fn shorten(&self, link: &NewShortUrl) -> Result<ShortUrl, Error> {
        info!("Creating short link");
        let request = RequestDescriptor::post(SHORTEN).payload(link)?;
        let created: ShortUrl = self.transport.send_data(request).await?;
        debug!(short_code = %created.short_code, "Short link created");
        Ok(created)
    }
}
