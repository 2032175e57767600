//! Recovery from an expired access token.
//!
//! A request that comes back 401 gets one chance: the transport asks the
//! backend for a new access token and replays the request with it. A second
//! 401, or a failed refresh, is final.

use tracing::{debug, info, instrument, warn};

use crate::auth::{AccessToken, Credential, RefreshToken};
use crate::error::{AuthError, Error, SchemaError};

use super::client::{Received, Transport, decode};
use super::endpoints::{REFRESH_TOKEN, RefreshTokenRequest, RefreshTokenResponse};
use super::request::RequestDescriptor;

impl Transport {
    /// Dispatch `request`, refreshing and replaying once on 401.
    ///
    /// `retried` is true only for the replay, which is never refreshed again.
    pub(crate) async fn execute(
        &self,
        request: &RequestDescriptor,
        retried: bool,
    ) -> Result<Received, Error> {
        match self.dispatch(request).await {
            Err(Error::Api(err)) if err.is_unauthorized() && !request.is_anonymous() && !retried => {
                debug!(endpoint = request.endpoint(), "Access token rejected");
                let credential = self.renew().await?;
                let replay = request.with_bearer(credential.access_token())?;
                Box::pin(self.execute(&replay, true)).await
            }
            other => other,
        }
    }

    /// Obtain a new access token from the backend and make it current.
    ///
    /// # Errors
    ///
    /// Any failure clears the stored credential and yields
    /// [`AuthError::SessionExpired`].
    #[instrument(skip(self), fields(backend = %self.inner.backend))]
    pub async fn refresh(&self) -> Result<Credential, Error> {
        self.renew().await
    }

    async fn renew(&self) -> Result<Credential, Error> {
        info!("Refreshing access token");

        let renewed = match self.request_credential().await {
            Ok(credential) => self.adopt(credential.clone()).map(|()| credential),
            Err(e) => Err(e),
        };

        match renewed {
            Ok(credential) => {
                debug!("Access token refreshed");
                Ok(credential)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing credential");
                self.forget();
                Err(AuthError::SessionExpired.into())
            }
        }
    }

    /// POST to the refresh endpoint. Touches no state.
    async fn request_credential(&self) -> Result<Credential, Error> {
        let previous = self.inner.store.get();
        let body = RefreshTokenRequest {
            refresh_token: previous
                .as_ref()
                .and_then(Credential::refresh_token)
                .map(RefreshToken::as_str),
        };

        let request = RequestDescriptor::post(REFRESH_TOKEN)
            .anonymous()
            .payload(&body)?;
        let received = self.dispatch(&request).await?;
        let response: RefreshTokenResponse = decode(REFRESH_TOKEN, &received)?;

        if response.access_token.is_empty() {
            return Err(SchemaError {
                status: received.status,
                endpoint: REFRESH_TOKEN.to_string(),
                message: None,
                detail: "empty 'access_token'".to_string(),
            }
            .into());
        }

        // Keep the old refresh companion when the backend does not rotate it.
        let refresh_token = response
            .refresh_token
            .map(RefreshToken::new)
            .or_else(|| previous.and_then(|c| c.refresh_token().cloned()));

        Ok(Credential::new(
            AccessToken::new(response.access_token),
            refresh_token,
        ))
    }
}
