//! Email and password authentication.

use crate::gateway::Gateway;
use crate::session::{Session, TokenResponse, User};
use brandkit_core::ClientError;
use reqwest::Method;
use serde_json::json;
use std::time::Duration;

/// A session closer than this to expiry is refreshed before use.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Result of a sign-up. The session is absent when the account must be
/// confirmed by email first.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUp {
    pub user: User,
    pub session: Option<Session>,
}

/// Authentication operations, obtained from [`Gateway::auth`].
pub struct Auth<'a> {
    gateway: &'a Gateway,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Register a new account. `metadata` is stored as the user's metadata.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<SignUp, ClientError> {
        let request = self
            .gateway
            .anon_request(Method::POST, "auth/v1/signup")?
            .json(&json!({ "email": email, "password": password, "data": metadata }))?;
        let response = self.gateway.send(request).await?.error_for_status()?;

        if let Ok(token) = response.decode::<TokenResponse>() {
            let session = Session::from(token);
            self.gateway.set_session(Some(session.clone()));
            tracing::info!(user = %session.user.id, "signed up");
            return Ok(SignUp {
                user: session.user.clone(),
                session: Some(session),
            });
        }

        let user: User = response.decode()?;
        tracing::info!(user = %user.id, "signed up, confirmation pending");
        Ok(SignUp {
            user,
            session: None,
        })
    }

    /// Sign in and store the session.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let request = self
            .gateway
            .anon_request(Method::POST, "auth/v1/token")?
            .query("grant_type", "password")
            .json(&json!({ "email": email, "password": password }))?;
        let session: Session = self
            .gateway
            .send(request)
            .await?
            .error_for_status()?
            .decode::<TokenResponse>()?
            .into();

        self.gateway.set_session(Some(session.clone()));
        tracing::info!(user = %session.user.id, "signed in");
        Ok(session)
    }

    /// Revoke the session remotely and forget it locally.
    ///
    /// The local session is cleared even if the remote call fails.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let Some(session) = self.gateway.current_session() else {
            return Ok(());
        };

        let result = async {
            let request = self.gateway.request_with_token(
                Method::POST,
                "auth/v1/logout",
                &session.access_token,
            )?;
            self.gateway.send(request).await?.error_for_status()?;
            Ok::<(), ClientError>(())
        }
        .await;

        self.gateway.set_session(None);
        tracing::info!(user = %session.user.id, "signed out");
        result
    }

    /// Exchange the refresh token for a new session.
    ///
    /// A rejected refresh token ends the session; a network failure keeps it.
    pub async fn refresh_session(&self) -> Result<Session, ClientError> {
        let current = self
            .gateway
            .current_session()
            .ok_or(ClientError::NotAuthenticated)?;

        let request = self
            .gateway
            .anon_request(Method::POST, "auth/v1/token")?
            .query("grant_type", "refresh_token")
            .json(&json!({ "refresh_token": current.refresh_token }))?;

        let result = async {
            let token: TokenResponse = self
                .gateway
                .send(request)
                .await?
                .error_for_status()?
                .decode()?;
            Ok::<Session, ClientError>(token.into())
        }
        .await;

        match result {
            Ok(session) => {
                tracing::debug!(user = %session.user.id, "session refreshed");
                self.gateway.set_session(Some(session.clone()));
                Ok(session)
            }
            Err(error @ ClientError::RemoteRejected { .. }) => {
                tracing::warn!(%error, "refresh token rejected, signing out locally");
                self.gateway.set_session(None);
                Err(error)
            }
            Err(error) => Err(error),
        }
    }

    /// The current session, refreshed first if it expires within
    /// [`REFRESH_MARGIN`].
    pub async fn session(&self) -> Result<Option<Session>, ClientError> {
        match self.gateway.current_session() {
            None => Ok(None),
            Some(session) if session.expires_within(REFRESH_MARGIN) => {
                self.refresh_session().await.map(Some)
            }
            Some(session) => Ok(Some(session)),
        }
    }

    /// The signed-in user, read from the local session without a network
    /// call.
    pub fn current_user(&self) -> Result<User, ClientError> {
        self.gateway
            .current_session()
            .map(|s| s.user)
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Ask the auth service for the signed-in user.
    pub async fn get_user(&self) -> Result<User, ClientError> {
        let session = self.session().await?.ok_or(ClientError::NotAuthenticated)?;
        let request =
            self.gateway
                .request_with_token(Method::GET, "auth/v1/user", &session.access_token)?;
        self.gateway
            .send(request)
            .await?
            .error_for_status()?
            .decode()
    }
}
