//! Account lifecycle: sign-up with a profile row, sign-in, sign-out.

use crate::profile::PROFILES;
use crate::state::{StoreSnapshot, StoreState};
use brandkit_core::ClientError;
use brandkit_gateway::{Gateway, User};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

/// Postgres `insufficient_privilege`, raised by row level security.
pub const PERMISSION_DENIED_CODE: &str = "42501";

const PERMISSION_DENIED_MESSAGE: &str = "Permission denied while creating profile. Please try again.";
const NETWORK_MESSAGE: &str = "Network error. Please check your connection.";
const PROFILE_NOT_FOUND: &str = "Profile not found";

/// The message shown to the user for `error`.
pub fn friendly_message(error: &ClientError) -> String {
    match error {
        e if e.code() == Some(PERMISSION_DENIED_CODE) => PERMISSION_DENIED_MESSAGE.to_string(),
        ClientError::Offline | ClientError::Transient(_) => NETWORK_MESSAGE.to_string(),
        e => e.to_string(),
    }
}

/// Tracks the signed-in user.
///
/// Unlike the collection stores, failures are recorded with
/// [`friendly_message`] and every operation except
/// [`check_user`](Self::check_user) returns its error.
#[derive(Debug)]
pub struct AuthStore {
    gateway: Arc<Gateway>,
    state: StoreState<Option<User>>,
}

impl AuthStore {
    /// Starts with the user of a restored session, if any.
    pub fn new(gateway: Arc<Gateway>) -> Self {
        let user = gateway.auth().current_user().ok();
        Self {
            gateway,
            state: StoreState::new(user),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.state.data()
    }

    pub fn loading(&self) -> bool {
        self.state.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn snapshot(&self) -> StoreSnapshot<Option<User>> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot<Option<User>>> {
        self.state.subscribe()
    }

    /// Create an account and its profile row.
    ///
    /// The account must come back with a session, since the profile insert
    /// runs as the new user.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<User, ClientError> {
        let _guard = self.state.begin();
        let result = self.create_account(email, password, full_name).await;
        self.settle(&result);
        result
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<User, ClientError> {
        let auth = self.gateway.auth();
        let signed_up = auth
            .sign_up(email, password, json!({ "full_name": full_name }))
            .await?;
        if signed_up.session.is_none() {
            return Err(ClientError::Unknown("No session data returned".to_string()));
        }

        let now = Utc::now();
        let row = json!({
            "id": signed_up.user.id,
            "email": email,
            "full_name": full_name,
            "created_at": now,
            "updated_at": now,
        });
        if let Err(error) = self.gateway.from(PROFILES).insert(&row).execute().await {
            tracing::error!(%error, code = ?error.code(), user = %signed_up.user.id, "profile creation failed");
            return Err(error);
        }

        tracing::info!(user = %signed_up.user.id, "account created");
        Ok(signed_up.user)
    }

    /// Sign in and confirm the user has a profile row.
    ///
    /// A user whose profile lookup is rejected is signed out again and gets
    /// "Profile not found". When the lookup fails on the network the session
    /// is kept and the network error is returned.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let _guard = self.state.begin();
        let result = self.authenticate(email, password).await;
        self.settle(&result);
        result
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let auth = self.gateway.auth();
        let session = auth.sign_in_with_password(email, password).await?;

        let profile: Result<serde_json::Value, _> = self
            .gateway
            .from(PROFILES)
            .select("id")
            .eq("id", &session.user.id)
            .fetch_one()
            .await;
        match profile {
            Ok(_) => Ok(session.user),
            Err(error @ ClientError::RemoteRejected { .. }) => {
                tracing::warn!(%error, user = %session.user.id, "profile check failed");
                if let Err(error) = auth.sign_out().await {
                    tracing::debug!(%error, "remote sign-out failed");
                }
                Err(ClientError::Unknown(PROFILE_NOT_FOUND.to_string()))
            }
            Err(error) => {
                tracing::warn!(%error, user = %session.user.id, "profile check did not complete");
                Err(error)
            }
        }
    }

    /// End the session. The local state is cleared even when the remote
    /// call fails.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let _guard = self.state.begin();
        let result = self.gateway.auth().sign_out().await;
        self.state.modify(|user| *user = None);
        if let Err(error) = &result {
            self.state.fail(friendly_message(error));
        }
        result
    }

    /// Ask the auth service who is signed in. Failures leave no user and an
    /// error message.
    pub async fn check_user(&self) {
        let _guard = self.state.begin();
        let result = self.gateway.auth().get_user().await;
        if let Err(error) = &result {
            tracing::debug!(%error, "no verified user");
        }
        self.settle(&result);
    }

    fn settle(&self, result: &Result<User, ClientError>) {
        match result {
            Ok(user) => self.state.modify(|current| *current = Some(user.clone())),
            Err(error) => {
                self.state.modify(|current| *current = None);
                self.state.fail(friendly_message(error));
            }
        }
    }
}
