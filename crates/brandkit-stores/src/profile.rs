//! The signed-in user's profile row.

use crate::entity::{merge, require_user};
use crate::models::{Profile, ProfilePatch};
use crate::state::{StoreSnapshot, StoreState};
use brandkit_core::ClientError;
use brandkit_gateway::Gateway;
use std::sync::Arc;
use tokio::sync::watch;

pub(crate) const PROFILES: &str = "profiles";

/// Profiles are keyed by the auth user id, so the owner column is `id`.
#[derive(Debug)]
pub struct ProfileStore {
    gateway: Arc<Gateway>,
    state: StoreState<Option<Profile>>,
}

impl ProfileStore {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            state: StoreState::new(None),
        }
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state.data()
    }

    pub fn loading(&self) -> bool {
        self.state.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn snapshot(&self) -> StoreSnapshot<Option<Profile>> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot<Option<Profile>>> {
        self.state.subscribe()
    }

    pub async fn fetch_profile(&self) {
        let _ = self
            .state
            .run(async {
                let user = require_user(&self.gateway)?;
                let profile: Profile = self
                    .gateway
                    .from(PROFILES)
                    .eq("id", &user.id)
                    .fetch_one()
                    .await?;
                self.state.modify(|current| *current = Some(profile));
                Ok(())
            })
            .await;
    }

    /// Update the profile and merge the change into the cached copy, if one
    /// is loaded.
    pub async fn update_profile(&self, patch: ProfilePatch) {
        let _ = self
            .state
            .run(async {
                let user = require_user(&self.gateway)?;
                self.gateway
                    .from(PROFILES)
                    .update(&patch)
                    .eq("id", &user.id)
                    .execute()
                    .await?;
                let merged = match self.state.data() {
                    Some(profile) => Some(merge(&profile, &patch)?),
                    None => None,
                };
                self.state.modify(|current| *current = merged);
                Ok(())
            })
            .await;
    }

    /// Forget the cached profile, e.g. after sign-out.
    pub fn clear(&self) {
        self.state.modify(|current| *current = None);
    }
}
