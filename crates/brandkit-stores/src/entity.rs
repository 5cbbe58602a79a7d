//! The CRUD contract shared by every collection store.

use crate::state::{StoreSnapshot, StoreState};
use brandkit_core::ClientError;
use brandkit_gateway::{Gateway, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// A row type stored in one table and owned by one user.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Table the rows live in.
    const TABLE: &'static str;

    /// Column holding the owning user's id. Reads filter on it and inserts
    /// fill it in.
    const OWNER_COLUMN: &'static str = "user_id";

    /// Fields supplied on insert.
    type Draft: Serialize + Send + Sync;

    /// Partial update. Fields that serialize as absent are left untouched.
    type Patch: Serialize + Send + Sync;

    fn id(&self) -> &str;
}

/// The signed-in user, or [`ClientError::NotAuthenticated`] without touching
/// the network.
pub(crate) fn require_user(gateway: &Gateway) -> Result<User, ClientError> {
    gateway.auth().current_user()
}

/// Serialize `draft` and stamp the owner column.
pub(crate) fn owned_row<D: Serialize>(
    draft: &D,
    column: &str,
    owner: &str,
) -> Result<serde_json::Value, ClientError> {
    let mut row = serde_json::to_value(draft)
        .map_err(|e| ClientError::Unknown(format!("failed to encode row: {e}")))?;
    match row.as_object_mut() {
        Some(fields) => {
            fields.insert(column.to_string(), serde_json::Value::String(owner.to_string()));
            Ok(row)
        }
        None => Err(ClientError::Unknown("row must encode as an object".to_string())),
    }
}

/// Field-wise merge of `patch` into `item`.
pub(crate) fn merge<T, P>(item: &T, patch: &P) -> Result<T, ClientError>
where
    T: Serialize + DeserializeOwned,
    P: Serialize,
{
    let encode = |e: serde_json::Error| ClientError::Unknown(format!("failed to merge update: {e}"));

    let mut merged = serde_json::to_value(item).map_err(encode)?;
    if let (Some(target), serde_json::Value::Object(changes)) =
        (merged.as_object_mut(), serde_json::to_value(patch).map_err(encode)?)
    {
        target.extend(changes);
    }
    serde_json::from_value(merged).map_err(encode)
}

/// Apply `patch` to the item with `id`, logging instead of failing when the
/// merged row no longer decodes.
pub(crate) fn merge_by_id<E: Entity>(items: &mut [E], id: &str, patch: &E::Patch) {
    for item in items.iter_mut().filter(|item| item.id() == id) {
        match merge(&*item, patch) {
            Ok(merged) => *item = merged,
            Err(error) => tracing::warn!(%error, table = E::TABLE, id, "cached row not merged"),
        }
    }
}

/// An in-memory projection of the signed-in user's rows of one table.
///
/// Every operation sets `loading` and clears `error` on entry and resets
/// `loading` on every exit path. On success the cache is updated in place:
/// `create` prepends, `update` merges by id, `delete` filters by id and
/// `fetch_all` replaces, newest first. On failure `error` holds the message
/// and the cache is left untouched.
///
/// Only [`create`](Self::create) hands its error back. `update`, `delete`
/// and `fetch_all` report through [`error`](Self::error); their `try_`
/// variants return the result for callers that chain further work.
pub struct EntityStore<E: Entity> {
    gateway: Arc<Gateway>,
    state: StoreState<Vec<E>>,
}

impl<E: Entity> EntityStore<E> {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            state: StoreState::new(Vec::new()),
        }
    }

    pub fn items(&self) -> Vec<E> {
        self.state.data()
    }

    pub fn loading(&self) -> bool {
        self.state.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn snapshot(&self) -> StoreSnapshot<Vec<E>> {
        self.state.snapshot()
    }

    /// Observe every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot<Vec<E>>> {
        self.state.subscribe()
    }

    pub async fn fetch_all(&self) {
        let _ = self.try_fetch_all().await;
    }

    /// Replace the cache with the user's rows, newest first.
    pub async fn try_fetch_all(&self) -> Result<Vec<E>, ClientError> {
        self.state
            .run(async {
                let user = require_user(&self.gateway)?;
                let rows: Vec<E> = self
                    .gateway
                    .from(E::TABLE)
                    .eq(E::OWNER_COLUMN, &user.id)
                    .order("created_at", false)
                    .fetch()
                    .await?;
                tracing::debug!(table = E::TABLE, count = rows.len(), "rows fetched");
                self.state.modify(|items| *items = rows.clone());
                Ok(rows)
            })
            .await
    }

    /// Insert a row owned by the signed-in user and prepend it.
    pub async fn create(&self, draft: E::Draft) -> Result<E, ClientError> {
        self.state
            .run(async {
                let user = require_user(&self.gateway)?;
                let row = owned_row(&draft, E::OWNER_COLUMN, &user.id)?;
                let created: E = self.gateway.from(E::TABLE).insert(&row).returning().await?;
                tracing::debug!(table = E::TABLE, id = created.id(), "row created");
                self.state.modify(|items| items.insert(0, created.clone()));
                Ok(created)
            })
            .await
    }

    pub async fn update(&self, id: &str, patch: E::Patch) {
        let _ = self.try_update(id, patch).await;
    }

    /// Update the row with `id` and merge the patch into the cached copy.
    pub async fn try_update(&self, id: &str, patch: E::Patch) -> Result<(), ClientError> {
        self.state
            .run(async {
                require_user(&self.gateway)?;
                self.gateway
                    .from(E::TABLE)
                    .update(&patch)
                    .eq("id", id)
                    .execute()
                    .await?;
                self.state.modify(|items| merge_by_id(items, id, &patch));
                Ok(())
            })
            .await
    }

    pub async fn delete(&self, id: &str) {
        let _ = self.try_delete(id).await;
    }

    /// Delete the row with `id` and drop it from the cache.
    pub async fn try_delete(&self, id: &str) -> Result<(), ClientError> {
        self.state
            .run(async {
                require_user(&self.gateway)?;
                self.gateway
                    .from(E::TABLE)
                    .delete()
                    .eq("id", id)
                    .execute()
                    .await?;
                self.state.modify(|items| items.retain(|item| item.id() != id));
                Ok(())
            })
            .await
    }
}

impl<E: Entity + std::fmt::Debug> std::fmt::Debug for EntityStore<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("table", &E::TABLE)
            .field("state", &self.state.snapshot())
            .finish()
    }
}
