//! Projects, their members and their uploaded assets.

use crate::entity::{merge, require_user, EntityStore};
use crate::models::{Project, ProjectAsset, ProjectDraft, ProjectMember, ProjectPatch};
use crate::state::{StoreSnapshot, StoreState};
use brandkit_core::ClientError;
use brandkit_gateway::Gateway;
use bytes::Bytes;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

/// Storage bucket holding project files.
pub const ASSET_BUCKET: &str = "project-assets";

const MEMBERS: &str = "project_members";
const ASSETS: &str = "project_assets";

/// Role given to a member added without one.
pub const DEFAULT_MEMBER_ROLE: &str = "member";

/// The user's projects plus the currently selected one.
///
/// Members and assets belong to whichever project they were last fetched
/// for and share one `loading`/`error` pair each.
pub struct ProjectStore {
    gateway: Arc<Gateway>,
    projects: EntityStore<Project>,
    current: watch::Sender<Option<Project>>,
    members: StoreState<Vec<ProjectMember>>,
    assets: StoreState<Vec<ProjectAsset>>,
}

impl ProjectStore {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            projects: EntityStore::new(Arc::clone(&gateway)),
            gateway,
            current,
            members: StoreState::new(Vec::new()),
            assets: StoreState::new(Vec::new()),
        }
    }

    /// The project collection itself.
    pub fn projects(&self) -> &EntityStore<Project> {
        &self.projects
    }

    pub fn current_project(&self) -> Option<Project> {
        self.current.borrow().clone()
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<Project>> {
        self.current.subscribe()
    }

    pub fn set_current_project(&self, project: Option<Project>) {
        self.current.send_replace(project);
    }

    pub async fn fetch_projects(&self) {
        self.projects.fetch_all().await;
    }

    pub async fn create_project(&self, draft: ProjectDraft) -> Result<Project, ClientError> {
        self.projects.create(draft).await
    }

    /// Update a project, keeping the current selection in sync.
    pub async fn update_project(&self, id: &str, patch: ProjectPatch) {
        if self.projects.try_update(id, patch.clone()).await.is_err() {
            return;
        }
        self.current.send_if_modified(|current| match current {
            Some(project) if project.id == id => match merge(&*project, &patch) {
                Ok(merged) => {
                    *project = merged;
                    true
                }
                Err(error) => {
                    tracing::warn!(%error, id, "current project not merged");
                    false
                }
            },
            _ => false,
        });
    }

    /// Delete a project, clearing the selection if it was the one removed.
    pub async fn delete_project(&self, id: &str) {
        if self.projects.try_delete(id).await.is_err() {
            return;
        }
        self.current.send_if_modified(|current| {
            if current.as_ref().is_some_and(|p| p.id == id) {
                *current = None;
                true
            } else {
                false
            }
        });
    }

    pub fn members(&self) -> Vec<ProjectMember> {
        self.members.data()
    }

    pub fn members_snapshot(&self) -> StoreSnapshot<Vec<ProjectMember>> {
        self.members.snapshot()
    }

    /// Load the members of `project_id` with their profiles joined in.
    pub async fn fetch_members(&self, project_id: &str) {
        let _ = self.try_fetch_members(project_id).await;
    }

    async fn try_fetch_members(&self, project_id: &str) -> Result<(), ClientError> {
        self.members
            .run(async {
                require_user(&self.gateway)?;
                let rows: Vec<ProjectMember> = self
                    .gateway
                    .from(MEMBERS)
                    .select("*, profile:profiles(*)")
                    .eq("project_id", project_id)
                    .fetch()
                    .await?;
                self.members.modify(|members| *members = rows);
                Ok(())
            })
            .await
    }

    /// Add `user_id` to the project, then reload the member list.
    pub async fn add_member(&self, project_id: &str, user_id: &str, role: Option<&str>) {
        let added = self
            .members
            .run(async {
                require_user(&self.gateway)?;
                let row = json!({
                    "project_id": project_id,
                    "user_id": user_id,
                    "role": role.unwrap_or(DEFAULT_MEMBER_ROLE),
                });
                self.gateway.from(MEMBERS).insert(&row).execute().await
            })
            .await;
        if added.is_ok() {
            self.fetch_members(project_id).await;
        }
    }

    pub async fn remove_member(&self, project_id: &str, user_id: &str) {
        let _ = self
            .members
            .run(async {
                require_user(&self.gateway)?;
                self.gateway
                    .from(MEMBERS)
                    .delete()
                    .eq("project_id", project_id)
                    .eq("user_id", user_id)
                    .execute()
                    .await?;
                self.members.modify(|members| {
                    members.retain(|m| !(m.project_id == project_id && m.user_id == user_id))
                });
                Ok(())
            })
            .await;
    }

    pub fn assets(&self) -> Vec<ProjectAsset> {
        self.assets.data()
    }

    pub fn assets_snapshot(&self) -> StoreSnapshot<Vec<ProjectAsset>> {
        self.assets.snapshot()
    }

    pub async fn fetch_assets(&self, project_id: &str) {
        let _ = self
            .assets
            .run(async {
                require_user(&self.gateway)?;
                let rows: Vec<ProjectAsset> = self
                    .gateway
                    .from(ASSETS)
                    .eq("project_id", project_id)
                    .order("created_at", false)
                    .fetch()
                    .await?;
                self.assets.modify(|assets| *assets = rows);
                Ok(())
            })
            .await;
    }

    /// Store a file under `<project_id>/<random>.<ext>` in [`ASSET_BUCKET`]
    /// and record its public URL.
    pub async fn upload_asset(
        &self,
        project_id: &str,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<ProjectAsset, ClientError> {
        self.assets
            .run(async {
                require_user(&self.gateway)?;
                let bucket = self.gateway.storage(ASSET_BUCKET);
                let key = bucket
                    .upload(&asset_path(project_id, file_name), data, content_type)
                    .await?;

                let row = json!({
                    "project_id": project_id,
                    "name": file_name,
                    "type": content_type,
                    "url": bucket.public_url(&key),
                });
                let asset: ProjectAsset = self.gateway.from(ASSETS).insert(&row).returning().await?;
                tracing::info!(project = project_id, asset = %asset.id, "asset uploaded");
                self.assets.modify(|assets| assets.insert(0, asset.clone()));
                Ok(asset)
            })
            .await
    }

    pub async fn delete_asset(&self, asset_id: &str) {
        let _ = self
            .assets
            .run(async {
                require_user(&self.gateway)?;
                self.gateway
                    .from(ASSETS)
                    .delete()
                    .eq("id", asset_id)
                    .execute()
                    .await?;
                self.assets.modify(|assets| assets.retain(|a| a.id != asset_id));
                Ok(())
            })
            .await;
    }
}

fn asset_path(project_id: &str, file_name: &str) -> String {
    let stem = uuid::Uuid::new_v4();
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{project_id}/{stem}.{ext}"),
        _ => format!("{project_id}/{stem}"),
    }
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("projects", &self.projects)
            .field("current", &self.current.borrow().as_ref().map(|p| p.id.clone()))
            .finish_non_exhaustive()
    }
}
