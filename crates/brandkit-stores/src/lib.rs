//! Observable, per-user caches of the hosted tables.
//!
//! Each store keeps a local copy of the signed-in user's rows together with a
//! `loading` flag and the last error message, published through a
//! [`tokio::sync::watch`] channel. Writes go to the remote table first and
//! update the cache only when the remote call succeeds.
//!
//! Operations that need a user fail with
//! [`ClientError::NotAuthenticated`](brandkit_core::ClientError::NotAuthenticated)
//! before any request is made when nobody is signed in.
//!
//! | Store | Tables |
//! |-------|--------|
//! | [`ProjectStore`] | `projects`, `project_members`, `project_assets`, bucket `project-assets` |
//! | [`MarketResearchStore`] | `market_research`, `competitor_analysis`, `seo_reports` |
//! | [`ProfileStore`] | `profiles` |
//! | [`AuthStore`] | auth service, `profiles` |
//! | [`ConversationStore`] | `ai_conversations` |
//!
//! ```rust,no_run
//! use brandkit_completion::CompletionAdapter;
//! use brandkit_gateway::{Gateway, GatewayConfig};
//! use brandkit_stores::Stores;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::builder(GatewayConfig::from_env()?).build();
//! let stores = Stores::new(gateway, CompletionAdapter::from_env()?);
//!
//! stores.auth().sign_in("ada@example.com", "secret").await?;
//! stores.projects().fetch_projects().await;
//! for project in stores.projects().projects().items() {
//!     println!("{}", project.title);
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod conversation;
mod entity;
mod market_research;
mod models;
mod profile;
mod project;
mod state;


pub use auth::{friendly_message, AuthStore, PERMISSION_DENIED_CODE};
pub use conversation::{ConversationStore, GREETING, HISTORY_LIMIT};
pub use entity::{Entity, EntityStore};
pub use market_research::MarketResearchStore;
pub use models::{
    ChatMessage, Competitor, CompetitorDraft, CompetitorPatch, Conversation, EngagementMetrics,
    Keyword, KeywordDraft, KeywordPatch, Priority, Profile, ProfilePatch, Project, ProjectAsset,
    ProjectDraft, ProjectMember, ProjectPatch, Recommendation, Role, SeoReport, SeoReportDraft,
    SeoReportPatch, SocialPresence,
};
pub use profile::ProfileStore;
pub use project::{ProjectStore, ASSET_BUCKET, DEFAULT_MEMBER_ROLE};
pub use state::StoreSnapshot;

use brandkit_completion::CompletionAdapter;
use brandkit_gateway::Gateway;
use std::sync::Arc;

/// One instance of every store, sharing a gateway.
#[derive(Debug)]
pub struct Stores {
    gateway: Arc<Gateway>,
    auth: AuthStore,
    profile: ProfileStore,
    projects: ProjectStore,
    market_research: MarketResearchStore,
    conversation: ConversationStore,
}

impl Stores {
    pub fn new(gateway: Arc<Gateway>, adapter: CompletionAdapter) -> Self {
        Self {
            auth: AuthStore::new(Arc::clone(&gateway)),
            profile: ProfileStore::new(Arc::clone(&gateway)),
            projects: ProjectStore::new(Arc::clone(&gateway)),
            market_research: MarketResearchStore::new(Arc::clone(&gateway)),
            conversation: ConversationStore::new(Arc::clone(&gateway), adapter),
            gateway,
        }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn market_research(&self) -> &MarketResearchStore {
        &self.market_research
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }
}
