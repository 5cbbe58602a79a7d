//! The assistant chat transcript.

use crate::models::{ChatMessage, Conversation};
use crate::state::{StoreSnapshot, StoreState};
use brandkit_completion::CompletionAdapter;
use brandkit_core::ClientError;
use brandkit_gateway::Gateway;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;

const CONVERSATIONS: &str = "ai_conversations";

/// Number of stored exchanges restored by [`ConversationStore::load_history`].
pub const HISTORY_LIMIT: usize = 50;

/// First line of every transcript.
pub const GREETING: &str = "Hello! I'm your AI branding assistant. I can help you with:\n\n\
• Brand Strategy\n\
• Logo Design Concepts\n\
• Color Palette Suggestions\n\
• Marketing Messages\n\
• Brand Voice Development\n\
• Visual Identity Guidelines\n\n\
What would you like to explore?";

/// A transcript that starts with [`GREETING`] and grows with each
/// [`ask`](ConversationStore::ask).
///
/// Exchanges are saved to `ai_conversations` while a user is signed in.
/// Saving is best effort; a failed save is logged and the reply is still
/// returned.
#[derive(Debug)]
pub struct ConversationStore {
    gateway: Arc<Gateway>,
    adapter: CompletionAdapter,
    state: StoreState<Vec<ChatMessage>>,
}

impl ConversationStore {
    pub fn new(gateway: Arc<Gateway>, adapter: CompletionAdapter) -> Self {
        Self {
            gateway,
            adapter,
            state: StoreState::new(vec![ChatMessage::assistant(GREETING)]),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.data()
    }

    pub fn loading(&self) -> bool {
        self.state.loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn snapshot(&self) -> StoreSnapshot<Vec<ChatMessage>> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot<Vec<ChatMessage>>> {
        self.state.subscribe()
    }

    /// Append the user's most recent [`HISTORY_LIMIT`] exchanges, oldest
    /// first. Does nothing when signed out.
    pub async fn load_history(&self) {
        let Ok(user) = self.gateway.auth().current_user() else {
            return;
        };
        let result = self
            .state
            .run(async {
                let mut rows: Vec<Conversation> = self
                    .gateway
                    .from(CONVERSATIONS)
                    .eq("user_id", &user.id)
                    .order("created_at", false)
                    .limit(HISTORY_LIMIT)
                    .fetch()
                    .await?;
                rows.reverse();
                let count = rows.len();
                self.state.modify(|messages| {
                    messages.extend(rows.into_iter().flat_map(|row| {
                        [ChatMessage::user(row.message), ChatMessage::assistant(row.response)]
                    }))
                });
                Ok::<_, ClientError>(count)
            })
            .await;
        match result {
            Ok(count) => tracing::debug!(count, "conversation history loaded"),
            Err(error) => tracing::warn!(%error, "conversation history not loaded"),
        }
    }

    /// Send `prompt` to the assistant and return its reply.
    ///
    /// Blank prompts are ignored and yield `None`.
    pub async fn ask(&self, prompt: &str) -> Option<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }

        let _guard = self.state.begin();
        self.state
            .modify(|messages| messages.push(ChatMessage::user(prompt)));

        let reply = self.adapter.generate_response(prompt).await;
        self.save(prompt, &reply).await;

        self.state
            .modify(|messages| messages.push(ChatMessage::assistant(reply.clone())));
        Some(reply)
    }

    async fn save(&self, prompt: &str, reply: &str) {
        let Ok(user) = self.gateway.auth().current_user() else {
            return;
        };
        let row = json!({ "user_id": user.id, "message": prompt, "response": reply });
        if let Err(error) = self.gateway.from(CONVERSATIONS).insert(&row).execute().await {
            tracing::warn!(%error, "conversation not saved");
        }
    }

    /// Drop everything but the greeting.
    pub fn reset(&self) {
        self.state.modify(|messages| messages.truncate(1));
    }
}
