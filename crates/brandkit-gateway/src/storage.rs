//! Object storage buckets.

use crate::gateway::Gateway;
use brandkit_core::ClientError;
use bytes::Bytes;
use reqwest::Method;

/// One storage bucket, obtained from [`Gateway::storage`].
pub struct Bucket<'a> {
    gateway: &'a Gateway,
    name: String,
}

impl<'a> Bucket<'a> {
    pub(crate) fn new(gateway: &'a Gateway, name: &str) -> Self {
        Self {
            gateway,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upload `data` to `path` inside the bucket and return the stored key.
    ///
    /// An existing object at `path` is not overwritten; the store rejects the
    /// upload instead.
    pub async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, ClientError> {
        let path = path.trim_start_matches('/');
        let request = self
            .gateway
            .request(Method::POST, &format!("storage/v1/object/{}/{path}", self.name))
            .await?
            .header("x-upsert", "false")
            .header("Cache-Control", "max-age=3600")
            .body(data, content_type);

        self.gateway.send(request).await?.error_for_status()?;
        tracing::debug!(bucket = %self.name, path, "object uploaded");
        Ok(path.to_string())
    }

    /// Public download URL for `path`. No request is made.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.gateway.config().url(),
            self.name,
            path.trim_start_matches('/')
        )
    }
}
