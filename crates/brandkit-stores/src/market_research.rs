//! Keyword tracking, competitor analysis and SEO reports.

use crate::entity::EntityStore;
use crate::models::{
    Competitor, CompetitorDraft, CompetitorPatch, Keyword, KeywordDraft, Recommendation,
    SeoReport, SeoReportDraft,
};
use brandkit_core::ClientError;
use brandkit_gateway::Gateway;
use std::sync::Arc;

/// Three independent collections, each with its own `loading`/`error`.
///
/// Search volumes, trend scores and SEO scores are computed by the caller;
/// the store only persists them.
#[derive(Debug)]
pub struct MarketResearchStore {
    keywords: EntityStore<Keyword>,
    competitors: EntityStore<Competitor>,
    seo_reports: EntityStore<SeoReport>,
}

impl MarketResearchStore {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            keywords: EntityStore::new(Arc::clone(&gateway)),
            competitors: EntityStore::new(Arc::clone(&gateway)),
            seo_reports: EntityStore::new(gateway),
        }
    }

    pub fn keywords(&self) -> &EntityStore<Keyword> {
        &self.keywords
    }

    pub fn competitors(&self) -> &EntityStore<Competitor> {
        &self.competitors
    }

    pub fn seo_reports(&self) -> &EntityStore<SeoReport> {
        &self.seo_reports
    }

    pub async fn fetch_keywords(&self) {
        self.keywords.fetch_all().await;
    }

    /// Start tracking `keyword`. Blank input is rejected locally.
    pub async fn add_keyword(
        &self,
        keyword: &str,
        search_volume: i64,
        trend_score: i32,
    ) -> Result<Keyword, ClientError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ClientError::Unknown("keyword must not be empty".to_string()));
        }
        self.keywords
            .create(KeywordDraft {
                keyword: keyword.to_string(),
                search_volume,
                trend_score,
            })
            .await
    }

    pub async fn remove_keyword(&self, id: &str) {
        self.keywords.delete(id).await;
    }

    pub async fn fetch_competitors(&self) {
        self.competitors.fetch_all().await;
    }

    pub async fn add_competitor(&self, draft: CompetitorDraft) -> Result<Competitor, ClientError> {
        self.competitors.create(draft).await
    }

    pub async fn update_competitor(&self, id: &str, patch: CompetitorPatch) {
        self.competitors.update(id, patch).await;
    }

    pub async fn remove_competitor(&self, id: &str) {
        self.competitors.delete(id).await;
    }

    pub async fn fetch_seo_reports(&self) {
        self.seo_reports.fetch_all().await;
    }

    /// Persist an SEO report for `url`. The score is clamped to `0..=100`.
    pub async fn add_seo_report(
        &self,
        url: &str,
        score: i32,
        recommendations: Vec<Recommendation>,
    ) -> Result<SeoReport, ClientError> {
        self.seo_reports
            .create(SeoReportDraft {
                url: url.to_string(),
                score: score.clamp(0, 100),
                recommendations,
            })
            .await
    }

    pub async fn delete_seo_report(&self, id: &str) {
        self.seo_reports.delete(id).await;
    }
}
