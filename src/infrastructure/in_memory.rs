use crate::domain::campaign::{Campaign, CampaignUpdate};
use crate::domain::ports::{CampaignFilter, CampaignStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for campaign records.
///
/// Uses `Arc<RwLock<HashMap<Uuid, Campaign>>>` to allow shared concurrent
/// access; `Clone` shares the underlying map, which makes the store
/// doubly useful as a test harness's window into persisted state.
#[derive(Default, Clone)]
pub struct InMemoryCampaignStore {
    campaigns: Arc<RwLock<HashMap<Uuid, Campaign>>>,
}

impl InMemoryCampaignStore {
    /// Creates a new, empty in-memory campaign store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CampaignStore for InMemoryCampaignStore {
    async fn insert(&self, campaign: Campaign) -> Result<()> {
        let mut campaigns = self.campaigns.write().await;
        campaigns.insert(campaign.id, campaign);
        Ok(())
    }

    async fn update(&self, id: Uuid, update: CampaignUpdate) -> Result<()> {
        let mut campaigns = self.campaigns.write().await;
        if let Some(campaign) = campaigns.get_mut(&id) {
            campaign.apply(update);
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Campaign>> {
        let campaigns = self.campaigns.read().await;
        Ok(campaigns.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut campaigns = self.campaigns.write().await;
        campaigns.remove(&id);
        Ok(())
    }

    async fn select(&self, filter: &CampaignFilter) -> Result<Vec<Campaign>> {
        let campaigns = self.campaigns.read().await;
        let mut matching: Vec<Campaign> = campaigns
            .values()
            .filter(|campaign| filter.matches(campaign))
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; keep the export stable.
        matching.sort_by_key(|campaign| (campaign.created_at, campaign.id));
        Ok(matching)
    }
}
