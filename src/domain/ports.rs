use async_trait::async_trait;
use uuid::Uuid;

use super::campaign::{Campaign, CampaignGoal, CampaignUpdate, PaymentStatus};
use crate::error::Result;

pub type CampaignStoreBox = Box<dyn CampaignStore>;
pub type PaymentCollectorBox = Box<dyn PaymentCollector>;
pub type PaymentVerifierBox = Box<dyn PaymentVerifier>;

/// Predicate for `CampaignStore::select`.
///
/// All set fields must match: payment status by equality, goal by
/// membership, search term case-insensitively against full name, brand
/// name or email.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CampaignFilter {
    pub status: Option<PaymentStatus>,
    pub goal: Option<CampaignGoal>,
    pub search: Option<String>,
}

impl CampaignFilter {
    pub fn matches(&self, campaign: &Campaign) -> bool {
        if let Some(status) = self.status
            && campaign.payment_status != status
        {
            return false;
        }
        if let Some(goal) = self.goal
            && !campaign.campaign_goals.contains(&goal)
        {
            return false;
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = campaign.full_name.to_lowercase().contains(&term)
                || campaign.brand_name.to_lowercase().contains(&term)
                || campaign.email.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// The persistent record store for campaigns.
///
/// Ids are generated by the caller before insert. Updates are partial and
/// atomic at single-record granularity; concurrent writers to the same id
/// are last-write-wins.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert(&self, campaign: Campaign) -> Result<()>;
    async fn update(&self, id: Uuid, update: CampaignUpdate) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Campaign>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
    async fn select(&self, filter: &CampaignFilter) -> Result<Vec<Campaign>>;
}

/// What the checkout hands to the payment collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Opaque reference the gateway echoes back; the campaign id.
    pub reference: String,
    pub email: String,
    /// Whole currency units, no minor-unit scaling.
    pub amount: u64,
    pub currency: String,
}

/// How a payment attempt resolved at the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Completed { reference: String },
    Cancelled,
    Declined { reason: String },
}

/// The external UI that collects payment credentials.
///
/// `collect` suspends until the customer finishes or abandons the hosted
/// flow; no deadline is imposed here. Wrap the call in a timeout at the
/// call site if one is needed.
#[async_trait]
pub trait PaymentCollector: Send + Sync {
    async fn collect(&self, request: &PaymentRequest) -> Result<PaymentOutcome>;
}

/// Backend confirmation that a collected payment reference is authentic.
/// One round-trip per attempt; there is no retry.
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    async fn verify(&self, reference: &str) -> Result<bool>;
}
