use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CampaignError;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CampaignGoal {
    Leads,
    Sales,
    Engagement,
}

impl fmt::Display for CampaignGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignGoal::Leads => write!(f, "leads"),
            CampaignGoal::Sales => write!(f, "sales"),
            CampaignGoal::Engagement => write!(f, "engagement"),
        }
    }
}

impl FromStr for CampaignGoal {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leads" => Ok(CampaignGoal::Leads),
            "sales" => Ok(CampaignGoal::Sales),
            "engagement" => Ok(CampaignGoal::Engagement),
            other => Err(CampaignError::ValidationError(format!(
                "Unknown campaign goal: {other}"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AdvertisementType {
    Content,
    Platform,
}

impl fmt::Display for AdvertisementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvertisementType::Content => write!(f, "content"),
            AdvertisementType::Platform => write!(f, "platform"),
        }
    }
}

impl FromStr for AdvertisementType {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => Ok(AdvertisementType::Content),
            "platform" => Ok(AdvertisementType::Platform),
            other => Err(CampaignError::ValidationError(format!(
                "Unknown advertisement type: {other}"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(CampaignError::ValidationError(format!(
                "Unknown payment status: {other}"
            ))),
        }
    }
}

/// Projected monthly outcomes for the selected goals.
///
/// A field is `Some` only if the corresponding goal was selected; an
/// unselected goal has no projection at all, which is not the same thing
/// as projecting zero.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub struct ExpectedResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<u64>,
}

impl ExpectedResults {
    pub fn is_empty(&self) -> bool {
        self.leads.is_none() && self.sales.is_none() && self.engagement.is_none()
    }
}

/// A single customer's requested marketing engagement.
///
/// Created once the checkout reaches the payment step, persisted as
/// `pending`, and mutated at most once afterwards to settle the payment
/// outcome. The id is assigned at creation and never changes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Campaign {
    pub id: Uuid,
    pub full_name: String,
    pub brand_name: String,
    pub email: String,
    pub phone: String,
    pub about_product: String,
    pub product_link: String,
    pub uploaded_files: Vec<String>,
    pub campaign_goals: BTreeSet<CampaignGoal>,
    pub advertisement_types: BTreeSet<AdvertisementType>,
    pub total_price: u64,
    pub expected_results: ExpectedResults,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Applies a partial update to the record in place.
    pub fn apply(&mut self, update: CampaignUpdate) {
        if let Some(status) = update.payment_status {
            self.payment_status = status;
        }
        if let Some(reference) = update.payment_reference {
            self.payment_reference = Some(reference);
        }
        self.updated_at = update.updated_at;
    }
}

/// Partial-field mutation applied through `CampaignStore::update`.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignUpdate {
    pub payment_status: Option<PaymentStatus>,
    pub payment_reference: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory form state collected over the checkout steps.
///
/// Owned exclusively by the checkout engine until the campaign is
/// persisted; moving backwards through the steps never discards it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CampaignDraft {
    pub full_name: String,
    pub brand_name: String,
    pub email: String,
    pub phone: String,
    pub about_product: String,
    pub product_link: String,
    pub uploaded_files: Vec<String>,
    pub campaign_goals: BTreeSet<CampaignGoal>,
    pub advertisement_types: BTreeSet<AdvertisementType>,
}

impl CampaignDraft {
    pub fn toggle_goal(&mut self, goal: CampaignGoal) {
        if !self.campaign_goals.remove(&goal) {
            self.campaign_goals.insert(goal);
        }
    }

    pub fn toggle_ad_type(&mut self, ad_type: AdvertisementType) {
        if !self.advertisement_types.remove(&ad_type) {
            self.advertisement_types.insert(ad_type);
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>) {
        self.uploaded_files.push(name.into());
    }

    pub fn remove_file(&mut self, index: usize) {
        if index < self.uploaded_files.len() {
            self.uploaded_files.remove(index);
        }
    }

    /// Gate for leaving the details step: full name, brand name, email and
    /// the product description must all be filled in.
    pub fn details_complete(&self) -> bool {
        !self.full_name.is_empty()
            && !self.brand_name.is_empty()
            && !self.email.is_empty()
            && !self.about_product.is_empty()
    }

    /// Gate re-checked right before payment: the contact fields again plus
    /// at least one campaign goal. The product description is not part of
    /// this check.
    pub fn ready_for_payment(&self) -> bool {
        !self.full_name.is_empty()
            && !self.brand_name.is_empty()
            && !self.email.is_empty()
            && !self.campaign_goals.is_empty()
    }
}
