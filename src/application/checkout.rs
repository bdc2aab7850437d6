use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::campaign::{Campaign, CampaignDraft, CampaignUpdate, PaymentStatus};
use crate::domain::ports::{
    CampaignFilter, CampaignStoreBox, PaymentCollectorBox, PaymentOutcome, PaymentRequest,
    PaymentVerifierBox,
};
use crate::domain::pricing::{PricingTable, Quote};
use crate::error::{CampaignError, Result};

/// Currency the collector is invoked with.
pub const CURRENCY: &str = "NGN";

/// Where the customer currently is in the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Contact and product details.
    Details,
    /// Goal and advertisement-type selection.
    Goals,
    /// Summary, live quote and the payment action.
    Review,
    /// Payment settled; terminal for this campaign.
    Complete,
}

/// How a `checkout` call resolved.
///
/// Only `Completed` advances the step; every other outcome leaves the
/// customer at the review step with the draft intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Completed { campaign_id: Uuid, reference: String },
    Cancelled { campaign_id: Uuid },
    Declined { campaign_id: Uuid, reason: String },
    VerificationFailed { campaign_id: Uuid },
}

/// The checkout workflow for a single campaign.
///
/// `CheckoutEngine` owns the in-progress draft and drives it through the
/// step sequence, quoting live prices along the way. On checkout it
/// persists the campaign as `pending`, hands payment to the collector and
/// reconciles the outcome back into the stored record. Storage operations
/// are awaited in sequence for each attempt.
pub struct CheckoutEngine {
    pricing: PricingTable,
    store: CampaignStoreBox,
    collector: PaymentCollectorBox,
    verifier: PaymentVerifierBox,
    step: CheckoutStep,
    draft: CampaignDraft,
}

impl CheckoutEngine {
    pub fn new(
        pricing: PricingTable,
        store: CampaignStoreBox,
        collector: PaymentCollectorBox,
        verifier: PaymentVerifierBox,
    ) -> Self {
        Self {
            pricing,
            store,
            collector,
            verifier,
            step: CheckoutStep::Details,
            draft: CampaignDraft::default(),
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn draft(&self) -> &CampaignDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CampaignDraft {
        &mut self.draft
    }

    /// Recomputes price and projected outcomes from the current selection.
    /// Cheap enough to call on every edit; nothing is cached.
    pub fn quote(&self) -> Quote {
        self.pricing
            .quote(&self.draft.campaign_goals, &self.draft.advertisement_types)
    }

    /// Whether the forward action is currently enabled.
    pub fn can_advance(&self) -> bool {
        match self.step {
            CheckoutStep::Details => self.draft.details_complete(),
            CheckoutStep::Goals => !self.draft.campaign_goals.is_empty(),
            // Review advances only through `checkout`.
            CheckoutStep::Review | CheckoutStep::Complete => false,
        }
    }

    /// Moves one step forward if the current step's gate passes.
    ///
    /// A blocked transition returns `false` and changes nothing; no error
    /// is raised and no record is created.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.step = match self.step {
            CheckoutStep::Details => CheckoutStep::Goals,
            CheckoutStep::Goals => CheckoutStep::Review,
            CheckoutStep::Review | CheckoutStep::Complete => return false,
        };
        true
    }

    /// Moves one step back. Always permitted between the form steps and
    /// lossless: the draft keeps every field and selection.
    pub fn back(&mut self) -> bool {
        match self.step {
            CheckoutStep::Goals => {
                self.step = CheckoutStep::Details;
                true
            }
            CheckoutStep::Review => {
                self.step = CheckoutStep::Goals;
                true
            }
            CheckoutStep::Details | CheckoutStep::Complete => false,
        }
    }

    /// Discards the draft and returns to the first step. The next checkout
    /// creates a fresh campaign under a fresh id.
    pub fn reset(&mut self) {
        self.draft = CampaignDraft::default();
        self.step = CheckoutStep::Details;
    }

    /// Runs the payment leg of the checkout.
    ///
    /// Re-validates the required fields, persists the campaign as
    /// `pending`, invokes the payment collector and reconciles its outcome
    /// into the stored record. Validation and storage failures surface as
    /// errors without touching the step; payment-level outcomes are
    /// reported through `CheckoutOutcome`.
    pub async fn checkout(&mut self) -> Result<CheckoutOutcome> {
        if self.step != CheckoutStep::Review {
            return Err(CampaignError::ValidationError(
                "Checkout is only available from the review step".to_string(),
            ));
        }
        if !self.draft.ready_for_payment() {
            return Err(CampaignError::ValidationError(
                "Please fill in all required fields".to_string(),
            ));
        }

        let quote = self.quote();
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            full_name: self.draft.full_name.clone(),
            brand_name: self.draft.brand_name.clone(),
            email: self.draft.email.clone(),
            phone: self.draft.phone.clone(),
            about_product: self.draft.about_product.clone(),
            product_link: self.draft.product_link.clone(),
            uploaded_files: self.draft.uploaded_files.clone(),
            campaign_goals: self.draft.campaign_goals.clone(),
            advertisement_types: self.draft.advertisement_types.clone(),
            total_price: quote.total_price,
            expected_results: quote.expected_results,
            payment_status: PaymentStatus::Pending,
            payment_reference: None,
            created_at: now,
            updated_at: now,
        };
        let id = campaign.id;
        let email = campaign.email.clone();
        let amount = campaign.total_price;

        self.store.insert(campaign).await?;
        info!(campaign = %id, amount, "campaign persisted, collecting payment");

        let request = PaymentRequest {
            reference: id.to_string(),
            email,
            amount,
            currency: CURRENCY.to_string(),
        };

        match self.collector.collect(&request).await? {
            PaymentOutcome::Completed { reference } => {
                let verified = match self.verifier.verify(&reference).await {
                    Ok(verified) => verified,
                    Err(e) => {
                        warn!(campaign = %id, error = %e, "payment verification errored");
                        false
                    }
                };

                if verified {
                    self.store
                        .update(
                            id,
                            CampaignUpdate {
                                payment_status: Some(PaymentStatus::Completed),
                                payment_reference: Some(reference.clone()),
                                updated_at: Utc::now(),
                            },
                        )
                        .await?;
                    self.step = CheckoutStep::Complete;
                    info!(campaign = %id, reference = %reference, "payment completed");
                    Ok(CheckoutOutcome::Completed {
                        campaign_id: id,
                        reference,
                    })
                } else {
                    self.store
                        .update(
                            id,
                            CampaignUpdate {
                                payment_status: Some(PaymentStatus::Failed),
                                payment_reference: None,
                                updated_at: Utc::now(),
                            },
                        )
                        .await?;
                    warn!(campaign = %id, "payment could not be verified");
                    Ok(CheckoutOutcome::VerificationFailed { campaign_id: id })
                }
            }
            PaymentOutcome::Cancelled => {
                // Customer closed the payment flow; the record stays pending.
                info!(campaign = %id, "payment cancelled");
                Ok(CheckoutOutcome::Cancelled { campaign_id: id })
            }
            PaymentOutcome::Declined { reason } => {
                self.store
                    .update(
                        id,
                        CampaignUpdate {
                            payment_status: Some(PaymentStatus::Failed),
                            payment_reference: None,
                            updated_at: Utc::now(),
                        },
                    )
                    .await?;
                warn!(campaign = %id, reason = %reason, "payment declined");
                Ok(CheckoutOutcome::Declined {
                    campaign_id: id,
                    reason,
                })
            }
        }
    }

    /// Consumes the engine and returns the stored campaigns matching the
    /// filter.
    pub async fn into_results(self, filter: &CampaignFilter) -> Result<Vec<Campaign>> {
        self.store.select(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::campaign::{AdvertisementType, CampaignGoal};
    use crate::domain::ports::{CampaignStore, PaymentCollector, PaymentVerifier};
    use crate::infrastructure::in_memory::InMemoryCampaignStore;
    use async_trait::async_trait;

    struct ScriptedCollector {
        outcome: PaymentOutcome,
    }

    #[async_trait]
    impl PaymentCollector for ScriptedCollector {
        async fn collect(&self, _request: &PaymentRequest) -> Result<PaymentOutcome> {
            Ok(self.outcome.clone())
        }
    }

    struct ScriptedVerifier {
        verdict: bool,
    }

    #[async_trait]
    impl PaymentVerifier for ScriptedVerifier {
        async fn verify(&self, _reference: &str) -> Result<bool> {
            Ok(self.verdict)
        }
    }

    fn engine_with(
        store: InMemoryCampaignStore,
        outcome: PaymentOutcome,
        verdict: bool,
    ) -> CheckoutEngine {
        CheckoutEngine::new(
            PricingTable::default(),
            Box::new(store),
            Box::new(ScriptedCollector { outcome }),
            Box::new(ScriptedVerifier { verdict }),
        )
    }

    fn fill_details(engine: &mut CheckoutEngine) {
        let draft = engine.draft_mut();
        draft.full_name = "Ada Obi".to_string();
        draft.brand_name = "Obi Foods".to_string();
        draft.email = "ada@obifoods.ng".to_string();
        draft.about_product = "Packaged spice blends".to_string();
    }

    #[tokio::test]
    async fn test_blocked_details_step_creates_no_record() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(
            store.clone(),
            PaymentOutcome::Cancelled,
            true,
        );

        fill_details(&mut engine);
        engine.draft_mut().brand_name.clear();

        assert!(!engine.advance());
        assert_eq!(engine.step(), CheckoutStep::Details);

        let records = store.select(&CampaignFilter::default()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_goals_step_requires_a_selection() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(store, PaymentOutcome::Cancelled, true);

        fill_details(&mut engine);
        assert!(engine.advance());
        assert_eq!(engine.step(), CheckoutStep::Goals);

        assert!(!engine.advance());

        engine.draft_mut().toggle_goal(CampaignGoal::Sales);
        assert!(engine.advance());
        assert_eq!(engine.step(), CheckoutStep::Review);
    }

    #[tokio::test]
    async fn test_back_is_lossless() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(store, PaymentOutcome::Cancelled, true);

        fill_details(&mut engine);
        engine.advance();
        engine.draft_mut().toggle_goal(CampaignGoal::Leads);
        engine.draft_mut().toggle_ad_type(AdvertisementType::Content);
        engine.advance();

        assert!(engine.back());
        assert!(engine.back());
        assert_eq!(engine.step(), CheckoutStep::Details);
        assert!(!engine.back());

        assert!(engine.draft().campaign_goals.contains(&CampaignGoal::Leads));
        assert!(
            engine
                .draft()
                .advertisement_types
                .contains(&AdvertisementType::Content)
        );
        assert_eq!(engine.draft().full_name, "Ada Obi");
    }

    #[tokio::test]
    async fn test_happy_path_completes_campaign() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(
            store.clone(),
            PaymentOutcome::Completed {
                reference: "ref-123".to_string(),
            },
            true,
        );

        fill_details(&mut engine);
        engine.advance();
        engine.draft_mut().toggle_goal(CampaignGoal::Sales);
        engine.advance();

        assert_eq!(engine.quote().total_price, 80_000);

        let outcome = engine.checkout().await.unwrap();
        let campaign_id = match outcome {
            CheckoutOutcome::Completed {
                campaign_id,
                ref reference,
            } => {
                assert_eq!(reference, "ref-123");
                campaign_id
            }
            other => panic!("Expected completion, got {other:?}"),
        };
        assert_eq!(engine.step(), CheckoutStep::Complete);

        let stored = store.get(campaign_id).await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Completed);
        assert_eq!(stored.payment_reference.as_deref(), Some("ref-123"));
        assert_eq!(stored.total_price, 80_000);
        assert_eq!(stored.expected_results.sales, Some(200));
    }

    #[tokio::test]
    async fn test_verification_failure_marks_record_failed() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(
            store.clone(),
            PaymentOutcome::Completed {
                reference: "ref-123".to_string(),
            },
            false,
        );

        fill_details(&mut engine);
        engine.advance();
        engine.draft_mut().toggle_goal(CampaignGoal::Sales);
        engine.advance();

        let outcome = engine.checkout().await.unwrap();
        let campaign_id = match outcome {
            CheckoutOutcome::VerificationFailed { campaign_id } => campaign_id,
            other => panic!("Expected verification failure, got {other:?}"),
        };
        // The customer stays on review; the record carries the failure.
        assert_eq!(engine.step(), CheckoutStep::Review);

        let stored = store.get(campaign_id).await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Failed);
        assert_eq!(stored.payment_reference, None);
    }

    #[tokio::test]
    async fn test_cancelled_payment_keeps_record_pending() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(store.clone(), PaymentOutcome::Cancelled, true);

        fill_details(&mut engine);
        engine.advance();
        engine.draft_mut().toggle_goal(CampaignGoal::Leads);
        engine.advance();

        let outcome = engine.checkout().await.unwrap();
        let campaign_id = match outcome {
            CheckoutOutcome::Cancelled { campaign_id } => campaign_id,
            other => panic!("Expected cancellation, got {other:?}"),
        };
        assert_eq!(engine.step(), CheckoutStep::Review);

        let stored = store.get(campaign_id).await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Pending);
        assert_eq!(stored.payment_reference, None);
    }

    #[tokio::test]
    async fn test_declined_payment_marks_record_failed() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(
            store.clone(),
            PaymentOutcome::Declined {
                reason: "Insufficient funds".to_string(),
            },
            true,
        );

        fill_details(&mut engine);
        engine.advance();
        engine.draft_mut().toggle_goal(CampaignGoal::Leads);
        engine.advance();

        let outcome = engine.checkout().await.unwrap();
        match outcome {
            CheckoutOutcome::Declined {
                campaign_id,
                reason,
            } => {
                assert_eq!(reason, "Insufficient funds");
                let stored = store.get(campaign_id).await.unwrap().unwrap();
                assert_eq!(stored.payment_status, PaymentStatus::Failed);
            }
            other => panic!("Expected decline, got {other:?}"),
        }
        assert_eq!(engine.step(), CheckoutStep::Review);
    }

    #[tokio::test]
    async fn test_checkout_outside_review_is_rejected() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(store.clone(), PaymentOutcome::Cancelled, true);

        fill_details(&mut engine);
        let result = engine.checkout().await;
        assert!(matches!(result, Err(CampaignError::ValidationError(_))));

        let records = store.select(&CampaignFilter::default()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_retry_after_failure_uses_a_fresh_id() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(
            store.clone(),
            PaymentOutcome::Completed {
                reference: "ref-retry".to_string(),
            },
            false,
        );

        fill_details(&mut engine);
        engine.advance();
        engine.draft_mut().toggle_goal(CampaignGoal::Engagement);
        engine.advance();

        let first = engine.checkout().await.unwrap();
        let second = engine.checkout().await.unwrap();

        let (first_id, second_id) = match (first, second) {
            (
                CheckoutOutcome::VerificationFailed { campaign_id: a },
                CheckoutOutcome::VerificationFailed { campaign_id: b },
            ) => (a, b),
            other => panic!("Expected two verification failures, got {other:?}"),
        };
        assert_ne!(first_id, second_id);

        let records = store.select(&CampaignFilter::default()).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_quote_tracks_selection_changes() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(store, PaymentOutcome::Cancelled, true);

        assert_eq!(engine.quote().total_price, 0);
        assert!(engine.quote().expected_results.is_empty());

        engine.draft_mut().toggle_goal(CampaignGoal::Leads);
        engine.draft_mut().toggle_ad_type(AdvertisementType::Platform);
        let quote = engine.quote();
        assert_eq!(quote.total_price, 120_000);
        assert_eq!(quote.expected_results.leads, Some(1_000));

        engine.draft_mut().toggle_ad_type(AdvertisementType::Platform);
        assert_eq!(engine.quote().total_price, 60_000);
        assert_eq!(engine.quote().expected_results.leads, Some(500));
    }

    #[tokio::test]
    async fn test_reset_starts_over() {
        let store = InMemoryCampaignStore::new();
        let mut engine = engine_with(
            store,
            PaymentOutcome::Completed {
                reference: "ref-1".to_string(),
            },
            true,
        );

        fill_details(&mut engine);
        engine.advance();
        engine.draft_mut().toggle_goal(CampaignGoal::Sales);
        engine.advance();
        engine.checkout().await.unwrap();
        assert_eq!(engine.step(), CheckoutStep::Complete);

        engine.reset();
        assert_eq!(engine.step(), CheckoutStep::Details);
        assert_eq!(engine.draft(), &CampaignDraft::default());
    }
}
