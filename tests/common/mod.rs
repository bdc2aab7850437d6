use async_trait::async_trait;
use royale_campaigns::domain::ports::{
    PaymentCollector, PaymentOutcome, PaymentRequest, PaymentVerifier,
};
use royale_campaigns::error::{CampaignError, Result};

/// Collector that resolves every request with a pre-scripted outcome.
pub struct ScriptedCollector {
    pub outcome: PaymentOutcome,
}

#[async_trait]
impl PaymentCollector for ScriptedCollector {
    async fn collect(&self, _request: &PaymentRequest) -> Result<PaymentOutcome> {
        Ok(self.outcome.clone())
    }
}

/// Collector that completes with the request's own reference, the way the
/// hosted widget echoes the reference it was opened with.
pub struct EchoCollector;

#[async_trait]
impl PaymentCollector for EchoCollector {
    async fn collect(&self, request: &PaymentRequest) -> Result<PaymentOutcome> {
        Ok(PaymentOutcome::Completed {
            reference: request.reference.clone(),
        })
    }
}

/// Verifier with a fixed verdict.
pub struct ScriptedVerifier {
    pub verdict: bool,
}

#[async_trait]
impl PaymentVerifier for ScriptedVerifier {
    async fn verify(&self, _reference: &str) -> Result<bool> {
        Ok(self.verdict)
    }
}

/// Verifier whose round-trip fails at the transport level.
pub struct UnreachableVerifier;

#[async_trait]
impl PaymentVerifier for UnreachableVerifier {
    async fn verify(&self, _reference: &str) -> Result<bool> {
        Err(CampaignError::CollectorError(
            "verification endpoint unreachable".to_string(),
        ))
    }
}

pub const SUBMISSION_HEADER: &str =
    "full_name,brand_name,email,phone,about_product,product_link,goals,ad_types";

/// Builds a submissions CSV from raw data rows.
pub fn submissions_csv(rows: &[&str]) -> String {
    let mut csv = String::from(SUBMISSION_HEADER);
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    csv.push('\n');
    csv
}
