use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::domain::ports::{PaymentCollector, PaymentOutcome, PaymentRequest, PaymentVerifier};
use crate::error::Result;

/// Local stand-in for the hosted payment widget.
///
/// Approves every request after an optional simulated wait, echoing the
/// supplied reference back the way the hosted flow does. Real deployments
/// substitute a gateway-backed `PaymentCollector`.
#[derive(Default, Clone)]
pub struct SandboxCollector {
    delay: Duration,
}

impl SandboxCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentCollector for SandboxCollector {
    async fn collect(&self, request: &PaymentRequest) -> Result<PaymentOutcome> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        info!(
            reference = %request.reference,
            amount = request.amount,
            currency = %request.currency,
            "sandbox collector approving payment"
        );
        Ok(PaymentOutcome::Completed {
            reference: request.reference.clone(),
        })
    }
}

/// Stand-in for the backend verification endpoint.
///
/// Affirms every reference after an optional simulated round-trip. This is
/// a stub for local runs only; it says nothing about what a production
/// verifier must guarantee.
#[derive(Default, Clone)]
pub struct SandboxVerifier {
    delay: Duration,
}

impl SandboxVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentVerifier for SandboxVerifier {
    async fn verify(&self, reference: &str) -> Result<bool> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        info!(reference = %reference, "sandbox verifier affirming payment");
        Ok(true)
    }
}
