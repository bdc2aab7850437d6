use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::campaign::{AdvertisementType, CampaignGoal, ExpectedResults};

/// Baseline monthly outcome per goal before ad-type multipliers.
const BASE_LEADS: u64 = 500;
const BASE_SALES: u64 = 200;
const BASE_ENGAGEMENT: u64 = 10_000;

const CONTENT_MULTIPLIER: Decimal = dec!(1.5);
const PLATFORM_MULTIPLIER: Decimal = dec!(2);

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct GoalPricing {
    pub leads: u64,
    pub sales: u64,
    pub engagement: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct AdTypePricing {
    pub content: u64,
    pub platform: u64,
}

/// Immutable price configuration for the campaign quote.
///
/// One monthly price per goal and per advertisement type, in whole naira.
/// The table is injected wherever quotes are computed, so tests can swap
/// in alternate tiers; `Default` carries the production prices.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct PricingTable {
    pub goals: GoalPricing,
    pub ad_types: AdTypePricing,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            goals: GoalPricing {
                leads: 60_000,
                sales: 80_000,
                engagement: 40_000,
            },
            ad_types: AdTypePricing {
                content: 30_000,
                platform: 60_000,
            },
        }
    }
}

/// A live price-and-projection snapshot for the current selection.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
pub struct Quote {
    pub total_price: u64,
    pub expected_results: ExpectedResults,
}

impl PricingTable {
    pub fn goal_price(&self, goal: CampaignGoal) -> u64 {
        match goal {
            CampaignGoal::Leads => self.goals.leads,
            CampaignGoal::Sales => self.goals.sales,
            CampaignGoal::Engagement => self.goals.engagement,
        }
    }

    pub fn ad_type_price(&self, ad_type: AdvertisementType) -> u64 {
        match ad_type {
            AdvertisementType::Content => self.ad_types.content,
            AdvertisementType::Platform => self.ad_types.platform,
        }
    }

    /// Total monthly price for a selection: the sum of each distinct
    /// goal's price plus each distinct advertisement type's price.
    /// Empty selections cost nothing.
    pub fn price(
        &self,
        goals: &BTreeSet<CampaignGoal>,
        ad_types: &BTreeSet<AdvertisementType>,
    ) -> u64 {
        let goal_total: u64 = goals.iter().map(|goal| self.goal_price(*goal)).sum();
        let ad_type_total: u64 = ad_types
            .iter()
            .map(|ad_type| self.ad_type_price(*ad_type))
            .sum();
        goal_total + ad_type_total
    }

    /// Projects monthly outcomes for each selected goal.
    ///
    /// Content advertising multiplies the baseline by 1.5, platform ads by
    /// 2, and the multipliers compound. Counts round half away from zero.
    /// Goals that were not selected stay absent from the result.
    pub fn expected_results(
        &self,
        goals: &BTreeSet<CampaignGoal>,
        ad_types: &BTreeSet<AdvertisementType>,
    ) -> ExpectedResults {
        let multiplier = outcome_multiplier(ad_types);

        let mut results = ExpectedResults::default();
        for goal in goals {
            match goal {
                CampaignGoal::Leads => results.leads = Some(project(BASE_LEADS, multiplier)),
                CampaignGoal::Sales => results.sales = Some(project(BASE_SALES, multiplier)),
                CampaignGoal::Engagement => {
                    results.engagement = Some(project(BASE_ENGAGEMENT, multiplier))
                }
            }
        }
        results
    }

    pub fn quote(
        &self,
        goals: &BTreeSet<CampaignGoal>,
        ad_types: &BTreeSet<AdvertisementType>,
    ) -> Quote {
        Quote {
            total_price: self.price(goals, ad_types),
            expected_results: self.expected_results(goals, ad_types),
        }
    }
}

fn outcome_multiplier(ad_types: &BTreeSet<AdvertisementType>) -> Decimal {
    let content = if ad_types.contains(&AdvertisementType::Content) {
        CONTENT_MULTIPLIER
    } else {
        Decimal::ONE
    };
    let platform = if ad_types.contains(&AdvertisementType::Platform) {
        PLATFORM_MULTIPLIER
    } else {
        Decimal::ONE
    };
    content * platform
}

fn project(base: u64, multiplier: Decimal) -> u64 {
    // Inputs are non-negative; saturate rather than wrap on absurd tables.
    (Decimal::from(base) * multiplier)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}

/// Formats a whole-naira amount as `₦` plus a comma-grouped integer.
pub fn format_currency(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("₦{grouped}")
}
