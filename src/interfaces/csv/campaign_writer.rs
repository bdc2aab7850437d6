use serde::Serialize;
use std::fmt::Display;
use std::io::Write;

use crate::domain::campaign::Campaign;
use crate::error::Result;

#[derive(Serialize)]
struct ExportRow<'a> {
    full_name: &'a str,
    brand_name: &'a str,
    email: &'a str,
    phone: &'a str,
    goals: String,
    ad_types: String,
    total_price: u64,
    payment_status: String,
    created_at: String,
}

/// Writes campaign records as CSV, one row per campaign.
///
/// List columns are joined with `"; "`; timestamps are RFC 3339.
pub struct CampaignWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CampaignWriter<W> {
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    pub fn write_campaigns(&mut self, campaigns: &[Campaign]) -> Result<()> {
        for campaign in campaigns {
            self.writer.serialize(ExportRow {
                full_name: &campaign.full_name,
                brand_name: &campaign.brand_name,
                email: &campaign.email,
                phone: &campaign.phone,
                goals: join(campaign.campaign_goals.iter()),
                ad_types: join(campaign.advertisement_types.iter()),
                total_price: campaign.total_price,
                payment_status: campaign.payment_status.to_string(),
                created_at: campaign.created_at.to_rfc3339(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::CampaignError::IoError(e.into_error()))
    }
}

fn join<T: Display>(items: impl Iterator<Item = T>) -> String {
    items
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
