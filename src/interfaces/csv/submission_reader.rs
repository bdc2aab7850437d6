use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::str::FromStr;

use crate::domain::campaign::{AdvertisementType, CampaignDraft, CampaignGoal};
use crate::error::{CampaignError, Result};

/// One row of the campaign intake file.
///
/// The `goals` and `ad_types` columns hold `;`-separated lowercase tokens
/// (`leads;sales`, `content`), parsed into sets on demand.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CampaignSubmission {
    pub full_name: String,
    pub brand_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub about_product: String,
    #[serde(default)]
    pub product_link: String,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub ad_types: String,
}

impl CampaignSubmission {
    pub fn goals(&self) -> Result<BTreeSet<CampaignGoal>> {
        parse_list(&self.goals)
    }

    pub fn ad_types(&self) -> Result<BTreeSet<AdvertisementType>> {
        parse_list(&self.ad_types)
    }

    /// Converts the row into the draft the checkout engine works on.
    pub fn into_draft(self) -> Result<CampaignDraft> {
        let campaign_goals = self.goals()?;
        let advertisement_types = self.ad_types()?;
        Ok(CampaignDraft {
            full_name: self.full_name,
            brand_name: self.brand_name,
            email: self.email,
            phone: self.phone,
            about_product: self.about_product,
            product_link: self.product_link,
            uploaded_files: Vec::new(),
            campaign_goals,
            advertisement_types,
        })
    }
}

fn parse_list<T>(raw: &str) -> Result<BTreeSet<T>>
where
    T: FromStr<Err = CampaignError> + Ord,
{
    raw.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(T::from_str)
        .collect()
}

/// Reads campaign submissions from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<CampaignSubmission>`. It handles whitespace trimming and
/// flexible record lengths automatically; a malformed row surfaces as a
/// per-row error without stopping the stream.
pub struct SubmissionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SubmissionReader<R> {
    /// Creates a new `SubmissionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes submissions.
    pub fn submissions(self) -> impl Iterator<Item = Result<CampaignSubmission>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CampaignError::from))
    }
}
