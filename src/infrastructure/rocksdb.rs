use crate::domain::campaign::{Campaign, CampaignUpdate};
use crate::domain::ports::{CampaignFilter, CampaignStore};
use crate::error::{CampaignError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for storing campaign records.
pub const CF_CAMPAIGNS: &str = "campaigns";

/// A persistent campaign store backed by RocksDB.
///
/// Records are stored as JSON values keyed by the campaign id's bytes in a
/// dedicated column family.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path,
    /// ensuring the campaigns column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_campaigns = ColumnFamilyDescriptor::new(CF_CAMPAIGNS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_campaigns])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_CAMPAIGNS).ok_or_else(|| {
            CampaignError::InternalError(Box::new(std::io::Error::other(
                "Campaigns column family not found",
            )))
        })
    }

    fn put(&self, campaign: &Campaign) -> Result<()> {
        let cf = self.cf()?;
        let value = serde_json::to_vec(campaign).map_err(|e| {
            CampaignError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;
        self.db.put_cf(cf, campaign.id.as_bytes(), value)?;
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<Campaign> {
        serde_json::from_slice(bytes).map_err(|e| {
            CampaignError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Deserialization error: {}", e),
            )))
        })
    }
}

#[async_trait]
impl CampaignStore for RocksDBStore {
    async fn insert(&self, campaign: Campaign) -> Result<()> {
        self.put(&campaign)
    }

    async fn update(&self, id: Uuid, update: CampaignUpdate) -> Result<()> {
        let cf = self.cf()?;
        if let Some(bytes) = self.db.get_cf(cf, id.as_bytes())? {
            let mut campaign = Self::decode(&bytes)?;
            campaign.apply(update);
            self.put(&campaign)?;
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Campaign>> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let cf = self.cf()?;
        self.db.delete_cf(cf, id.as_bytes())?;
        Ok(())
    }

    async fn select(&self, filter: &CampaignFilter) -> Result<Vec<Campaign>> {
        let cf = self.cf()?;
        let mut matching = Vec::new();
        let iter = self.db.iterator_cf(cf, rocksdb::IteratorMode::Start);

        for item in iter {
            let (_key, value) = item?;
            let campaign = Self::decode(&value)?;
            if filter.matches(&campaign) {
                matching.push(campaign);
            }
        }

        matching.sort_by_key(|campaign| (campaign.created_at, campaign.id));
        Ok(matching)
    }
}
