use clap::Parser;
use miette::{IntoDiagnostic, Result};
use royale_campaigns::application::checkout::CheckoutEngine;
use royale_campaigns::domain::ports::{CampaignFilter, CampaignStoreBox};
use royale_campaigns::domain::pricing::PricingTable;
use royale_campaigns::infrastructure::in_memory::InMemoryCampaignStore;
#[cfg(feature = "storage-rocksdb")]
use royale_campaigns::infrastructure::rocksdb::RocksDBStore;
use royale_campaigns::infrastructure::sandbox::{SandboxCollector, SandboxVerifier};
use royale_campaigns::interfaces::csv::campaign_writer::CampaignWriter;
use royale_campaigns::interfaces::csv::submission_reader::SubmissionReader;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input campaign submissions CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Only export campaigns with this payment status
    #[arg(long)]
    status: Option<String>,

    /// Only export campaigns that include this goal
    #[arg(long)]
    goal: Option<String>,

    /// Only export campaigns whose name, brand or email contains this term
    #[arg(long)]
    search: Option<String>,
}

impl Cli {
    fn filter(&self) -> Result<CampaignFilter> {
        Ok(CampaignFilter {
            status: self
                .status
                .as_deref()
                .map(str::parse)
                .transpose()
                .into_diagnostic()?,
            goal: self
                .goal
                .as_deref()
                .map(str::parse)
                .transpose()
                .into_diagnostic()?,
            search: self.search.clone(),
        })
    }

    fn store(&self) -> Result<CampaignStoreBox> {
        #[cfg(feature = "storage-rocksdb")]
        if let Some(db_path) = &self.db_path {
            let store = RocksDBStore::open(db_path).into_diagnostic()?;
            return Ok(Box::new(store));
        }
        Ok(Box::new(InMemoryCampaignStore::new()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "royale_campaigns=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let filter = cli.filter()?;

    let mut engine = CheckoutEngine::new(
        PricingTable::default(),
        cli.store()?,
        Box::new(SandboxCollector::new()),
        Box::new(SandboxVerifier::new()),
    );

    // Drive each submission through the checkout against the sandbox
    // collector. Rows that fail a step gate are skipped without a record.
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = SubmissionReader::new(file);
    for (row, submission) in reader.submissions().enumerate() {
        let line = row + 2; // header is line 1
        let draft = match submission.and_then(|s| s.into_draft()) {
            Ok(draft) => draft,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable submission");
                continue;
            }
        };

        engine.reset();
        *engine.draft_mut() = draft;
        if !engine.advance() || !engine.advance() {
            warn!(line, "submission is incomplete, skipping");
            continue;
        }

        if let Err(e) = engine.checkout().await {
            warn!(line, error = %e, "checkout failed");
        }
    }

    let campaigns = engine.into_results(&filter).await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = CampaignWriter::new(stdout.lock());
    writer.write_campaigns(&campaigns).into_diagnostic()?;

    Ok(())
}
