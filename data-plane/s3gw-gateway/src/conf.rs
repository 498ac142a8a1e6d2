use envconfig::Envconfig;
use s3gw_listing::{CorruptEntryPolicy, ListingConfig, ParsePolicyError};
use std::error::Error;
use std::num::NonZeroUsize;
use std::time::Duration;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(from = "S3GW_HTTP_PORT", default = "8080")]
    pub http_port: u16,
    /// Rows requested from the index per scan
    #[envconfig(from = "S3GW_FETCH_BATCH_SIZE", default = "100")]
    pub fetch_batch_size: usize,
    /// Upper bound applied to max-keys and max-uploads; 0 disables it
    #[envconfig(from = "S3GW_MAX_KEYS_CEILING", default = "1000")]
    pub max_keys_ceiling: usize,
    /// "skip" or "include"
    #[envconfig(from = "S3GW_CORRUPT_ENTRY_POLICY", default = "skip")]
    pub corrupt_entry_policy: String,
    #[envconfig(from = "S3GW_RETRY_AFTER_SECS", default = "1")]
    pub retry_after_secs: u64,
    #[envconfig(from = "S3GW_SEED_FILE")]
    pub seed_file: Option<String>,
    #[envconfig(from = "S3GW_LOG_LEVEL", default = "info")]
    pub log_level: String,
    // Optional: either "json" or "plain"/"text"; defaults handled in tracing setup
    #[envconfig(from = "LOG_FORMAT")]
    pub log_format: Option<String>,
}

impl Config {
    pub fn load_from_env() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let config = Config::init_from_env()?;
        // fail at startup rather than on the first listing
        config.listing_config()?;
        Ok(config)
    }

    pub fn listing_config(&self) -> Result<ListingConfig, ParsePolicyError> {
        let policy = self.corrupt_entry_policy.parse::<CorruptEntryPolicy>()?;
        Ok(ListingConfig::default()
            .with_fetch_batch_size(self.fetch_batch_size)
            .with_max_count_ceiling(NonZeroUsize::new(self.max_keys_ceiling))
            .with_corrupt_entry_policy(policy)
            .with_retry_after(Duration::from_secs(self.retry_after_secs)))
    }
}
