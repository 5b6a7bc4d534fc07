use pricelist_core::catalog::{build_catalog_url, DEFAULT_API_URL};
use pricelist_core::hourly::TermMatching;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of pages fetched at the same time
pub const DEFAULT_CONCURRENCY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TermMatchingArg {
    /// First of "3", "1", "5" found anywhere in the term wins (default)
    Substring,
    /// Only "<N> Year(s)" with N in 1, 3, 5
    Exact,
}

impl From<TermMatchingArg> for TermMatching {
    fn from(arg: TermMatchingArg) -> Self {
        match arg {
            TermMatchingArg::Substring => TermMatching::Substring,
            TermMatchingArg::Exact => TermMatching::Exact,
        }
    }
}

/// Where to fetch from and how hard to try
#[derive(Debug, Clone, clap::Args)]
pub struct SourceArgs {
    /// Retail prices API endpoint
    #[clap(long, env = "PRICELIST_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Currency code for the returned prices (e.g. "EUR")
    #[clap(long, env = "PRICELIST_CURRENCY")]
    pub currency: Option<String>,

    /// OData filter expression (e.g. "serviceName eq 'Virtual Machines'")
    #[clap(long, env = "PRICELIST_FILTER")]
    pub filter: Option<String>,

    /// Maximum number of pages fetched at the same time
    #[arg(long, env = "PRICELIST_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Attempts per page before the page is dropped
    #[arg(long, default_value_t = RetryPolicy::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Backoff base; the wait after attempt N is factor^N seconds
    #[arg(long, default_value_t = RetryPolicy::DEFAULT_BACKOFF_FACTOR)]
    pub backoff_factor: u32,

    /// Per-request timeout in seconds
    #[arg(long, env = "PRICELIST_TIMEOUT", default_value = "60")]
    pub timeout: u64,

    /// How reservation terms are turned into a number of years
    #[arg(long, value_enum, default_value = "substring")]
    pub term_matching: TermMatchingArg,
}

/// Output file locations
#[derive(Debug, Clone, clap::Args)]
pub struct OutputArgs {
    /// Directory for every output file that is not set explicitly
    #[clap(long, short = 'o', env = "PRICELIST_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Raw price list CSV
    #[clap(long)]
    pub raw_csv: Option<PathBuf>,

    /// Expanded price list CSV
    #[clap(long)]
    pub expanded_csv: Option<PathBuf>,

    /// Price list Parquet file
    #[clap(long)]
    pub parquet: Option<PathBuf>,

    /// Distinct virtual machine SKU names CSV
    #[clap(long)]
    pub skus_csv: Option<PathBuf>,

    /// Distinct regions and locations CSV
    #[clap(long)]
    pub regions_csv: Option<PathBuf>,
}

/// Retry bound and backoff for a single page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_factor: u32,
    /// Length of one backoff step; one second outside tests
    pub unit: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_BACKOFF_FACTOR: u32 = 2;

    /// Wait after the given failed attempt (1-based): `factor ^ attempt` units
    pub fn delay(&self, attempt: u32) -> Duration {
        self.unit
            .saturating_mul(self.backoff_factor.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            backoff_factor: Self::DEFAULT_BACKOFF_FACTOR,
            unit: Duration::from_secs(1),
        }
    }
}

/// Everything the page walker needs
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub start_url: String,
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub timeout: Duration,
    pub max_pages: Option<usize>,
    pub term_matching: TermMatching,
}

impl FetchSettings {
    pub fn from_args(args: &SourceArgs, max_pages: Option<usize>) -> Self {
        Self {
            start_url: build_catalog_url(
                &args.api_url,
                args.currency.as_deref(),
                args.filter.as_deref(),
            ),
            concurrency: args.concurrency.max(1),
            retry: RetryPolicy {
                max_attempts: args.max_attempts.max(1),
                backoff_factor: args.backoff_factor,
                ..RetryPolicy::default()
            },
            timeout: Duration::from_secs(args.timeout),
            max_pages,
            term_matching: args.term_matching.into(),
        }
    }
}

/// Resolved output locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub raw_csv: PathBuf,
    pub expanded_csv: PathBuf,
    pub parquet: PathBuf,
    pub skus_csv: PathBuf,
    pub regions_csv: PathBuf,
}

impl OutputPaths {
    pub const RAW_CSV: &'static str = "azure_raw_prices.csv";
    pub const EXPANDED_CSV: &'static str = "azure_prices.csv";
    pub const PARQUET: &'static str = "azure_prices.parquet";
    pub const SKUS_CSV: &'static str = "azure_vm_ArmSkuNames.csv";
    pub const REGIONS_CSV: &'static str = "azure_vm_LocationsAndArmRegions.csv";

    /// Default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            raw_csv: dir.join(Self::RAW_CSV),
            expanded_csv: dir.join(Self::EXPANDED_CSV),
            parquet: dir.join(Self::PARQUET),
            skus_csv: dir.join(Self::SKUS_CSV),
            regions_csv: dir.join(Self::REGIONS_CSV),
        }
    }

    /// Apply explicit per-file paths on top of the directory defaults
    pub fn from_args(args: &OutputArgs) -> Self {
        let defaults = Self::in_dir(&args.output_dir);
        Self {
            raw_csv: args.raw_csv.clone().unwrap_or(defaults.raw_csv),
            expanded_csv: args.expanded_csv.clone().unwrap_or(defaults.expanded_csv),
            parquet: args.parquet.clone().unwrap_or(defaults.parquet),
            skus_csv: args.skus_csv.clone().unwrap_or(defaults.skus_csv),
            regions_csv: args.regions_csv.clone().unwrap_or(defaults.regions_csv),
        }
    }
}
