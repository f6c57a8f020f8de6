//! Sitefetch main entry point
//!
//! This is the command-line interface for the sitefetch load checker.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sitefetch::config::{default_user_agent, Options, SlowLimit};
use sitefetch::output::{print_report, write_csv_report};
use sitefetch::ConfigError;
use tracing_subscriber::EnvFilter;

/// Sitefetch: fetch every URL a sitemap points at
///
/// Sitefetch resolves a sitemap (following sitemap index references
/// recursively), fetches all page URLs it finds under a concurrency
/// budget, and reports failed and slow responses.
#[derive(Parser, Debug)]
#[command(name = "sitefetch")]
#[command(version)]
#[command(about = "Fetch a sitemap and retrieve all URLs in it", long_about = None)]
struct Cli {
    /// URL of the sitemap to fetch
    #[arg(value_name = "SITEMAP_URL")]
    sitemap_url: String,

    /// Only fetch the sitemap document itself, ignoring sitemap index references
    #[arg(long)]
    no_recursive: bool,

    /// Maximum number of concurrent requests
    #[arg(short, long, default_value_t = 5)]
    concurrency_limit: usize,

    /// Timeout per request in seconds
    #[arg(short = 't', long, default_value_t = 30)]
    request_timeout: u64,

    /// Maximum number of URLs to fetch from the resolved sitemap
    #[arg(short, long)]
    limit: Option<usize>,

    /// Append a random numeric query suffix to each URL to bypass frontend caches
    #[arg(long)]
    random: bool,

    /// Digit count of the random suffix
    #[arg(long, default_value_t = 15)]
    random_length: usize,

    /// Basic auth credentials as 'username:password'
    #[arg(long, value_name = "USER:PASS")]
    basic_auth: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Store every fetched page under this directory
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Write a CSV report to this path, e.g. ./report.csv
    #[arg(long, value_name = "FILE")]
    report_path: Option<PathBuf>,

    /// Response time in seconds above which a response counts as slow
    #[arg(long, default_value_t = 5.0)]
    slow_threshold: f64,

    /// How many slow responses to list (-1 lists all, 0 hides the section)
    #[arg(long, default_value_t = 10)]
    slow_num: i64,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn into_options(self) -> Result<Options, ConfigError> {
        let basic_auth = self.basic_auth.as_deref().map(str::parse).transpose()?;

        let slow_num = match self.slow_num {
            -1 => SlowLimit::Unlimited,
            n if n >= 0 => SlowLimit::Limited(n as usize),
            n => {
                return Err(ConfigError::Validation(format!(
                    "slow_num must be >= -1, got {n}"
                )))
            }
        };

        Ok(Options {
            sitemap_url: self.sitemap_url,
            recursive: !self.no_recursive,
            concurrency_limit: self.concurrency_limit,
            request_timeout: Duration::from_secs(self.request_timeout),
            limit: self.limit,
            random: self.random,
            random_length: self.random_length,
            basic_auth,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
            output_dir: self.output_dir,
            report_path: self.report_path,
            slow_threshold: Duration::from_secs_f64(self.slow_threshold),
            slow_num,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let options = cli.into_options()?;

    // Failed page fetches are reported, not fatal; only a run that cannot
    // produce any outcomes exits non-zero.
    let report = match sitefetch::run(&options).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    print_report(&report, &options);

    if let Some(path) = &options.report_path {
        write_csv_report(&report, path)?;
        tracing::info!("CSV report written to {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitefetch=info,warn"),
            1 => EnvFilter::new("sitefetch=debug,info"),
            2 => EnvFilter::new("sitefetch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
