use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod listing;
mod probe;
mod version;

#[cfg(test)]
mod test_support;

use probe::{HttpProber, first_available};
use version::{Candidate, SdkPattern, select_candidates, sort_newest_first};

#[derive(Parser, Debug)]
#[command(name = "sdkprobe")]
#[command(
    about = "Print the download URL of the newest published SDK archive in a storage bucket",
    version,
    long_about = None
)]
struct Args {
    /// Storage JSON API root
    #[arg(long, default_value = "https://www.googleapis.com/storage/v1")]
    api_base: String,

    /// Bucket to list
    #[arg(short, long, default_value = "appengine-sdks")]
    bucket: String,

    /// Object prefix to list under
    #[arg(short, long, default_value = "featured")]
    prefix: String,

    /// Archive name stem, followed by `-X.Y.Z.zip`
    #[arg(short, long, default_value = "go_appengine_sdk_linux_amd64")]
    sdk: String,

    /// Full regex for object names, overriding --prefix/--sdk matching
    #[arg(long)]
    pattern: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value = "30")]
    timeout: u64,

    /// List every candidate, newest first, without probing
    #[arg(long)]
    list: bool,

    /// Output format for the selected archive
    #[arg(long, value_enum, default_value_t = Format::Url)]
    format: Format,

    /// Exit with an error when no candidate is available
    #[arg(long)]
    strict: bool,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Url,
    Json,
}

impl Args {
    fn sdk_pattern(&self) -> Result<SdkPattern, error::Error> {
        match &self.pattern {
            Some(source) => SdkPattern::from_regex(source),
            None => SdkPattern::new(&self.prefix, &self.sdk),
        }
    }
}

#[derive(Debug, Serialize)]
struct Selection<'a> {
    version: String,
    name: &'a str,
    url: &'a str,
    size: Option<u64>,
    updated: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Candidate> for Selection<'a> {
    fn from(c: &'a Candidate) -> Self {
        Selection {
            version: c.version.to_string(),
            name: &c.item.name,
            url: &c.item.media_link,
            size: c.item.size_bytes(),
            updated: c.item.updated,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn sorted_candidates(
    client: &reqwest::Client,
    args: &Args,
    pattern: &SdkPattern,
) -> Result<Vec<Candidate>> {
    let url = listing::listing_url(&args.api_base, &args.bucket, &args.prefix)?;
    let listing = listing::fetch_listing(client, &url)
        .await
        .context("Failed to fetch bucket listing")?;

    let mut candidates = select_candidates(pattern, listing.items);
    sort_newest_first(&mut candidates);
    info!(count = candidates.len(), pattern = pattern.as_str(), "matching archives");

    Ok(candidates)
}

fn render(candidate: &Candidate, format: Format) -> Result<String> {
    Ok(match format {
        Format::Url => candidate.item.media_link.clone(),
        Format::Json => serde_json::to_string(&Selection::from(candidate))?,
    })
}

/// Fetches, filters, sorts and probes, writing the result to `out`.
async fn run(args: &Args, client: reqwest::Client, out: &mut impl Write) -> Result<()> {
    let pattern = args.sdk_pattern()?;
    let candidates = sorted_candidates(&client, args, &pattern).await?;

    if args.list {
        for c in &candidates {
            writeln!(out, "{}\t{}\t{}", c.version, c.item.name, c.item.media_link)?;
        }
        return Ok(());
    }

    // Newest listed versions are not always downloadable yet.
    let prober = HttpProber::new(client);
    match first_available(&prober, &candidates).await {
        Some(candidate) => {
            info!(version = %candidate.version, "selected");
            writeln!(out, "{}", render(candidate, args.format)?)?;
        }
        None => {
            warn!(candidates = candidates.len(), "no published archive is available");
            if args.strict {
                anyhow::bail!("No available archive among {} candidates", candidates.len());
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let client = reqwest::Client::builder()
        .user_agent(concat!("sdkprobe/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    run(&args, client, &mut std::io::stdout().lock()).await
}
