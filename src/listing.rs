use crate::error::Error;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

/// One object resource from the storage JSON API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketItem {
    pub name: String,
    pub media_link: String,
    /// The API encodes sizes as decimal strings.
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub md5_hash: Option<String>,
}

impl BucketItem {
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Deserialize)]
pub struct BucketListing {
    // The API omits this when nothing matches the prefix; treat that as fatal.
    pub items: Vec<BucketItem>,
}

/// Builds `{api_base}/b/{bucket}/o?prefix={prefix}`.
pub fn listing_url(api_base: &str, bucket: &str, prefix: &str) -> Result<Url, Error> {
    let mut url = Url::parse(api_base)?;
    url.path_segments_mut()
        .map_err(|_| Error::NotABase(api_base.to_string()))?
        .pop_if_empty()
        .extend(["b", bucket, "o"]);
    url.query_pairs_mut().append_pair("prefix", prefix);
    Ok(url)
}

pub fn parse_listing(body: &str) -> Result<BucketListing, Error> {
    Ok(serde_json::from_str(body)?)
}

pub async fn fetch_listing(client: &Client, url: &Url) -> Result<BucketListing, Error> {
    info!(%url, "fetching bucket listing");

    let response = client
        .get(url.clone())
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::ListingStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let body = response.text().await?;
    let listing = parse_listing(&body)?;
    info!(items = listing.items.len(), "bucket listing received");

    Ok(listing)
}
