use crate::version::Candidate;
use reqwest::Client;
use tracing::debug;

/// Checks whether a download link is live.
pub trait Prober {
    async fn is_available(&self, url: &str) -> bool;
}

pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Prober for HttpProber {
    async fn is_available(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!(url, status = %response.status(), "not exists or not yet published");
                false
            }
            Err(e) => {
                debug!(url, error = %e, "probe failed");
                false
            }
        }
    }
}

/// Returns the first candidate whose media link answers a HEAD probe.
/// Nothing after the first hit is probed.
pub async fn first_available<'a, P: Prober>(
    prober: &P,
    candidates: &'a [Candidate],
) -> Option<&'a Candidate> {
    for candidate in candidates {
        if prober.is_available(&candidate.item.media_link).await {
            return Some(candidate);
        }
    }
    None
}
