use crate::error::Error;
use crate::listing::BucketItem;
use regex::Regex;
use semver::Version;
use tracing::debug;

/// Matches archive names and pulls out their dotted-triple version.
///
/// Matching is anchored at the start of the object name only, so names with
/// trailing characters after the archive suffix still count.
#[derive(Debug, Clone)]
pub struct SdkPattern {
    re: Regex,
}

impl SdkPattern {
    /// e.g. `featured` + `go_appengine_sdk_linux_amd64` matches
    /// `featured/go_appengine_sdk_linux_amd64-1.9.38.zip`
    pub fn new(prefix: &str, sdk: &str) -> Result<Self, Error> {
        let source = format!(
            r"^{}/{}-(\d+)\.(\d+)\.(\d+)\.zip",
            regex::escape(prefix.trim_end_matches('/')),
            regex::escape(sdk)
        );
        Self::from_regex(&source)
    }

    /// Accepts either a named `version` group holding `X.Y.Z` or exactly
    /// three positional groups.
    pub fn from_regex(source: &str) -> Result<Self, Error> {
        let re = Regex::new(source).map_err(|e| Error::InvalidPattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;

        let has_version_group = re.capture_names().any(|n| n == Some("version"));
        if !has_version_group && re.captures_len() != 4 {
            return Err(Error::InvalidPattern {
                pattern: source.to_string(),
                reason: "expected a named `version` group or exactly three capture groups"
                    .to_string(),
            });
        }

        Ok(Self { re })
    }

    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }

    pub fn extract(&self, name: &str) -> Option<Version> {
        let caps = self.re.captures(name)?;
        if caps.get(0)?.start() != 0 {
            return None;
        }

        let (major, minor, patch) = if let Some(version) = caps.name("version") {
            let mut parts = version.as_str().split('.');
            let triple = (parts.next()?, parts.next()?, parts.next()?);
            if parts.next().is_some() {
                return None;
            }
            triple
        } else {
            (
                caps.get(1)?.as_str(),
                caps.get(2)?.as_str(),
                caps.get(3)?.as_str(),
            )
        };

        match (major.parse(), minor.parse(), patch.parse()) {
            (Ok(major), Ok(minor), Ok(patch)) => Some(Version::new(major, minor, patch)),
            _ => {
                debug!(name, "version component is not a u64, skipping");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub version: Version,
    pub item: BucketItem,
}

pub fn select_candidates(pattern: &SdkPattern, items: Vec<BucketItem>) -> Vec<Candidate> {
    items
        .into_iter()
        .filter_map(|item| {
            let version = pattern.extract(&item.name)?;
            debug!(name = %item.name, %version, "candidate");
            Some(Candidate { version, item })
        })
        .collect()
}

/// Stable, so equal versions keep their listing order.
pub fn sort_newest_first(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.version.cmp(&a.version));
}
