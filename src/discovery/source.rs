//! Job sources: local JSON files and HTTP JSON feeds

use crate::discovery::posting::RawPosting;
use crate::error::{JobHunterError, Result};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// Yields raw postings for a query. Failures are absorbed: an unavailable
/// source simply returns no postings.
#[async_trait]
pub trait JobSource: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str) -> Vec<RawPosting>;

    /// Whether queries against this source should be spaced out
    fn throttled(&self) -> bool {
        true
    }
}

/// Decode each entry on its own so one bad entry doesn't sink the batch
fn decode_entries(source: &str, entries: Vec<Value>) -> Vec<RawPosting> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawPosting>(entry) {
            Ok(raw) => Some(raw),
            Err(e) => {
                debug!("{}: dropping malformed posting: {}", source, e);
                None
            }
        })
        .collect()
}

/// A JSON array of postings on disk
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        Self { name, path }
    }

    async fn load(&self) -> Result<Vec<Value>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let entries: Vec<Value> = serde_json::from_str(&content)?;
        Ok(entries)
    }
}

#[async_trait]
impl JobSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, _query: &str) -> Vec<RawPosting> {
        match self.load().await {
            Ok(entries) => {
                let postings = decode_entries(&self.name, entries);
                info!("{}: loaded {} postings from {}", self.name, postings.len(), self.path.display());
                postings
            }
            Err(e) => {
                warn!("{}: cannot read {}: {}", self.name, self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn throttled(&self) -> bool {
        false
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedPayload {
    List(Vec<Value>),
    Wrapped { jobs: Vec<Value> },
}

impl FeedPayload {
    fn into_entries(self) -> Vec<Value> {
        match self {
            FeedPayload::List(entries) => entries,
            FeedPayload::Wrapped { jobs } => jobs,
        }
    }
}

/// HTTP JSON feed; `{query}` and `{location}` in the URL template are filled per search
pub struct FeedSource {
    name: String,
    url_template: String,
    location: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl FeedSource {
    pub fn new(name: &str, url_template: &str, location: &str, retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("job-hunter/", env!("CARGO_PKG_VERSION")))
            .timeout(retry.timeout)
            .build()?;

        Ok(Self {
            name: name.to_string(),
            url_template: url_template.to_string(),
            location: location.to_string(),
            client,
            retry,
        })
    }

    pub fn search_url(&self, query: &str) -> String {
        self.url_template
            .replace("{query}", &urlencoding::encode(query.trim()))
            .replace("{location}", &urlencoding::encode(self.location.trim()))
    }
}

#[async_trait]
impl JobSource for FeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Vec<RawPosting> {
        let url = self.search_url(query);
        let client = &self.client;
        let label = format!("{} '{}'", self.name, query);

        let payload = self
            .retry
            .attempt(&label, || {
                let request = client.get(&url);
                async move {
                    let response = request.send().await?.error_for_status()?;
                    let payload = response.json::<FeedPayload>().await?;
                    Ok::<_, JobHunterError>(payload)
                }
            })
            .await;

        match payload {
            Some(payload) => {
                let postings = decode_entries(&self.name, payload.into_entries());
                info!("{}: found {} postings for '{}'", self.name, postings.len(), query);
                postings
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_source_drops_malformed_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("postings.json");
        std::fs::write(
            &path,
            r#"[
                {"title": "ML Intern", "company": "Acme AI"},
                {"title": 42},
                {"company": "No Title Inc"}
            ]"#,
        )
        .unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.name(), "postings");

        let postings = source.search("anything").await;
        // the numeric title fails to decode; the missing title is rejected later
        assert_eq!(postings.len(), 2);
        assert!(!source.throttled());
    }

    #[tokio::test]
    async fn test_missing_file_yields_nothing() {
        let source = FileSource::new("/nonexistent/postings.json");
        assert!(source.search("ml").await.is_empty());
    }

    #[test]
    fn test_feed_url_placeholders() {
        let source = FeedSource::new(
            "feed",
            "https://jobs.example.com/search?q={query}&l={location}",
            "New Delhi",
            RetryPolicy::immediate(1, Duration::from_secs(1)),
        )
        .unwrap();

        assert_eq!(
            source.search_url("GenAI Intern"),
            "https://jobs.example.com/search?q=GenAI%20Intern&l=New%20Delhi"
        );
    }

    #[test]
    fn test_feed_url_escapes_reserved_characters() {
        let source = FeedSource::new(
            "feed",
            "https://jobs.example.com/search?q={query}&l={location}",
            "Delhi",
            RetryPolicy::immediate(1, Duration::from_secs(1)),
        )
        .unwrap();

        let url = source.search_url("C++ R&D intern");
        assert_eq!(url, "https://jobs.example.com/search?q=C%2B%2B%20R%26D%20intern&l=Delhi");

        let parsed = reqwest::Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "C++ R&D intern".to_string()),
                ("l".to_string(), "Delhi".to_string()),
            ]
        );
    }

    #[test]
    fn test_feed_payload_shapes() {
        let list: FeedPayload = serde_json::from_str(r#"[{"title": "a"}]"#).unwrap();
        assert_eq!(list.into_entries().len(), 1);

        let wrapped: FeedPayload = serde_json::from_str(r#"{"jobs": [{"title": "a"}, {}]}"#).unwrap();
        assert_eq!(wrapped.into_entries().len(), 2);
    }
}
