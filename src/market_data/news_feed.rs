// =============================================================================
// News Feed - optional headline polling
// =============================================================================
//
// Expects a NewsAPI-style body:
//   { "articles": [ { "title", "url", "source": { "name" }, "publishedAt" } ] }
// An empty URL disables the feed entirely.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

/// One headline for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Turn a response body into at most `max_items` headlines, filling in
/// placeholders for missing fields.
pub fn parse_articles(body: &serde_json::Value, max_items: usize) -> Vec<NewsItem> {
    let Some(articles) = body.get("articles").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    articles
        .iter()
        .take(max_items)
        .map(|a| NewsItem {
            title: non_empty(&a["title"]).unwrap_or("Untitled").to_string(),
            url: non_empty(&a["url"]).unwrap_or("#").to_string(),
            source: non_empty(&a["source"]["name"]).unwrap_or("Source").to_string(),
            published_at: a["publishedAt"]
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        })
        .collect()
}

fn non_empty(v: &serde_json::Value) -> Option<&str> {
    v.as_str().filter(|s| !s.trim().is_empty())
}

#[derive(Clone)]
pub struct NewsFeed {
    client: reqwest::Client,
    url: String,
    max_items: usize,
}

impl NewsFeed {
    pub fn new(url: impl Into<String>, max_items: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build news feed HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
            max_items,
        })
    }

    pub fn is_enabled(&self) -> bool {
        !self.url.trim().is_empty()
    }

    #[instrument(skip(self), name = "news_feed::fetch")]
    pub async fn fetch(&self) -> Result<Vec<NewsItem>> {
        let body: serde_json::Value = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("news request failed")?
            .error_for_status()
            .context("news endpoint returned an error status")?
            .json()
            .await
            .context("failed to parse news response")?;

        let items = parse_articles(&body, self.max_items);
        debug!(count = items.len(), "news refreshed");
        Ok(items)
    }
}
