use async_trait::async_trait;
use serde::Deserialize;

use super::{fetch_json, SearchResponse, TextSearch};
use crate::errors::UpstreamError;

/// DuckDuckGo instant-answer API.
pub(crate) struct DuckDuckGoRepository {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DdgAnswer {
    #[serde(default)]
    related_topics: Vec<DdgTopic>,
    #[serde(default)]
    abstract_text: Option<String>,
    #[serde(default)]
    results: Vec<DdgTopic>,
}

/// Either a plain topic or a named group of topics.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DdgTopic {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    topics: Vec<DdgTopic>,
}

impl DdgTopic {
    fn collect_text(self, out: &mut Vec<String>) {
        if let Some(text) = self.text.filter(|t| !t.trim().is_empty()) {
            out.push(text);
        }
        for topic in self.topics {
            topic.collect_text(out);
        }
    }
}

impl DuckDuckGoRepository {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn into_response(raw: DdgAnswer) -> SearchResponse {
        let mut related_topics = Vec::new();
        for topic in raw.related_topics {
            topic.collect_text(&mut related_topics);
        }
        let mut results = Vec::new();
        for topic in raw.results {
            topic.collect_text(&mut results);
        }
        SearchResponse {
            related_topics,
            abstract_text: raw.abstract_text.filter(|t| !t.trim().is_empty()),
            results,
        }
    }
}

#[async_trait]
impl TextSearch for DuckDuckGoRepository {
    async fn search(&self, query: &str) -> Result<SearchResponse, UpstreamError> {
        let request = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[("q", query), ("format", "json"), ("no_html", "1")]);
        let raw: DdgAnswer = fetch_json(request).await?;
        Ok(Self::into_response(raw))
    }
}
