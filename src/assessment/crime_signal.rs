use futures::future::join_all;
use std::collections::HashSet;
use std::time::Duration;

use super::bounded;
use crate::repositories::{SearchResponse, TextSearch};

pub(crate) const MAX_CORPUS: usize = 20;

/// Raw crime-related text gathered for one location.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct CrimeSignals {
    pub corpus: Vec<String>,
    pub queries: usize,
    pub failed_queries: usize,
}

impl CrimeSignals {
    /// Nothing was searched, or every query failed.
    pub fn is_unavailable(&self) -> bool {
        self.queries == 0 || self.failed_queries == self.queries
    }
}

pub(crate) fn queries(location: &str) -> Vec<String> {
    vec![
        format!("recent crime reports {location}"),
        format!("latest crime news in {location}"),
        format!("murder in {location}"),
        format!("theft in {location}"),
        format!("assault in {location}"),
        format!("robbery in {location}"),
        format!("kidnapping in {location}"),
        format!("scams targeting tourists in {location}"),
        format!("police cases {location} past week"),
    ]
}

/// Flattens responses in order (related topics, abstract, results), drops
/// repeats keeping the first occurrence, and keeps at most `MAX_CORPUS`.
pub(crate) fn build_corpus<I>(responses: I) -> Vec<String>
where
    I: IntoIterator<Item = SearchResponse>,
{
    let mut seen = HashSet::new();
    let mut corpus = Vec::new();

    let snippets = responses.into_iter().flat_map(|r| {
        r.related_topics
            .into_iter()
            .chain(r.abstract_text)
            .chain(r.results)
    });
    for snippet in snippets {
        let snippet = snippet.trim();
        if snippet.is_empty() || !seen.insert(snippet.to_string()) {
            continue;
        }
        corpus.push(snippet.to_string());
        if corpus.len() == MAX_CORPUS {
            break;
        }
    }
    corpus
}

/// Runs every templated query concurrently and waits for all of them to settle.
/// A failed or timed-out query contributes nothing; it never aborts the batch.
pub(crate) async fn gather(search: &dyn TextSearch, location: &str, per_query: Duration) -> CrimeSignals {
    let location = location.trim();
    if location.is_empty() {
        return CrimeSignals::default();
    }

    let queries = queries(location);
    let settled = join_all(
        queries
            .iter()
            .map(|q| bounded(per_query, search.search(q))),
    )
    .await;

    let mut failed_queries = 0;
    let responses: Vec<SearchResponse> = settled
        .into_iter()
        .zip(&queries)
        .filter_map(|(result, query)| match result {
            Ok(resp) => Some(resp),
            Err(err) => {
                log::warn!("Crime search query {query:?} failed: {err}");
                failed_queries += 1;
                None
            }
        })
        .collect();

    let corpus = build_corpus(responses);
    log::debug!(
        "Crime search for {location:?}: {} snippets, {failed_queries}/{} queries failed",
        corpus.len(),
        queries.len()
    );

    CrimeSignals {
        corpus,
        queries: queries.len(),
        failed_queries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fakes::FakeSearch;
    use std::sync::atomic::Ordering;
    use std::time::Instant;

    fn resp(topics: &[&str], abstract_text: Option<&str>, results: &[&str]) -> SearchResponse {
        SearchResponse {
            related_topics: topics.iter().map(|s| s.to_string()).collect(),
            abstract_text: abstract_text.map(str::to_string),
            results: results.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn nine_templates_embed_the_location() {
        let qs = queries("Manali, Himachal Pradesh, India");
        assert_eq!(qs.len(), 9);
        assert!(qs.iter().all(|q| q.contains("Manali, Himachal Pradesh, India")));
        assert_eq!(qs[8], "police cases Manali, Himachal Pradesh, India past week");
    }

    #[test]
    fn overlapping_snippets_appear_once_in_first_seen_order() {
        let corpus = build_corpus(vec![
            resp(&["Bag snatching at the bus stand", "Pickpockets on Mall Road"], None, &[]),
            resp(&["Pickpockets on Mall Road"], Some("Manali is a resort town."), &["Bag snatching at the bus stand"]),
        ]);
        assert_eq!(
            corpus,
            vec![
                "Bag snatching at the bus stand",
                "Pickpockets on Mall Road",
                "Manali is a resort town.",
            ]
        );
    }

    #[test]
    fn corpus_is_capped() {
        let many: Vec<String> = (0..50).map(|i| format!("snippet {i}")).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let corpus = build_corpus(vec![resp(&refs, None, &[]), resp(&["extra"], None, &[])]);
        assert_eq!(corpus.len(), MAX_CORPUS);
        assert_eq!(corpus[0], "snippet 0");
        assert_eq!(corpus[19], "snippet 19");
    }

    #[tokio::test]
    async fn blank_location_skips_search() {
        let search = FakeSearch::default();
        let signals = gather(&search, "  ", Duration::from_secs(1)).await;
        assert!(signals.corpus.is_empty());
        assert!(signals.is_unavailable());
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_queries_do_not_abort_the_batch() {
        let search = FakeSearch {
            answers: vec![
                ("murder in", resp(&["Murder case solved in Goa"], None, &[])),
                ("theft in", resp(&["Scooter theft in Calangute"], None, &[])),
            ],
            fail_unmatched: true,
            ..Default::default()
        };
        let signals = gather(&search, "Goa, India", Duration::from_secs(1)).await;
        assert_eq!(search.calls.load(Ordering::SeqCst), 9);
        assert_eq!(signals.queries, 9);
        assert_eq!(signals.failed_queries, 7);
        assert!(!signals.is_unavailable());
        assert_eq!(signals.corpus, vec!["Murder case solved in Goa", "Scooter theft in Calangute"]);
    }

    #[tokio::test]
    async fn all_failed_is_unavailable() {
        let search = FakeSearch { fail_unmatched: true, ..Default::default() };
        let signals = gather(&search, "Goa", Duration::from_secs(1)).await;
        assert!(signals.is_unavailable());
        assert!(signals.corpus.is_empty());
    }

    #[tokio::test]
    async fn queries_run_concurrently_and_slow_ones_time_out() {
        let search = FakeSearch {
            delay: Some(Duration::from_millis(150)),
            ..Default::default()
        };
        let started = Instant::now();
        let signals = gather(&search, "Goa", Duration::from_millis(400)).await;
        // Nine sequential calls would take well over a second.
        assert!(started.elapsed() < Duration::from_millis(1000));
        assert_eq!(signals.failed_queries, 0);

        let signals = gather(&search, "Goa", Duration::from_millis(10)).await;
        assert_eq!(signals.failed_queries, 9);
    }
}
