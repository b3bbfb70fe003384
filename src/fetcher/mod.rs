pub mod client;

use std::collections::HashSet;
use std::num::NonZeroU32;

use futures::future::BoxFuture;
use futures::stream::{self, Stream};
use futures::{FutureExt, TryStreamExt};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use indicatif::ProgressBar;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{Dataset, Page};

pub const DEFAULT_COLLECTION_URL: &str = "https://rickandmortyapi.com/api/character";
pub const DEFAULT_MIN_COUNT: usize = 250;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("malformed page payload from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("page cursor revisits {url}")]
    CursorLoop { url: String },
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Request { .. } | FetchError::Status { .. })
    }
}

#[derive(Debug, Error)]
#[error("failed to load dataset after {pages_fetched} page(s): {source}")]
pub struct LoadError {
    pub pages_fetched: usize,
    #[source]
    pub source: FetchError,
}

pub trait PageSource {
    fn fetch_page<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page, FetchError>>;
}

pub struct HttpPageSource {
    client: reqwest::Client,
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl HttpPageSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            limiter: None,
        }
    }

    pub fn with_rate(mut self, rate: u32) -> Self {
        self.limiter = NonZeroU32::new(rate).map(|r| RateLimiter::direct(Quota::per_second(r)));
        self
    }
}

impl PageSource for HttpPageSource {
    fn fetch_page<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page, FetchError>> {
        async move {
            if let Some(lim) = self.limiter.as_ref() {
                lim.until_ready().await;
            }
            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Request {
                    url: url.to_string(),
                    source: e,
                })?;
            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            let body = resp.bytes().await.map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;
            serde_json::from_slice::<Page>(&body).map_err(|e| FetchError::Parse {
                url: url.to_string(),
                source: e,
            })
        }
        .boxed()
    }
}

struct Cursor {
    next: Option<String>,
    seen: usize,
    visited: HashSet<String>,
}

pub fn pages<'a, S>(
    source: &'a S,
    start_url: &str,
    min_count: usize,
) -> impl Stream<Item = Result<Page, FetchError>> + 'a
where
    S: PageSource + ?Sized + 'a,
{
    let cursor = Cursor {
        next: Some(start_url.to_string()),
        seen: 0,
        visited: HashSet::new(),
    };
    stream::try_unfold(cursor, move |mut cursor| async move {
        let url = match cursor.next.take() {
            Some(url) if cursor.seen < min_count => url,
            _ => return Ok(None),
        };
        if !cursor.visited.insert(url.clone()) {
            return Err(FetchError::CursorLoop { url });
        }
        debug!(url = %url, seen = cursor.seen, "fetching page");
        let page = source.fetch_page(&url).await?;
        cursor.seen += page.results.len();
        cursor.next = page.next_cursor().map(str::to_string);
        Ok::<_, FetchError>(Some((page, cursor)))
    })
}

/// Fetches records until `min_count` is reached or the collection is
/// exhausted. The last page is kept whole, so the result may overshoot.
pub async fn load_dataset<S>(
    source: &S,
    start_url: &str,
    min_count: usize,
    pb: &ProgressBar,
) -> Result<Dataset, LoadError>
where
    S: PageSource + ?Sized,
{
    let mut records = Vec::new();
    let mut pages_fetched = 0usize;
    let stream = pages(source, start_url, min_count);
    futures::pin_mut!(stream);

    loop {
        let page = match stream.try_next().await {
            Ok(Some(page)) => page,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, pages_fetched, "dataset load aborted");
                return Err(LoadError {
                    pages_fetched,
                    source: e,
                });
            }
        };
        pages_fetched += 1;
        records.extend(page.results);
        pb.set_position(records.len() as u64);
        pb.set_message(format!("{} records from {} page(s)", records.len(), pages_fetched));
    }

    if records.len() < min_count {
        info!(
            records = records.len(),
            min_count, "collection exhausted before reaching minimum"
        );
    } else {
        info!(records = records.len(), pages_fetched, "dataset loaded");
    }
    Ok(Dataset::new(records))
}


#[cfg(test)]
mod tests {
    use super::testing::MemorySource;
    use super::*;

    #[tokio::test]
    async fn rate_limiter_is_optional() {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let source = HttpPageSource::new(client.clone()).with_rate(0);
        assert!(source.limiter.is_none());

        let source = HttpPageSource::new(client).with_rate(50);
        let limiter = source.limiter.as_ref().unwrap();
        assert!(limiter.check().is_ok());
        limiter.until_ready().await;
    }

    #[tokio::test]
    async fn stops_once_minimum_is_reached() {
        let source = MemorySource::sequential(826, 20);
        let ds = load_dataset(&source, &MemorySource::url(1), 250, &ProgressBar::hidden())
            .await
            .unwrap();
        assert_eq!(ds.len(), 260);
        assert_eq!(source.calls(), 13);
        let ids: Vec<u64> = ds.records().iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=260).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn exact_multiple_does_not_fetch_extra_page() {
        let source = MemorySource::sequential(826, 25);
        let ds = load_dataset(&source, &MemorySource::url(1), 250, &ProgressBar::hidden())
            .await
            .unwrap();
        assert_eq!(ds.len(), 250);
        assert_eq!(source.calls(), 10);
    }

    #[tokio::test]
    async fn exhausted_source_returns_everything() {
        let source = MemorySource::sequential(45, 20);
        let ds = load_dataset(&source, &MemorySource::url(1), 250, &ProgressBar::hidden())
            .await
            .unwrap();
        assert_eq!(ds.len(), 45);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn zero_minimum_fetches_nothing() {
        let source = MemorySource::sequential(45, 20);
        let ds = load_dataset(&source, &MemorySource::url(1), 0, &ProgressBar::hidden())
            .await
            .unwrap();
        assert!(ds.is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn failure_discards_partial_progress() {
        let mut source = MemorySource::sequential(100, 20);
        source.failures.insert(MemorySource::url(3), 500);
        let err = load_dataset(&source, &MemorySource::url(1), 250, &ProgressBar::hidden())
            .await
            .unwrap_err();
        assert_eq!(err.pages_fetched, 2);
        assert!(err.source.is_transport());
        assert!(matches!(err.source, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn repeated_cursor_is_an_error() {
        let mut source = MemorySource::sequential(40, 20);
        if let Some(page) = source.pages.get_mut(&MemorySource::url(2)) {
            page.info.next = Some(MemorySource::url(1));
        }
        let err = load_dataset(&source, &MemorySource::url(1), 250, &ProgressBar::hidden())
            .await
            .unwrap_err();
        assert!(matches!(err.source, FetchError::CursorLoop { .. }));
        assert!(!err.source.is_transport());
    }

    #[tokio::test]
    async fn page_stream_is_lazy() {
        let source = MemorySource::sequential(100, 20);
        let stream = pages(&source, &MemorySource::url(1), 250);
        futures::pin_mut!(stream);
        let first = stream.try_next().await.unwrap().unwrap();
        assert_eq!(first.results.len(), 20);
        assert_eq!(source.calls(), 1);
    }
}
