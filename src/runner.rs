use std::time::Duration;

use indicatif::ProgressBar;
use thiserror::Error;
use tokio::time::Instant;
use tracing::info;

use crate::fetcher::client::{self, ClientError, ClientOptions};
use crate::fetcher::{HttpPageSource, DEFAULT_COLLECTION_URL, DEFAULT_MIN_COUNT};
use crate::paginate::PageSize;
use crate::session::{Session, SessionError};

#[derive(Clone, Debug)]
pub struct Options {
    pub url: String,
    pub min_count: usize,
    pub timeout_seconds: usize,
    pub rate: u32,
    pub proxy: Option<String>,
    pub follow_redirects: bool,
    pub page_size: PageSize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: DEFAULT_COLLECTION_URL.to_string(),
            min_count: DEFAULT_MIN_COUNT,
            timeout_seconds: 10,
            rate: 0,
            proxy: None,
            follow_redirects: true,
            page_size: PageSize::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("invalid min_count {value}, expected positive integer")]
    InvalidMinCount { value: usize },

    #[error("invalid timeout {value}, expected positive number of seconds")]
    InvalidTimeout { value: usize },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug)]
pub struct LoadResult {
    pub session: Session,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(mut options: Options) -> Result<Self, RunnerError> {
        options.url = options.url.trim().to_string();
        if reqwest::Url::parse(&options.url).is_err() {
            return Err(RunnerError::InvalidUrl { url: options.url });
        }
        if options.min_count == 0 {
            return Err(RunnerError::InvalidMinCount {
                value: options.min_count,
            });
        }
        if options.timeout_seconds == 0 {
            return Err(RunnerError::InvalidTimeout {
                value: options.timeout_seconds,
            });
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub async fn run(&self) -> Result<LoadResult, RunnerError> {
        self.run_with_progress(ProgressBar::hidden()).await
    }

    pub async fn run_with_progress(&self, pb: ProgressBar) -> Result<LoadResult, RunnerError> {
        let started_at = Instant::now();

        let client = client::build_client(ClientOptions {
            proxy: self.options.proxy.as_deref(),
            timeout_seconds: self.options.timeout_seconds,
            follow_redirects: self.options.follow_redirects,
        })?;
        let source = HttpPageSource::new(client).with_rate(self.options.rate);

        let mut session = Session::with_page_size(self.options.page_size);
        session
            .initialize(&source, &self.options.url, self.options.min_count, &pb)
            .await?;

        let elapsed = started_at.elapsed();
        info!(
            url = %self.options.url,
            elapsed_ms = elapsed.as_millis() as u64,
            "session ready"
        );
        Ok(LoadResult { session, elapsed })
    }
}
