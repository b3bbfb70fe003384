use indicatif::ProgressBar;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::fetcher::{self, LoadError, PageSource};
use crate::filter::{self, FilterField, FilterState};
use crate::model::{Character, Dataset, Facets};
use crate::paginate::{self, PageSize, Pagination};
use crate::selection::Selection;
use crate::sort::{self, SortDirection, SortKey, SortState};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is not ready (dataset still loading)")]
    NotReady,

    #[error("session is already initialized")]
    AlreadyInitialized,

    #[error("session failed to load and must be restarted: {reason}")]
    Failed { reason: String },

    #[error("no record with id {id}")]
    UnknownRecord { id: u64 },

    #[error("invalid {field} filter: {message}")]
    InvalidFilterValue { field: FilterField, message: String },

    #[error("{message}")]
    InvalidPageSize { value: usize, message: String },

    #[error(transparent)]
    Load(#[from] LoadError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
enum LoadState {
    Loading,
    Ready(Dataset),
    Failed { reason: String },
}

#[derive(Clone, Debug, Serialize)]
pub struct TableView<'a> {
    pub rows: Vec<&'a Character>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: PageSize,
    pub result_count: usize,
    pub total_count: usize,
    pub sort: SortState,
    pub filters: FilterState,
    /// Set when the filters match nothing. `total_pages` still reports 1.
    pub no_results: bool,
}

#[derive(Debug)]
pub struct Session {
    state: LoadState,
    filters: FilterState,
    sort: SortState,
    pagination: Pagination,
    selection: Selection<usize>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_page_size(PageSize::default())
    }

    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            state: LoadState::Loading,
            filters: FilterState::default(),
            sort: SortState::default(),
            pagination: Pagination {
                page_size,
                current_page: 1,
            },
            selection: Selection::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            LoadState::Loading => Phase::Loading,
            LoadState::Ready(_) => Phase::Ready,
            LoadState::Failed { .. } => Phase::Failed,
        }
    }

    /// Runs the fetcher once. A failure leaves the session in the terminal
    /// failed phase.
    pub async fn initialize<S>(
        &mut self,
        source: &S,
        start_url: &str,
        min_count: usize,
        pb: &ProgressBar,
    ) -> Result<&Dataset, SessionError>
    where
        S: PageSource + ?Sized,
    {
        match &self.state {
            LoadState::Loading => {}
            LoadState::Ready(_) => return Err(SessionError::AlreadyInitialized),
            LoadState::Failed { reason } => {
                return Err(SessionError::Failed {
                    reason: reason.clone(),
                })
            }
        }

        match fetcher::load_dataset(source, start_url, min_count, pb).await {
            Ok(dataset) => {
                self.state = LoadState::Ready(dataset);
                self.dataset()
            }
            Err(e) => {
                self.state = LoadState::Failed {
                    reason: e.to_string(),
                };
                Err(SessionError::Load(e))
            }
        }
    }

    pub fn dataset(&self) -> Result<&Dataset, SessionError> {
        match &self.state {
            LoadState::Ready(dataset) => Ok(dataset),
            LoadState::Loading => Err(SessionError::NotReady),
            LoadState::Failed { reason } => Err(SessionError::Failed {
                reason: reason.clone(),
            }),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn facets(&self) -> Result<Facets, SessionError> {
        Ok(self.dataset()?.facets())
    }

    pub fn view(&self) -> Result<TableView<'_>, SessionError> {
        let dataset = self.dataset()?;
        let mut pagination = self.pagination;
        Ok(build_view(dataset, &self.filters, self.sort, &mut pagination))
    }

    pub fn set_filter(
        &mut self,
        field: FilterField,
        value: &str,
    ) -> Result<TableView<'_>, SessionError> {
        self.dataset()?;
        let changed =
            self.filters
                .set(field, value)
                .map_err(|message| SessionError::InvalidFilterValue { field, message })?;
        if changed {
            debug!(%field, value, "filter changed");
            self.pagination.reset();
        }
        self.recompute()
    }

    pub fn clear_filters(&mut self) -> Result<TableView<'_>, SessionError> {
        self.dataset()?;
        self.filters = FilterState::default();
        self.pagination.reset();
        self.recompute()
    }

    pub fn set_sort(&mut self, key: SortKey) -> Result<TableView<'_>, SessionError> {
        self.dataset()?;
        self.sort.activate(key);
        debug!(sort = %self.sort, "sort changed");
        self.pagination.reset();
        self.recompute()
    }

    pub fn set_sort_named(&mut self, name: &str) -> Result<TableView<'_>, SessionError> {
        match SortKey::parse(name) {
            Some(key) => self.set_sort(key),
            None => {
                warn!(key = name, sort = %self.sort, "ignoring unknown sort key");
                self.dataset()?;
                self.recompute()
            }
        }
    }

    pub fn set_sort_order(
        &mut self,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<TableView<'_>, SessionError> {
        self.dataset()?;
        self.sort = SortState { key, direction };
        self.pagination.reset();
        self.recompute()
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<TableView<'_>, SessionError> {
        self.dataset()?;
        let page_size = PageSize::try_from(size).map_err(|message| {
            SessionError::InvalidPageSize {
                value: size,
                message,
            }
        })?;
        self.pagination.page_size = page_size;
        self.pagination.reset();
        self.recompute()
    }

    pub fn set_page(&mut self, page: usize) -> Result<TableView<'_>, SessionError> {
        self.dataset()?;
        self.pagination.current_page = page;
        self.recompute()
    }

    pub fn next_page(&mut self) -> Result<TableView<'_>, SessionError> {
        let page = self.pagination.current_page.saturating_add(1);
        self.set_page(page)
    }

    pub fn prev_page(&mut self) -> Result<TableView<'_>, SessionError> {
        let page = self.pagination.current_page.saturating_sub(1);
        self.set_page(page)
    }

    pub fn select(&mut self, id: u64) -> Result<&Character, SessionError> {
        let idx = self
            .dataset()?
            .position(id)
            .ok_or(SessionError::UnknownRecord { id })?;
        self.selection.select(idx);
        self.dataset()?
            .records()
            .get(idx)
            .ok_or(SessionError::UnknownRecord { id })
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> Option<&Character> {
        let idx = *self.selection.current()?;
        match &self.state {
            LoadState::Ready(dataset) => dataset.records().get(idx),
            _ => None,
        }
    }

    fn recompute(&mut self) -> Result<TableView<'_>, SessionError> {
        let Session {
            state,
            filters,
            sort: sort_state,
            pagination,
            ..
        } = self;
        match state {
            LoadState::Ready(dataset) => Ok(build_view(dataset, filters, *sort_state, pagination)),
            LoadState::Loading => Err(SessionError::NotReady),
            LoadState::Failed { reason } => Err(SessionError::Failed {
                reason: reason.clone(),
            }),
        }
    }
}

fn build_view<'a>(
    dataset: &'a Dataset,
    filters: &FilterState,
    sort_state: SortState,
    pagination: &mut Pagination,
) -> TableView<'a> {
    let filtered = filter::filter(dataset.records(), filters);
    let ordered = sort::sort(filtered, sort_state.key, sort_state.direction);
    let page_size = pagination.page_size.get();
    pagination.clamp(paginate::total_pages(ordered.len(), page_size));
    let page = paginate::paginate(&ordered, page_size, pagination.current_page);
    TableView {
        rows: page.visible.to_vec(),
        current_page: pagination.current_page,
        total_pages: page.total_pages,
        page_size: pagination.page_size,
        result_count: ordered.len(),
        total_count: dataset.len(),
        sort: sort_state,
        filters: filters.clone(),
        no_results: ordered.is_empty(),
    }
}
