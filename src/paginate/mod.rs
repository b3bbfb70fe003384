use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "usize")]
pub enum PageSize {
    Ten,
    #[default]
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .iter()
            .copied()
            .find(|s| s.get() == value)
            .ok_or_else(|| format!("invalid page size {value}, expected 10, 20, 50 or 100"))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page_size: PageSize,
    pub current_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            current_page: 1,
        }
    }
}

impl Pagination {
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn clamp(&mut self, total_pages: usize) {
        self.current_page = clamp_page(self.current_page, total_pages);
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSlice<'a, T> {
    pub visible: &'a [T],
    pub total_pages: usize,
}

/// Slices page `page_number` out of `records`. The page is not clamped: an
/// out-of-range page yields an empty slice.
pub fn paginate<T>(records: &[T], page_size: usize, page_number: usize) -> PageSlice<'_, T> {
    let total = total_pages(records.len(), page_size);
    let start = page_number
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(records.len());
    let end = start.saturating_add(page_size).min(records.len());
    PageSlice {
        visible: &records[start..end],
        total_pages: total,
    }
}
