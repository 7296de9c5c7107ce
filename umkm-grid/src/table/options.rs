//! The request contract between the controller and its caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Sort direction of the active column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows per page. Only the sizes offered by the page-size picker exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    /// All sizes in picker order.
    pub const ALL: [PageSize; 5] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = GridError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(GridError::InvalidPageSize(value))
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Parameters handed to the caller on every render-triggering event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// 1-based page number.
    pub page: usize,
    pub length: PageSize,
    pub search: String,
    /// `(field, direction)` of the active column, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<(String, SortDirection)>,
}

impl TableOptions {
    /// Zero-based offset of the first row on this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.length.get()
    }
}

/// How the table moves between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableMode {
    /// Discrete pages; navigating replaces the rows.
    #[default]
    Pagination,
    /// Pages are appended below the rows already loaded.
    LoadMore,
}

impl TableMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TableMode::Pagination => "pagination",
            TableMode::LoadMore => "load_more",
        }
    }
}

/// The "load more" affordance in [`TableMode::LoadMore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMoreState {
    /// Nothing left to load; show the end marker.
    Exhausted,
    /// More rows exist; show the button.
    #[default]
    Available,
    /// Show neither.
    Hidden,
}

impl LoadMoreState {
    /// Map the integer flag used by REST list endpoints.
    pub fn from_flag(flag: i64) -> Self {
        match flag {
            0 => LoadMoreState::Exhausted,
            1 => LoadMoreState::Available,
            _ => LoadMoreState::Hidden,
        }
    }
}
