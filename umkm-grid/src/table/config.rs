//! Table configuration.

use serde::{Deserialize, Serialize};

use super::column::Device;
use super::options::{PageSize, SortDirection, TableMode};

/// Per-table configuration.
///
/// # Example
///
/// ```ignore
/// let config = TableConfig::new()
///     .mode(TableMode::LoadMore)
///     .page_size(PageSize::TwentyFive)
///     .default_order("registered", SortDirection::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub mode: TableMode,
    /// Initial rows per page.
    pub page_size: PageSize,
    /// Page-button budget for the pager.
    pub max_buttons: usize,
    /// Order applied on first activation.
    pub default_order: Option<(String, SortDirection)>,
    /// Initial responsive tier.
    pub device: Device,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            mode: TableMode::Pagination,
            page_size: PageSize::Ten,
            max_buttons: 7,
            default_order: None,
            device: Device::Desktop,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: TableMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the page-button budget. Budgets below 5 give duplicate labels.
    pub fn max_buttons(mut self, max: usize) -> Self {
        self.max_buttons = max;
        self
    }

    pub fn default_order(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.default_order = Some((field.into(), direction));
        self
    }

    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}
