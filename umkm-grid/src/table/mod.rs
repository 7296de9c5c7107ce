//! Headless data table.
//!
//! The table never fetches anything itself. [`TableController`] decides
//! *when* the caller has to load rows and *with which* [`TableOptions`],
//! then renders whatever the caller hands back through
//! [`TableController::set_data`].

mod column;
mod config;
mod controller;
mod options;
mod order;
mod pagination;
mod row;
mod selection;

pub use column::{Alignment, Column, Device};
pub use config::TableConfig;
pub use controller::{CellClick, CheckBoxCallback, RenderCallback, TableController, ViewState};
pub use options::{LoadMoreState, PageSize, SortDirection, TableMode, TableOptions};
pub use order::{OrderState, SortMarker};
pub use pagination::{ELLIPSIS, compute_buttons, total_pages};
pub use row::{FieldValue, TableRow};
pub use selection::{HeaderCheck, SelectionSet};
