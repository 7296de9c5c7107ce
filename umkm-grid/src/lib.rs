pub mod error;
pub mod form;
pub mod notify;
pub mod table;
pub mod tree;

pub use error::GridError;

pub mod prelude {
    pub use crate::error::GridError;
    pub use crate::form::{
        Choice, ChoiceOption, Control, DateInput, DecimalInput, FileInput, FileMeta, Parsed,
        RadioGroup, Select, TextInput, TreeSelect,
    };
    pub use crate::form::{FieldError, Rules, Validatable, ValidationResult, Validator};
    pub use crate::notify::{Dialog, Notifier, NotifyCenter, Toast, ToastLevel};
    pub use crate::table::{
        Alignment, CellClick, Column, Device, FieldValue, HeaderCheck, LoadMoreState, PageSize,
        SelectionSet, SortDirection, SortMarker, TableConfig, TableController, TableMode,
        TableOptions, TableRow, ViewState, compute_buttons,
    };
    pub use crate::tree::{CheckState, CheckTree, FlatNode, MenuItem};
}
