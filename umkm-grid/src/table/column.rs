//! Column descriptors.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::row::FieldValue;

type Accessor<R> = Arc<dyn Fn(&R) -> FieldValue + Send + Sync>;
type Renderer<R> = Arc<dyn Fn(&FieldValue, &R) -> String + Send + Sync>;
type Fallback = Arc<dyn Fn() -> String + Send + Sync>;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Responsive visibility tier.
///
/// Ordered from smallest to largest viewport. A column whose minimum tier
/// is [`Device::None`] never appears in the primary row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    None,
    #[default]
    Mobile,
    Tablet,
    Desktop,
    Tv,
}

impl Device {
    /// Tier for a viewport width in CSS pixels.
    pub fn from_width(width: u32) -> Self {
        match width {
            0..768 => Device::Mobile,
            768..1024 => Device::Tablet,
            1024..1920 => Device::Desktop,
            _ => Device::Tv,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Device::None),
            "mobile" => Some(Device::Mobile),
            "tablet" => Some(Device::Tablet),
            "desktop" => Some(Device::Desktop),
            "tv" => Some(Device::Tv),
            _ => None,
        }
    }
}

/// A table column definition.
///
/// # Example
///
/// ```ignore
/// let columns = vec![
///     Column::new("Name", |b: &Business| b.name.clone().into()).orderable(),
///     Column::new("Owner", |b: &Business| b.owner.clone().into())
///         .min_device(Device::Tablet),
///     Column::new("Notes", |b: &Business| b.notes.clone().into())
///         .min_device(Device::None)
///         .default_content(|| "-".to_string()),
/// ];
/// ```
pub struct Column<R> {
    /// Header label.
    pub name: String,
    /// Field name sent to the caller when this column is ordered.
    pub field: String,
    pub align: Alignment,
    /// Clicking the cell copies its text instead of opening the detail panel.
    pub copy: bool,
    /// Relative width in percent.
    pub width: Option<u8>,
    /// Smallest tier on which the column is part of the primary row.
    pub min_device: Device,
    pub orderable: bool,
    accessor: Accessor<R>,
    render: Option<Renderer<R>>,
    default_content: Option<Fallback>,
}

impl<R> Column<R> {
    /// Create a column that reads its value with `accessor`.
    ///
    /// The order field defaults to the header label.
    pub fn new<F>(name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> FieldValue + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            field: name.clone(),
            name,
            align: Alignment::Left,
            copy: false,
            width: None,
            min_device: Device::Mobile,
            orderable: false,
            accessor: Arc::new(accessor),
            render: None,
            default_content: None,
        }
    }

    /// Set the field name used for ordering.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn copy(mut self) -> Self {
        self.copy = true;
        self
    }

    pub fn width(mut self, percent: u8) -> Self {
        self.width = Some(percent.min(100));
        self
    }

    pub fn min_device(mut self, device: Device) -> Self {
        self.min_device = device;
        self
    }

    pub fn orderable(mut self) -> Self {
        self.orderable = true;
        self
    }

    /// Text shown when the value is [`FieldValue::Null`] and no renderer is set.
    pub fn default_content<F>(mut self, fallback: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.default_content = Some(Arc::new(fallback));
        self
    }

    /// Transform the value into display text.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&FieldValue, &R) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Read the raw value from a row.
    pub fn value(&self, row: &R) -> FieldValue {
        (self.accessor)(row)
    }

    /// Display text for a row.
    ///
    /// The renderer wins when present. Otherwise a null value falls back to
    /// the default content, or the empty string.
    pub fn text(&self, row: &R) -> String {
        let value = self.value(row);
        if let Some(render) = &self.render {
            return render(&value, row);
        }
        if value.is_null() {
            return self
                .default_content
                .as_ref()
                .map(|fallback| fallback())
                .unwrap_or_default();
        }
        value.to_string()
    }

    /// Whether the column is part of the primary row on `device`.
    pub fn shown_on(&self, device: Device) -> bool {
        self.min_device != Device::None && device >= self.min_device
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            field: self.field.clone(),
            align: self.align,
            copy: self.copy,
            width: self.width,
            min_device: self.min_device,
            orderable: self.orderable,
            accessor: Arc::clone(&self.accessor),
            render: self.render.clone(),
            default_content: self.default_content.clone(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("field", &self.field)
            .field("align", &self.align)
            .field("copy", &self.copy)
            .field("width", &self.width)
            .field("min_device", &self.min_device)
            .field("orderable", &self.orderable)
            .finish_non_exhaustive()
    }
}
