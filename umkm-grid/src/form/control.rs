//! Form control state.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockWriteGuard};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::GridError;
use crate::tree::{CheckTree, CheckedCallback};

/// Date format accepted by [`DateInput`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A control the [`Validator`](super::Validator) can check.
pub trait Validatable: Clone + Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    /// Id used to focus the control.
    fn control_id(&self) -> &str;

    /// Value at the moment validation runs.
    fn snapshot(&self) -> Self::Value;

    /// Show `message` next to the control, or clear it with `None`.
    fn mark(&self, message: Option<String>);
}

#[derive(Debug)]
struct ControlInner<T> {
    value: T,
    error: Option<String>,
}

/// A form control holding a value and its validation error.
#[derive(Debug)]
pub struct Control<T> {
    id: String,
    inner: Arc<RwLock<ControlInner<T>>>,
}

impl<T> Clone for Control<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Control<T> {
    pub fn new(id: impl Into<String>, value: T) -> Self {
        Self {
            id: id.into(),
            inner: Arc::new(RwLock::new(ControlInner { value, error: None })),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T {
        self.inner
            .read()
            .map(|guard| guard.value.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().value.clone())
    }

    pub fn set(&self, value: T) {
        self.write().value = value;
    }

    /// Update the value using a closure
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.write().value);
    }

    /// Message left by the last validation run.
    pub fn error(&self) -> Option<String> {
        self.inner
            .read()
            .map(|guard| guard.error.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().error.clone())
    }

    pub fn has_error(&self) -> bool {
        self.error().is_some()
    }

    fn write(&self) -> RwLockWriteGuard<'_, ControlInner<T>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T: Clone + Send + Sync + 'static> Validatable for Control<T> {
    type Value = T;

    fn control_id(&self) -> &str {
        &self.id
    }

    fn snapshot(&self) -> T {
        self.get()
    }

    fn mark(&self, message: Option<String>) {
        self.write().error = message;
    }
}

// -----------------------------------------------------------------------------
// Parsed text
// -----------------------------------------------------------------------------

/// Text input that parses into `T`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Parsed<T> {
    #[default]
    Empty,
    Valid(T),
    /// Raw text that failed to parse.
    Invalid(String),
}

impl<T> Parsed<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Parsed::Valid(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Parsed::Empty)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Parsed::Invalid(_))
    }

    fn parse_with<E>(raw: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Parsed::Empty;
        }
        match parse(trimmed) {
            Ok(value) => Parsed::Valid(value),
            Err(_) => Parsed::Invalid(raw.to_string()),
        }
    }
}

pub type TextInput = Control<String>;
pub type DecimalInput = Control<Parsed<Decimal>>;
pub type DateInput = Control<Parsed<NaiveDate>>;

impl Control<Parsed<Decimal>> {
    /// Parse typed text. Spaces and `_` group separators are ignored.
    pub fn set_text(&self, raw: &str) {
        let parsed = Parsed::parse_with(raw, |s| {
            let compact: String = s.chars().filter(|c| *c != ' ' && *c != '_').collect();
            Decimal::from_str(&compact)
        });
        self.set(parsed);
    }
}

impl Control<Parsed<NaiveDate>> {
    /// Parse typed text in [`DATE_FORMAT`].
    pub fn set_text(&self, raw: &str) {
        let parsed = Parsed::parse_with(raw, |s| NaiveDate::parse_from_str(s, DATE_FORMAT));
        self.set(parsed);
    }
}

// -----------------------------------------------------------------------------
// Radio and select
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// Options plus the selected index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Choice {
    pub options: Vec<ChoiceOption>,
    pub selected: Option<usize>,
}

impl Choice {
    pub fn new<V, L>(options: impl IntoIterator<Item = (V, L)>) -> Self
    where
        V: Into<String>,
        L: Into<String>,
    {
        Self {
            options: options
                .into_iter()
                .map(|(value, label)| ChoiceOption {
                    value: value.into(),
                    label: label.into(),
                })
                .collect(),
            selected: None,
        }
    }

    pub fn selected_option(&self) -> Option<&ChoiceOption> {
        self.selected.and_then(|i| self.options.get(i))
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected_option().map(|o| o.value.as_str())
    }

    /// Select by index. Returns false when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Select by option value. Returns false when no option matches.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(index) => self.select(index),
            None => false,
        }
    }
}

pub type RadioGroup = Control<Choice>;
pub type Select = Control<Choice>;

impl Control<Choice> {
    pub fn select_value(&self, value: &str) -> bool {
        let mut found = false;
        self.update(|choice| found = choice.select_value(value));
        found
    }
}

// -----------------------------------------------------------------------------
// File
// -----------------------------------------------------------------------------

/// Metadata of a picked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Lowercased extension without the dot.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }
}

pub type FileInput = Control<Option<FileMeta>>;

// -----------------------------------------------------------------------------
// Tree
// -----------------------------------------------------------------------------

/// Checkbox tree used as a form control. Its value is the checked ids.
///
/// The tree's `on_checked_change` callback is detached on construction and
/// fired after the tree lock is released, so it may read this control.
#[derive(Clone)]
pub struct TreeSelect {
    id: String,
    tree: Arc<Mutex<CheckTree>>,
    listener: Arc<Mutex<Option<CheckedCallback>>>,
    error: Arc<RwLock<Option<String>>>,
}

impl TreeSelect {
    pub fn new(id: impl Into<String>, mut tree: CheckTree) -> Self {
        let listener = tree.take_on_checked_change();
        Self {
            id: id.into(),
            tree: Arc::new(Mutex::new(tree)),
            listener: Arc::new(Mutex::new(listener)),
            error: Arc::new(RwLock::new(None)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CheckTree> {
        self.tree.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn check(&self, id: i64, value: bool) -> Result<(), GridError> {
        let ids = {
            let mut tree = self.lock();
            tree.check(id, value)?;
            tree.checked_ids()
        };
        self.changed(&ids);
        Ok(())
    }

    /// Run `f` against the tree. The listener fires afterwards if the
    /// checked ids changed.
    pub fn with_tree<T>(&self, f: impl FnOnce(&mut CheckTree) -> T) -> T {
        let (out, before, after) = {
            let mut tree = self.lock();
            let before = tree.checked_ids();
            let out = f(&mut tree);
            let after = tree.checked_ids();
            (out, before, after)
        };
        if before != after {
            self.changed(&after);
        }
        out
    }

    pub fn checked_ids(&self) -> Vec<i64> {
        self.lock().checked_ids()
    }

    pub fn error(&self) -> Option<String> {
        self.error.read().ok().and_then(|guard| guard.clone())
    }

    pub fn has_error(&self) -> bool {
        self.error().is_some()
    }

    /// The listener is taken out while it runs; checks it makes on this
    /// control are not reported back to it.
    fn changed(&self, ids: &[i64]) {
        let taken = self.listener.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(mut listener) = taken else { return };
        listener(ids);
        let mut slot = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(listener);
        }
    }
}

impl Validatable for TreeSelect {
    type Value = Vec<i64>;

    fn control_id(&self) -> &str {
        &self.id
    }

    fn snapshot(&self) -> Vec<i64> {
        self.checked_ids()
    }

    fn mark(&self, message: Option<String>) {
        let mut guard = self.error.write().unwrap_or_else(|e| e.into_inner());
        *guard = message;
    }
}
