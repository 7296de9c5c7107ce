//! Rule lists per value type.

use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::form::control::{Choice, FileMeta, Parsed};

type Pending = Pin<Box<dyn Future<Output = bool> + Send>>;

enum Test<V> {
    Sync(Box<dyn Fn(&V) -> bool + Send + Sync>),
    /// Skipped by [`Validator::validate`](super::Validator::validate).
    Async(Box<dyn Fn(V) -> Pending + Send + Sync>),
}

struct Rule<V> {
    test: Test<V>,
    message: String,
}

/// Ordered checks over a value of type `V`.
///
/// Rules run in the order they were added and stop at the first failure,
/// so a cheap format check guards an expensive async lookup.
pub struct Rules<V> {
    rules: Vec<Rule<V>>,
}

impl<V> Default for Rules<V> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<V: Clone + Send + Sync + 'static> Rules<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `message` when `test` returns false.
    pub fn check<F>(mut self, test: F, message: impl Into<String>) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            test: Test::Sync(Box::new(test)),
            message: message.into(),
        });
        self
    }

    /// Like [`check`](Self::check) but awaited, e.g. a uniqueness lookup.
    pub fn check_async<F, Fut>(mut self, test: F, message: impl Into<String>) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.rules.push(Rule {
            test: Test::Async(Box::new(move |value| Box::pin(test(value)))),
            message: message.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(super) fn first_failure(&self, value: &V) -> Option<&str> {
        self.rules.iter().find_map(|rule| match &rule.test {
            Test::Sync(test) if !test(value) => Some(rule.message.as_str()),
            _ => None,
        })
    }

    pub(super) async fn first_failure_async(&self, value: V) -> Option<&str> {
        for rule in &self.rules {
            let passed = match &rule.test {
                Test::Sync(test) => test(&value),
                Test::Async(test) => test(value.clone()).await,
            };
            if !passed {
                return Some(rule.message.as_str());
            }
        }
        None
    }
}

impl Rules<String> {
    /// Non-blank after trimming.
    pub fn required(self, message: impl Into<String>) -> Self {
        self.check(|text| !text.trim().is_empty(), message)
    }

    /// At least `min` characters.
    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.check(move |text| text.chars().count() >= min, message)
    }

    pub fn max_length(self, max: usize, message: impl Into<String>) -> Self {
        self.check(move |text| text.chars().count() <= max, message)
    }

    /// Must match `pattern`. A pattern that does not compile rejects
    /// everything.
    pub fn pattern(self, pattern: &str, message: impl Into<String>) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => self.check(move |text| regex.is_match(text), message),
            Err(e) => {
                log::warn!("[form] pattern {:?} does not compile: {}", pattern, e);
                self.check(|_| false, message)
            }
        }
    }

    /// Empty text passes; pair with [`required`](Self::required).
    pub fn email(self, message: impl Into<String>) -> Self {
        self.check(
            |text| text.is_empty() || email_address::EmailAddress::is_valid(text),
            message,
        )
    }

    pub fn equals(self, expected: impl Into<String>, message: impl Into<String>) -> Self {
        let expected = expected.into();
        self.check(move |text| *text == expected, message)
    }

    pub fn contains(self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        let needle = needle.into();
        self.check(move |text| text.contains(needle.as_str()), message)
    }
}

impl Rules<bool> {
    pub fn checked(self, message: impl Into<String>) -> Self {
        self.check(|ticked| *ticked, message)
    }
}

impl<T: Clone + Send + Sync + 'static> Rules<Parsed<T>> {
    /// Some text was entered.
    pub fn present(self, message: impl Into<String>) -> Self {
        self.check(|parsed| !parsed.is_empty(), message)
    }

    /// Entered text parsed. Empty passes.
    pub fn parsed(self, message: impl Into<String>) -> Self {
        self.check(|parsed| !parsed.is_invalid(), message)
    }
}

impl Rules<Parsed<Decimal>> {
    pub fn min_value(self, min: Decimal, message: impl Into<String>) -> Self {
        self.check(move |parsed| parsed.value().is_none_or(|v| *v >= min), message)
    }

    pub fn max_value(self, max: Decimal, message: impl Into<String>) -> Self {
        self.check(move |parsed| parsed.value().is_none_or(|v| *v <= max), message)
    }
}

impl Rules<Parsed<NaiveDate>> {
    pub fn not_before(self, earliest: NaiveDate, message: impl Into<String>) -> Self {
        self.check(move |parsed| parsed.value().is_none_or(|d| *d >= earliest), message)
    }

    pub fn not_after(self, latest: NaiveDate, message: impl Into<String>) -> Self {
        self.check(move |parsed| parsed.value().is_none_or(|d| *d <= latest), message)
    }
}

impl Rules<Choice> {
    pub fn selected(self, message: impl Into<String>) -> Self {
        self.check(|choice| choice.selected_option().is_some(), message)
    }
}

impl Rules<Option<FileMeta>> {
    pub fn file_required(self, message: impl Into<String>) -> Self {
        self.check(Option::is_some, message)
    }

    /// Case-insensitive extensions without the dot. No file passes.
    pub fn accepted(self, extensions: &[&str], message: impl Into<String>) -> Self {
        let allowed: Vec<String> = extensions.iter().map(|e| e.to_ascii_lowercase()).collect();
        self.check(
            move |file| {
                file.as_ref()
                    .is_none_or(|f| f.extension().is_some_and(|ext| allowed.contains(&ext)))
            },
            message,
        )
    }

    pub fn max_size(self, bytes: u64, message: impl Into<String>) -> Self {
        self.check(move |file| file.as_ref().is_none_or(|f| f.size <= bytes), message)
    }
}

/// Tree selections are the checked node ids.
impl Rules<Vec<i64>> {
    pub fn at_least(self, min: usize, message: impl Into<String>) -> Self {
        self.check(move |ids| ids.len() >= min, message)
    }
}
