//! In-memory registry standing in for the REST API.
//!
//! Every call waits for the configured latency first so the table's
//! loading state is visible.

use std::cmp::Ordering;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use umkm_grid::table::{SortDirection, TableOptions};

use crate::registry::{Umkm, code_for};

/// One page of rows plus the filtered total.
#[derive(Debug, Clone)]
pub struct Page {
    pub rows: Vec<Umkm>,
    pub total: usize,
}

/// Fields of a new registration, already validated.
#[derive(Debug, Clone)]
pub struct NewUmkm {
    pub name: String,
    pub owner: Option<String>,
    pub email: Option<String>,
    pub category: String,
    pub revenue: Decimal,
    pub registered: NaiveDate,
}

#[derive(Debug)]
struct Store {
    rows: Vec<Umkm>,
    next_id: u32,
}

/// Shared handle to the registry.
#[derive(Debug, Clone)]
pub struct Registry {
    store: Arc<RwLock<Store>>,
    latency: Duration,
}

impl Registry {
    pub fn new(rows: Vec<Umkm>, latency: Duration) -> Self {
        let next_id = rows.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            store: Arc::new(RwLock::new(Store { rows, next_id })),
            latency,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub fn len(&self) -> usize {
        self.read().rows.len()
    }

    /// Filter, search, order and slice the way the API does.
    pub async fn query(&self, options: &TableOptions, category: Option<&str>) -> Page {
        self.wait().await;

        let store = self.read();
        let needle = options.search.trim().to_lowercase();
        let mut matches: Vec<&Umkm> = store
            .rows
            .iter()
            .filter(|r| category.is_none_or(|c| r.category.eq_ignore_ascii_case(c)))
            .filter(|r| needle.is_empty() || matches_search(r, &needle))
            .collect();

        if let Some((field, direction)) = &options.order {
            matches.sort_by(|a, b| {
                let ordering = compare(a, b, field);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total = matches.len();
        let rows: Vec<Umkm> = matches
            .into_iter()
            .skip(options.offset())
            .take(options.length.get())
            .cloned()
            .collect();
        log::debug!(
            "[backend] query page={} search={:?} category={:?}: {} of {}",
            options.page,
            options.search,
            category,
            rows.len(),
            total
        );
        Page { rows, total }
    }

    /// Case-insensitive name lookup used by the registration form.
    pub async fn name_taken(&self, name: &str) -> bool {
        self.wait().await;
        let name = name.trim();
        self.read()
            .rows
            .iter()
            .any(|r| r.name.eq_ignore_ascii_case(name))
    }

    pub async fn insert(&self, new: NewUmkm) -> u32 {
        self.wait().await;
        let mut store = self.write();
        let id = store.next_id;
        store.next_id += 1;
        store.rows.push(Umkm {
            id: Some(id),
            code: code_for(id),
            name: new.name,
            owner: new.owner,
            email: new.email,
            category: new.category,
            district: String::new(),
            employees: 1,
            revenue: new.revenue,
            registered: new.registered,
            verified: false,
        });
        log::info!("[backend] registered {} as {}", id, code_for(id));
        id
    }

    /// Delete rows by id. Returns how many existed.
    pub async fn delete(&self, ids: &[u32]) -> usize {
        self.wait().await;
        let mut store = self.write();
        let before = store.rows.len();
        store
            .rows
            .retain(|r| r.id.is_none_or(|id| !ids.contains(&id)));
        let removed = before - store.rows.len();
        log::info!("[backend] deleted {} of {} requested", removed, ids.len());
        removed
    }
}

fn matches_search(row: &Umkm, needle: &str) -> bool {
    [
        Some(row.name.as_str()),
        Some(row.code.as_str()),
        row.owner.as_deref(),
        Some(row.district.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|text| text.to_lowercase().contains(needle))
}

fn compare(a: &Umkm, b: &Umkm, field: &str) -> Ordering {
    match field {
        "name" => a.name.cmp(&b.name),
        "code" => a.code.cmp(&b.code),
        // Missing owners sort last.
        "owner" => match (&a.owner, &b.owner) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        "category" => a.category.cmp(&b.category),
        "district" => a.district.cmp(&b.district),
        "employees" => a.employees.cmp(&b.employees),
        "revenue" => a.revenue.cmp(&b.revenue),
        "registered" => a.registered.cmp(&b.registered),
        _ => {
            log::warn!("[backend] cannot order by `{}`", field);
            Ordering::Equal
        }
    }
    .then_with(|| a.id.cmp(&b.id))
}
