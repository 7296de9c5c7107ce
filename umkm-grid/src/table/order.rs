//! Single-column sort state.

use crate::error::GridError;

use super::column::Column;
use super::options::SortDirection;

/// Header affordance of an orderable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMarker {
    /// Orderable but not the active column.
    Unsorted,
    Ascending,
    Descending,
}

impl SortMarker {
    fn direction(self) -> Option<SortDirection> {
        match self {
            SortMarker::Unsorted => None,
            SortMarker::Ascending => Some(SortDirection::Asc),
            SortMarker::Descending => Some(SortDirection::Desc),
        }
    }
}

impl From<SortDirection> for SortMarker {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => SortMarker::Ascending,
            SortDirection::Desc => SortMarker::Descending,
        }
    }
}

/// Per-column sort markers, index-aligned with the column list.
///
/// `None` marks a column that cannot be ordered. At most one marker is
/// directional at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderState {
    markers: Vec<Option<SortMarker>>,
    fields: Vec<String>,
}

impl OrderState {
    /// Build the initial state from the caller's default order.
    ///
    /// The default is matched against each orderable column's field, then its
    /// header label. Without a match no column starts active.
    pub fn new<R>(columns: &[Column<R>], default: Option<&(String, SortDirection)>) -> Self {
        let mut markers: Vec<Option<SortMarker>> = columns
            .iter()
            .map(|c| c.orderable.then_some(SortMarker::Unsorted))
            .collect();

        if let Some((name, direction)) = default {
            let found = columns
                .iter()
                .position(|c| c.orderable && (&c.field == name || &c.name == name));
            match found {
                Some(index) => markers[index] = Some((*direction).into()),
                None => log::debug!("[order] default order `{}` matches no orderable column", name),
            }
        }

        Self {
            markers,
            fields: columns.iter().map(|c| c.field.clone()).collect(),
        }
    }

    pub fn markers(&self) -> &[Option<SortMarker>] {
        &self.markers
    }

    pub fn marker(&self, index: usize) -> Option<SortMarker> {
        self.markers.get(index).copied().flatten()
    }

    /// The active `(field, direction)`, if any column is ordered.
    pub fn active(&self) -> Option<(String, SortDirection)> {
        self.markers.iter().enumerate().find_map(|(index, marker)| {
            marker
                .and_then(SortMarker::direction)
                .map(|direction| (self.fields[index].clone(), direction))
        })
    }

    /// Activate the column at `index`.
    ///
    /// Clicking the active column flips its direction. Clicking any other
    /// orderable column resets the previous one and sorts ascending.
    pub fn toggle(&mut self, index: usize) -> Result<(String, SortDirection), GridError> {
        let current = *self.markers.get(index).ok_or(GridError::UnknownColumn(index))?;
        let Some(current) = current else {
            return Err(GridError::NotOrderable(self.fields[index].clone()));
        };

        let next = match current.direction() {
            Some(direction) => direction.toggled(),
            None => {
                for marker in self.markers.iter_mut().flatten() {
                    *marker = SortMarker::Unsorted;
                }
                SortDirection::Asc
            }
        };
        self.markers[index] = Some(next.into());

        log::trace!("[order] column {} -> {}", self.fields[index], next);
        Ok((self.fields[index].clone(), next))
    }
}
