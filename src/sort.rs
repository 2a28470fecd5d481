/// LoanGrid Sort State
///
/// A view is ordered by at most one column. `SortState` holds either no key
/// (native store order) or a `SortKey` of column and direction, so a
/// direction without a column, or a column without a direction, cannot be
/// represented.

use crate::record::{FieldValue, Loan, LoanField};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort order specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (smallest first)
    Ascending,
    /// Descending order (largest first)
    Descending,
}

/// A column and the order to sort it in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub column: LoanField,
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(column: LoanField) -> Self {
        SortKey {
            column,
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(column: LoanField) -> Self {
        SortKey {
            column,
            order: SortOrder::Descending,
        }
    }

    /// Three-way comparison of two records under this key
    pub fn compare(&self, a: &Loan, b: &Loan) -> Ordering {
        let base = compare_values(&a.value(self.column), &b.value(self.column));
        match self.order {
            SortOrder::Ascending => base,
            SortOrder::Descending => base.reverse(),
        }
    }
}

/// Value of the `aria-sort` attribute for a column header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaSort {
    Ascending,
    Descending,
    None,
}

impl AriaSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            AriaSort::Ascending => "ascending",
            AriaSort::Descending => "descending",
            AriaSort::None => "none",
        }
    }
}

/// The active sort, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState {
    key: Option<SortKey>,
}

impl SortState {
    pub fn unsorted() -> Self {
        SortState { key: None }
    }

    pub fn by(key: SortKey) -> Self {
        SortState { key: Some(key) }
    }

    pub fn key(&self) -> Option<SortKey> {
        self.key
    }

    pub fn column(&self) -> Option<LoanField> {
        self.key.map(|k| k.column)
    }

    pub fn direction(&self) -> Option<SortOrder> {
        self.key.map(|k| k.order)
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some()
    }

    /// Advances the header-click cycle for `column`.
    ///
    /// A column other than the active one starts ascending. On the active
    /// column, ascending becomes descending and descending clears the sort.
    pub fn toggle(&mut self, column: LoanField) {
        self.key = match self.key {
            Some(SortKey { column: active, order }) if active == column => match order {
                SortOrder::Ascending => Some(SortKey::descending(column)),
                SortOrder::Descending => None,
            },
            _ => Some(SortKey::ascending(column)),
        };
    }

    pub fn aria_sort(&self, column: LoanField) -> AriaSort {
        match self.key {
            Some(key) if key.column == column => match key.order {
                SortOrder::Ascending => AriaSort::Ascending,
                SortOrder::Descending => AriaSort::Descending,
            },
            _ => AriaSort::None,
        }
    }
}

/// Compares two column values.
///
/// Text compares case-insensitively, integers numerically and ISO dates
/// lexicographically. Values of different kinds compare as equal, which
/// leaves their relative order to the stable sort.
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
        (FieldValue::Text(a), FieldValue::Text(b)) => a
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase)),
        (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
