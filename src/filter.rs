/// LoanGrid Filter Criteria
///
/// `FilterCriteria` holds the user-controlled predicates applied to the record
/// store. Every criterion is independently optional: an empty search string,
/// the `All` status, and `None` bounds all mean "no filter". A record passes
/// when it passes every active criterion.
///
/// Criteria that contradict each other (min above max, start after end) are
/// not rejected; they simply match nothing.

use crate::record::{Loan, LoanStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status selector: a single status, or the `All` wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(LoanStatus),
}

impl StatusFilter {
    pub fn admits(&self, status: LoanStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl From<LoanStatus> for StatusFilter {
    fn from(status: LoanStatus) -> Self {
        StatusFilter::Only(status)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.as_str().to_string()
    }
}

/// The full set of filter predicates
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring of the borrower name
    pub search_text: String,
    pub status: StatusFilter,
    /// Inclusive lower amount bound
    pub min_amount: Option<u64>,
    /// Inclusive upper amount bound
    pub max_amount: Option<u64>,
    /// Inclusive ISO-8601 lower date bound
    pub start_date: Option<String>,
    /// Inclusive ISO-8601 upper date bound
    pub end_date: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_amount_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn with_date_range(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_date = start.map(str::to_string);
        self.end_date = end.map(str::to_string);
        self
    }

    /// Returns true if no criterion is active
    pub fn is_unrestricted(&self) -> bool {
        self.search_text.is_empty()
            && self.status == StatusFilter::All
            && self.min_amount.is_none()
            && self.max_amount.is_none()
            && active_date(&self.start_date).is_none()
            && active_date(&self.end_date).is_none()
    }

    /// Evaluates all criteria against one record.
    ///
    /// For repeated evaluation prefer `prepare()`, which lowercases the
    /// search text once.
    pub fn matches(&self, loan: &Loan) -> bool {
        self.prepare().matches(loan)
    }

    pub fn prepare(&self) -> Predicate<'_> {
        Predicate {
            needle: if self.search_text.is_empty() {
                None
            } else {
                Some(self.search_text.to_lowercase())
            },
            criteria: self,
        }
    }
}

/// Empty date strings count as unset
fn active_date(bound: &Option<String>) -> Option<&str> {
    bound.as_deref().filter(|d| !d.is_empty())
}

/// Filter criteria ready for evaluation over many records
pub struct Predicate<'a> {
    criteria: &'a FilterCriteria,
    needle: Option<String>,
}

impl Predicate<'_> {
    pub fn matches(&self, loan: &Loan) -> bool {
        let c = self.criteria;

        if let Some(needle) = &self.needle {
            if !loan.borrower_name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if !c.status.admits(loan.status) {
            return false;
        }
        if c.min_amount.is_some_and(|min| loan.amount < min) {
            return false;
        }
        if c.max_amount.is_some_and(|max| loan.amount > max) {
            return false;
        }
        if active_date(&c.start_date).is_some_and(|start| loan.close_date.as_str() < start) {
            return false;
        }
        if active_date(&c.end_date).is_some_and(|end| loan.close_date.as_str() > end) {
            return false;
        }
        true
    }
}
