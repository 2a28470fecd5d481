/// LoanGrid Record Store
///
/// The record store holds the full dataset for the lifetime of a session.
/// It is populated once and never mutated; everything downstream reads it
/// through shared references and refers to records by their store index.
///
/// # Examples
///
/// ```
/// use loangrid::{Loan, LoanStatus, RecordStore};
///
/// let store = RecordStore::new("loans", vec![
///     Loan::new(1, "Alice", 1000, LoanStatus::Pending, "2023-01-01"),
///     Loan::new(2, "Bob", 2000, LoanStatus::Approved, "2023-02-01"),
/// ]).unwrap();
///
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.get(1).map(|l| l.borrower_name.as_str()), Some("Bob"));
/// ```

use crate::error::{GridError, Result};
use crate::record::Loan;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

pub struct RecordStore {
    name: String,
    records: Vec<Loan>,
}

impl RecordStore {
    /// Creates a store from an already-parsed record sequence.
    ///
    /// Fails with `GridError::DuplicateId` if two records share an id.
    pub fn new(name: impl Into<String>, records: Vec<Loan>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for loan in &records {
            if !seen.insert(loan.id) {
                return Err(GridError::DuplicateId(loan.id));
            }
        }

        Ok(RecordStore {
            name: name.into(),
            records,
        })
    }

    /// Parses a JSON array of records
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self> {
        let records: Vec<Loan> = serde_json::from_str(json)?;
        Self::new(name, records)
    }

    /// Reads a JSON dataset file. The store is named after the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "loans".to_string());

        let store = Self::from_json(name, &json)?;
        log::debug!("loaded {} records from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Loan> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Loan] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Loan> {
        self.records.iter()
    }

    pub fn find_by_id(&self, id: u64) -> Option<&Loan> {
        self.records.iter().find(|loan| loan.id == id)
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Loan;
    type IntoIter = std::slice::Iter<'a, Loan>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordStore {{ name: '{}', records: {} }}", self.name, self.records.len())
    }
}
