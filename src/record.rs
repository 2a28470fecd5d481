/// LoanGrid Record Definitions
///
/// A `Loan` is the unit held by the record store. Records are immutable once
/// loaded; views and windows refer to them by store index.
///
/// Each record exposes its columns through `LoanField`, and the value of a
/// column through `FieldValue`, so that filtering and sorting can be written
/// once against a small set of typed values rather than per field.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 3] = [LoanStatus::Pending, LoanStatus::Approved, LoanStatus::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = String;

    /// Accepts "Pending", "Approved" or "Rejected" in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(LoanStatus::Pending),
            "approved" => Ok(LoanStatus::Approved),
            "rejected" => Ok(LoanStatus::Rejected),
            _ => Err(format!(
                "Unknown loan status: '{}'. Use 'Pending', 'Approved' or 'Rejected'",
                s
            )),
        }
    }
}

/// A single loan record.
///
/// The serialized form uses the camelCase field names of the dataset files:
///
/// ```
/// use loangrid::{Loan, LoanStatus};
///
/// let json = r#"{"id":7,"borrowerName":"Alice","amount":1200,"status":"Approved","closeDate":"2025-01-07"}"#;
/// let loan: Loan = serde_json::from_str(json).unwrap();
///
/// assert_eq!(loan.borrower_name, "Alice");
/// assert_eq!(loan.status, LoanStatus::Approved);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: u64,
    pub borrower_name: String,
    pub amount: u64,
    pub status: LoanStatus,
    /// ISO-8601 calendar date (YYYY-MM-DD)
    pub close_date: String,
}

impl Loan {
    pub fn new(
        id: u64,
        borrower_name: impl Into<String>,
        amount: u64,
        status: LoanStatus,
        close_date: impl Into<String>,
    ) -> Self {
        Loan {
            id,
            borrower_name: borrower_name.into(),
            amount,
            status,
            close_date: close_date.into(),
        }
    }

    /// Returns the value of one column of this record
    pub fn value(&self, field: LoanField) -> FieldValue<'_> {
        match field {
            LoanField::Id => FieldValue::Integer(self.id),
            LoanField::BorrowerName => FieldValue::Text(&self.borrower_name),
            LoanField::Amount => FieldValue::Integer(self.amount),
            LoanField::Status => FieldValue::Text(self.status.as_str()),
            LoanField::CloseDate => FieldValue::Date(&self.close_date),
        }
    }
}

/// The columns of a loan record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoanField {
    Id,
    BorrowerName,
    Amount,
    Status,
    CloseDate,
}

impl LoanField {
    pub const ALL: [LoanField; 5] = [
        LoanField::Id,
        LoanField::BorrowerName,
        LoanField::Amount,
        LoanField::Status,
        LoanField::CloseDate,
    ];

    /// The column name as it appears in dataset files
    pub fn name(&self) -> &'static str {
        match self {
            LoanField::Id => "id",
            LoanField::BorrowerName => "borrowerName",
            LoanField::Amount => "amount",
            LoanField::Status => "status",
            LoanField::CloseDate => "closeDate",
        }
    }
}

impl fmt::Display for LoanField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LoanField {
    type Err = String;

    /// Accepts the camelCase column name or its snake_case spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(LoanField::Id),
            "borrowerName" | "borrower_name" => Ok(LoanField::BorrowerName),
            "amount" => Ok(LoanField::Amount),
            "status" => Ok(LoanField::Status),
            "closeDate" | "close_date" => Ok(LoanField::CloseDate),
            _ => Err(format!("Unknown column: '{}'", s)),
        }
    }
}

/// A borrowed view of one column value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Integer(u64),
    Text(&'a str),
    /// ISO-8601 date; orders lexicographically
    Date(&'a str),
}

impl<'a> FieldValue<'a> {
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&'a str> {
        match self {
            FieldValue::Date(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("Approved".parse::<LoanStatus>(), Ok(LoanStatus::Approved));
        assert_eq!("pending".parse::<LoanStatus>(), Ok(LoanStatus::Pending));
        assert_eq!("REJECTED".parse::<LoanStatus>(), Ok(LoanStatus::Rejected));
        assert!("Closed".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn test_field_names() {
        for field in LoanField::ALL {
            assert_eq!(field.name().parse::<LoanField>(), Ok(field));
        }
        assert_eq!("close_date".parse::<LoanField>(), Ok(LoanField::CloseDate));
        assert!("rate".parse::<LoanField>().is_err());
    }

    #[test]
    fn test_field_values() {
        let loan = Loan::new(3, "Charlie", 1500, LoanStatus::Rejected, "2023-03-01");

        assert_eq!(loan.value(LoanField::Id).as_integer(), Some(3));
        assert_eq!(loan.value(LoanField::Amount).as_integer(), Some(1500));
        assert_eq!(loan.value(LoanField::BorrowerName).as_text(), Some("Charlie"));
        assert_eq!(loan.value(LoanField::Status).as_text(), Some("Rejected"));
        assert_eq!(loan.value(LoanField::CloseDate).as_date(), Some("2023-03-01"));
        assert_eq!(loan.value(LoanField::CloseDate).as_text(), None);
    }

    #[test]
    fn test_loan_json_shape() {
        let loan = Loan::new(1, "Alice", 1000, LoanStatus::Pending, "2023-01-01");
        let json = serde_json::to_value(&loan).unwrap();

        assert_eq!(json["borrowerName"], "Alice");
        assert_eq!(json["closeDate"], "2023-01-01");
        assert_eq!(json["status"], "Pending");
    }
}
