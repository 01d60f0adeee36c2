use std::fmt;

use serde::Serialize;

use threads_client::Record;

/// Why the paging loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The endpoint said there is nothing after the last page.
    NoMorePages,
    /// `max_pages` attempts were made.
    PageBudgetReached,
    /// Too many failures in a row.
    TooManyErrors,
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::NoMorePages => write!(f, "no more pages"),
            Termination::PageBudgetReached => write!(f, "page budget reached"),
            Termination::TooManyErrors => write!(f, "too many consecutive errors"),
            Termination::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A failed page attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageError {
    #[serde(rename = "page")]
    pub page_index: u32,
    #[serde(rename = "error")]
    pub message: String,
}

/// Everything one search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Records in discovery order. Duplicates across pages are kept.
    pub records: Vec<Record>,
    /// Attempts made, failed ones included.
    pub pages_processed: u32,
    pub page_errors: Vec<PageError>,
    pub termination: Termination,
}

impl SearchOutcome {
    pub fn summary(&self) -> String {
        if self.page_errors.is_empty() {
            "Search request processed successfully".to_string()
        } else {
            format!(
                "Search completed with {} page error(s) ({})",
                self.page_errors.len(),
                self.termination
            )
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records from {} pages, {} errors, {}",
            self.records.len(),
            self.pages_processed,
            self.page_errors.len(),
            self.termination
        )
    }
}
