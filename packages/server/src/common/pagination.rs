//! Offset/limit pagination.
//!
//! Listings are range-based: `offset` rows are skipped and at most `limit`
//! rows returned. There are no cursors; a row inserted between two page
//! requests shifts later pages by one.

use serde::Deserialize;

use super::action_result::ActionError;
use super::validation::FieldErrors;

pub const DEFAULT_LIMIT: i64 = 10;

/// Raw pagination arguments as they arrive from a query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageArgs {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Page { limit, offset }
    }
}

impl PageArgs {
    pub fn new(limit: i64, offset: i64) -> Self {
        PageArgs {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Applies defaults and checks `1 <= limit <= max_limit`, `offset >= 0`.
    pub fn validate(self, max_limit: i64) -> Result<Page, ActionError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = self.offset.unwrap_or(0);

        let mut errors = FieldErrors::new();
        if limit < 1 || limit > max_limit {
            errors.insert(
                "limit".to_string(),
                vec![format!("Limit must be between 1 and {}", max_limit)],
            );
        }
        if offset < 0 {
            errors.insert(
                "offset".to_string(),
                vec!["Offset cannot be negative".to_string()],
            );
        }

        if errors.is_empty() {
            Ok(Page { limit, offset })
        } else {
            Err(ActionError::Validation(errors))
        }
    }
}
