//! Query request

use std::fmt;

use crate::error::{ClientError, Result};

/// Minimum accepted query length, in characters
pub const MIN_QUERY_LEN: usize = 10;

/// A validated query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInput(String);

impl QueryInput {
    pub fn new(query: impl Into<String>) -> Result<Self> {
        let query = query.into();
        let len = query.chars().count();
        if len < MIN_QUERY_LEN {
            return Err(ClientError::InvalidQuery {
                len,
                min: MIN_QUERY_LEN,
            });
        }
        Ok(Self(query))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
