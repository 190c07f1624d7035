//! Optional limit/offset paging block.

use crate::error::RepoError;
use crate::params::SqlParams;

/// Optional paging bounds shared by every search descriptor.
///
/// Absent fields leave the emitted query untouched. Negative values are an
/// input-validation concern of the API boundary; this block suppresses them
/// rather than emitting invalid SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PagingParams {
    pub const fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }

    pub fn validate(&self) -> Result<(), RepoError> {
        Ok(())
    }

    pub const fn set_limit(&mut self, limit: Option<i64>) {
        self.limit = limit;
    }

    pub const fn set_offset(&mut self, offset: Option<i64>) {
        self.offset = offset;
    }

    /// Emit `limit`/`offset` fragments for present, non-negative values.
    pub fn paging_clause(&self, query: &mut String, params: &mut SqlParams) {
        if let Some(limit) = self.limit
            && limit >= 0
        {
            let n = params.push(limit);
            query.push_str(&format!(" limit ${n} "));
        }
        if let Some(offset) = self.offset
            && offset >= 0
        {
            let n = params.push(offset);
            query.push_str(&format!(" offset ${n} "));
        }
    }
}
