//! Listing limits

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use super::ContentError;

/// Maximum number of items a listing call returns.
///
/// Always a positive integer. Construction from untrusted input (CLI flags,
/// query strings, config values) fails with [`ContentError::InvalidLimit`]
/// instead of clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Limit(NonZeroUsize);

impl Limit {
    pub fn new(value: i64) -> Result<Self, ContentError> {
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or_else(|| ContentError::invalid_limit(value))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl From<NonZeroUsize> for Limit {
    fn from(value: NonZeroUsize) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Limit {
    type Error = ContentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Limit> for i64 {
    fn from(limit: Limit) -> Self {
        i64::try_from(limit.get()).unwrap_or(i64::MAX)
    }
}

impl FromStr for Limit {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ContentError::invalid_limit(s))?;
        Self::new(value)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
