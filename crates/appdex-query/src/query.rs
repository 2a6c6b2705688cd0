use serde::{Deserialize, Serialize};

use crate::filter::Filter;
use crate::sort::Sort;

/// A fully-resolved page fetch: sort the filtered set, drop `skip` records,
/// keep at most `limit`. `limit: None` returns everything from `skip` on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub filter: Filter,
    pub sort: Sort,
    pub skip: usize,
    pub limit: Option<usize>,
}
