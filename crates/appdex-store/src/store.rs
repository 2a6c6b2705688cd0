use appdex_query::{Filter, ListQuery};
use bson::Document;

use crate::error::StoreError;

/// Read primitives the list engine is built on.
///
/// `count` takes the bare filter and `find` takes the full query so both
/// operations can share one predicate. Implementations give no isolation
/// guarantee between the two calls; each read sees its own point-in-time
/// view of the collection.
pub trait AppStore: Send + Sync {
    /// Count every record matching the filter, ignoring pagination.
    fn count(&self, filter: &Filter) -> Result<u64, StoreError>;

    /// Sorted, filtered page fetch: sort the full filtered set, then drop
    /// `skip` records, then keep at most `limit`. Records come back whole —
    /// projection is the caller's job.
    fn find(&self, query: &ListQuery) -> Result<Vec<Document>, StoreError>;
}
