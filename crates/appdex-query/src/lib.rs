mod filter;
mod params;
mod query;
mod sort;

pub use filter::{Filter, SEARCH_FIELD};
pub use params::{ListParams, ParamError, RawListParams};
pub use query::ListQuery;
pub use sort::{Sort, SortDirection, SortField};
