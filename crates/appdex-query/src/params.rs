use crate::filter::Filter;
use crate::sort::{Sort, SortDirection, SortField};

/// Raw wire parameters, all optional strings exactly as they arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListParams {
    pub limit: Option<String>,
    pub skip: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Normalized parameters, produced once per request before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub search: String,
    pub sort: Sort,
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Parse error for wire parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    UnknownSortField(String),
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::UnknownSortField(field) => {
                write!(f, "unknown sort field: {field}")
            }
        }
    }
}

impl std::error::Error for ParamError {}

impl RawListParams {
    /// Normalize raw parameters into a typed record.
    ///
    /// Numeric parameters are coerced: a limit that is absent, non-numeric,
    /// zero or negative means "no limit", and a bad skip falls back to 0.
    /// An unrecognized sort field is rejected rather than silently replaced.
    pub fn normalize(&self) -> Result<ListParams, ParamError> {
        let limit = match &self.limit {
            Some(s) => match s.parse::<i64>() {
                Ok(n) if n > 0 => Some(n as usize),
                _ => None,
            },
            None => None,
        };

        let skip = self
            .skip
            .as_ref()
            .and_then(|s| s.parse::<i64>().ok())
            .map(|n| n.max(0) as usize)
            .unwrap_or(0);

        let field = match &self.sort {
            Some(s) => SortField::parse(s)
                .ok_or_else(|| ParamError::UnknownSortField(s.clone()))?,
            None => SortField::Size,
        };

        // Closed two-way choice: exactly "asc" sorts ascending, anything
        // else (absent included) sorts descending.
        let direction = match self.order.as_deref() {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };

        Ok(ListParams {
            search: self.search.clone().unwrap_or_default(),
            sort: Sort { field, direction },
            skip,
            limit,
        })
    }
}

impl ListParams {
    /// The single predicate shared by the count and the page fetch.
    pub fn filter(&self) -> Filter {
        Filter::title_contains(&self.search)
    }
}
