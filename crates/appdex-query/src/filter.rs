use serde::{Deserialize, Serialize};

/// Document key searched by the list endpoint.
pub const SEARCH_FIELD: &str = "title";

/// Predicate over a record, used to select matches for both counting and
/// fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Matches every record.
    All,
    /// Case-insensitive unanchored substring match on a field.
    IContains { field: String, value: String },
}

impl Filter {
    /// Build the list predicate from a search term.
    ///
    /// An empty term means no filter. The count and the page fetch must both
    /// receive the value built here; `total` and the page diverge otherwise.
    pub fn title_contains(search: &str) -> Self {
        if search.is_empty() {
            Filter::All
        } else {
            Filter::IContains {
                field: SEARCH_FIELD.to_string(),
                value: search.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_matches_all() {
        assert_eq!(Filter::title_contains(""), Filter::All);
    }

    #[test]
    fn search_term_targets_title() {
        let filter = Filter::title_contains("calc");
        assert_eq!(
            filter,
            Filter::IContains {
                field: "title".to_string(),
                value: "calc".to_string(),
            }
        );
    }
}
