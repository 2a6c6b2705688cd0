use serde::{Deserialize, Serialize};

/// Fields the list endpoint may sort on. Anything outside this allow-list is
/// rejected during parameter normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Rating,
    Size,
    Downloads,
}

impl SortField {
    /// Wire name of the field; also the document key it sorts on.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Rating => "rating",
            SortField::Size => "size",
            SortField::Downloads => "downloads",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rating" => Some(SortField::Rating),
            "size" => Some(SortField::Size),
            "downloads" => Some(SortField::Downloads),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}
