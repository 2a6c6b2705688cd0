use std::sync::Arc;

use bson::Document;

use appdex_query::{ListQuery, RawListParams};
use appdex_store::AppStore;

use crate::error::ListError;
use crate::response::ListResponse;

/// Fields stripped from each record before transfer. Filtering and sorting
/// always run on the full record inside the store, so the projection cannot
/// change which records a page contains or their order.
const HEAVY_FIELDS: &[&str] = &["description", "rating_breakdown", "screenshots"];

/// The list query engine.
///
/// Stateless: each call normalizes the raw parameters, builds one filter
/// predicate, counts and fetches with that same predicate, projects the page
/// and assembles the envelope. The store handle is injected at construction.
pub struct ListEngine {
    store: Arc<dyn AppStore>,
}

impl ListEngine {
    pub fn new(store: Arc<dyn AppStore>) -> Self {
        Self { store }
    }

    pub fn query(&self, raw: &RawListParams) -> Result<ListResponse, ListError> {
        let params = raw.normalize()?;
        let filter = params.filter();

        // The count and the page fetch run against the same predicate but
        // separate snapshots; writes landing between the two reads can skew
        // total against the page, which callers tolerate.
        let total = self.store.count(&filter)?;

        let query = ListQuery {
            filter,
            sort: params.sort,
            skip: params.skip,
            limit: params.limit,
        };
        let apps = self
            .store
            .find(&query)?
            .into_iter()
            .map(project)
            .collect();

        Ok(ListResponse { apps, total })
    }
}

/// Drop heavy fields from a record before transfer.
fn project(mut doc: Document) -> Document {
    for field in HEAVY_FIELDS {
        doc.remove(field);
    }
    doc
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bson::doc;

    use appdex_query::{Filter, ParamError};
    use appdex_store::{MemoryStore, StoreError};

    use super::*;

    /// Remembers the predicate handed to each read.
    struct RecordingStore {
        count_filter: Mutex<Option<Filter>>,
        find_filter: Mutex<Option<Filter>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                count_filter: Mutex::new(None),
                find_filter: Mutex::new(None),
            }
        }
    }

    impl AppStore for RecordingStore {
        fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
            *self.count_filter.lock().unwrap() = Some(filter.clone());
            Ok(0)
        }

        fn find(&self, query: &ListQuery) -> Result<Vec<Document>, StoreError> {
            *self.find_filter.lock().unwrap() = Some(query.filter.clone());
            Ok(Vec::new())
        }
    }

    struct FailingStore;

    impl AppStore for FailingStore {
        fn count(&self, _filter: &Filter) -> Result<u64, StoreError> {
            Err(StoreError::Storage("store unreachable".to_string()))
        }

        fn find(&self, _query: &ListQuery) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Storage("store unreachable".to_string()))
        }
    }

    #[test]
    fn count_and_fetch_share_one_predicate() {
        for search in [None, Some(""), Some("calc"), Some("Calculator Pro")] {
            let store = Arc::new(RecordingStore::new());
            let engine = ListEngine::new(store.clone());
            let raw = RawListParams {
                search: search.map(str::to_string),
                ..Default::default()
            };
            engine.query(&raw).unwrap();

            let count_filter = store.count_filter.lock().unwrap().clone().unwrap();
            let find_filter = store.find_filter.lock().unwrap().clone().unwrap();
            assert_eq!(count_filter, find_filter, "search {search:?}");
        }
    }

    #[test]
    fn unknown_sort_field_fails_before_any_store_access() {
        let store = Arc::new(RecordingStore::new());
        let engine = ListEngine::new(store.clone());
        let raw = RawListParams {
            sort: Some("publisher".to_string()),
            ..Default::default()
        };

        let err = engine.query(&raw).unwrap_err();
        assert!(matches!(
            err,
            ListError::InvalidParameter(ParamError::UnknownSortField(_))
        ));
        assert!(store.count_filter.lock().unwrap().is_none());
        assert!(store.find_filter.lock().unwrap().is_none());
    }

    #[test]
    fn store_failure_surfaces_without_partial_results() {
        let engine = ListEngine::new(Arc::new(FailingStore));
        let err = engine.query(&RawListParams::default()).unwrap_err();
        assert!(matches!(err, ListError::Store(_)));
    }

    #[test]
    fn heavy_fields_are_projected_away() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_many(vec![doc! {
                "_id": "app-1",
                "title": "Calculator Pro",
                "rating": 4.6,
                "size": 12_i64,
                "downloads": 250_000_i64,
                "description": "A very long marketing blurb.",
                "rating_breakdown": { "5": 900_i64, "4": 80_i64, "1": 20_i64 },
                "screenshots": ["a.png", "b.png"],
            }])
            .unwrap();

        let engine = ListEngine::new(store);
        let result = engine.query(&RawListParams::default()).unwrap();
        assert_eq!(result.total, 1);

        let app = &result.apps[0];
        assert_eq!(app.get_str("title").unwrap(), "Calculator Pro");
        assert!(!app.contains_key("description"));
        assert!(!app.contains_key("rating_breakdown"));
        assert!(!app.contains_key("screenshots"));
    }

    #[test]
    fn projection_does_not_change_filtering_or_ordering() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_many(vec![
                doc! { "_id": "a", "title": "Big App", "size": 90_i64, "description": "x" },
                doc! { "_id": "b", "title": "Small App", "size": 5_i64, "description": "y" },
            ])
            .unwrap();

        let engine = ListEngine::new(store);
        let raw = RawListParams {
            search: Some("app".to_string()),
            order: Some("asc".to_string()),
            ..Default::default()
        };
        let result = engine.query(&raw).unwrap();

        assert_eq!(result.total, 2);
        let ids: Vec<&str> = result
            .apps
            .iter()
            .map(|d| d.get_str("_id").unwrap())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn total_is_invariant_across_pagination() {
        let store = Arc::new(MemoryStore::new());
        let docs = (0..7)
            .map(|i| doc! { "_id": format!("app-{i}"), "title": "App", "size": i as i64 })
            .collect();
        store.insert_many(docs).unwrap();
        let engine = ListEngine::new(store);

        let totals: Vec<u64> = [("1", "0"), ("3", "2"), ("100", "6")]
            .iter()
            .map(|(limit, skip)| {
                let raw = RawListParams {
                    limit: Some(limit.to_string()),
                    skip: Some(skip.to_string()),
                    ..Default::default()
                };
                engine.query(&raw).unwrap().total
            })
            .collect();
        assert_eq!(totals, vec![7, 7, 7]);
    }

    #[test]
    fn page_walk_reconstructs_the_filtered_set_exactly_once() {
        // Tied sort values everywhere: every record shares size 10, so the
        // walk only comes back clean if the _id tie-break holds.
        let store = Arc::new(MemoryStore::new());
        let docs = (0..25)
            .map(|i| doc! { "_id": format!("app-{i:02}"), "title": "App", "size": 10_i64 })
            .collect();
        store.insert_many(docs).unwrap();
        let engine = ListEngine::new(store);

        let mut seen = Vec::new();
        let mut skip = 0;
        loop {
            let raw = RawListParams {
                limit: Some("4".to_string()),
                skip: Some(skip.to_string()),
                ..Default::default()
            };
            let page = engine.query(&raw).unwrap();
            if page.apps.is_empty() {
                break;
            }
            assert!(page.apps.len() <= 4);
            for app in &page.apps {
                seen.push(app.get_str("_id").unwrap().to_string());
            }
            skip += 4;
        }

        let mut expected: Vec<String> = (0..25).map(|i| format!("app-{i:02}")).collect();
        assert_eq!(seen.len(), 25, "no duplicates, no omissions");
        let mut sorted = seen.clone();
        sorted.sort();
        expected.sort();
        assert_eq!(sorted, expected);
    }
}
