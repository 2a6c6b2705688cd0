use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use bson::{Bson, Document};
use imbl::OrdMap;

use appdex_query::{Filter, ListQuery, SortDirection};

use crate::error::StoreError;
use crate::store::AppStore;

type Docs = OrdMap<String, Document>;

/// In-memory document store keyed by string `_id`.
///
/// Documents live in an immutable ordered map behind an `ArcSwap`; each read
/// takes a snapshot (cheap due to structural sharing) and never blocks
/// writers. Two consecutive reads may see different snapshots.
pub struct MemoryStore {
    docs: ArcSwap<Docs>,
    write_lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: ArcSwap::new(Arc::new(OrdMap::new())),
            write_lock: Mutex::new(()),
        }
    }

    /// Insert documents keyed by their string `_id`. An existing id is
    /// replaced. Returns the number of documents written.
    pub fn insert_many(&self, docs: Vec<Document>) -> Result<usize, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Storage(format!("write lock poisoned: {e}")))?;

        let mut data = (**self.docs.load()).clone();
        let written = docs.len();
        for doc in docs {
            let id = doc
                .get_str("_id")
                .map_err(|_| StoreError::MissingId)?
                .to_string();
            data.insert(id, doc);
        }
        self.docs.store(Arc::new(data));
        Ok(written)
    }

    fn snapshot(&self) -> Arc<Docs> {
        self.docs.load_full()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore for MemoryStore {
    fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        let snapshot = self.snapshot();
        Ok(snapshot.values().filter(|doc| matches(filter, doc)).count() as u64)
    }

    fn find(&self, query: &ListQuery) -> Result<Vec<Document>, StoreError> {
        let snapshot = self.snapshot();
        let mut records: Vec<(&String, &Document)> = snapshot
            .iter()
            .filter(|(_, doc)| matches(&query.filter, doc))
            .collect();

        let field = query.sort.field.as_str();
        records.sort_by(|(a_id, a), (b_id, b)| {
            let ord = compare_field_values(a.get(field), b.get(field));
            let ord = match query.sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            // Ascending _id tie-break keeps the order total; without it,
            // records sharing a sort value can repeat or vanish across pages.
            if ord != Ordering::Equal {
                ord
            } else {
                a_id.cmp(b_id)
            }
        });

        let page = records.into_iter().skip(query.skip);
        let docs = match query.limit {
            Some(limit) => page.take(limit).map(|(_, doc)| doc.clone()).collect(),
            None => page.map(|(_, doc)| doc.clone()).collect(),
        };
        Ok(docs)
    }
}

/// Evaluate a filter against a full document.
fn matches(filter: &Filter, doc: &Document) -> bool {
    match filter {
        Filter::All => true,
        Filter::IContains { field, value } => match doc.get_str(field) {
            Ok(text) => text.to_lowercase().contains(&value.to_lowercase()),
            Err(_) => false,
        },
    }
}

/// Compare two optional field values for sorting. Missing and null sort
/// together, before any present value in ascending order.
fn compare_field_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (None, None)
        | (Some(Bson::Null), None)
        | (None, Some(Bson::Null))
        | (Some(Bson::Null), Some(Bson::Null)) => Ordering::Equal,
        (None, Some(_)) | (Some(Bson::Null), Some(_)) => Ordering::Less,
        (Some(_), None) | (Some(_), Some(Bson::Null)) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn compare_values(a: &Bson, b: &Bson) -> Ordering {
    match (a, b) {
        (Bson::String(a), Bson::String(b)) => a.cmp(b),
        (Bson::Int32(a), Bson::Int32(b)) => a.cmp(b),
        (Bson::Int64(a), Bson::Int64(b)) => a.cmp(b),
        (Bson::Int32(a), Bson::Int64(b)) => (*a as i64).cmp(b),
        (Bson::Int64(a), Bson::Int32(b)) => a.cmp(&(*b as i64)),
        (Bson::Double(a), Bson::Double(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Bson::Double(a), Bson::Int64(b)) => {
            a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
        }
        (Bson::Double(a), Bson::Int32(b)) => {
            a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
        }
        (Bson::Int64(a), Bson::Double(b)) => {
            (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (Bson::Int32(a), Bson::Double(b)) => {
            (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
        (Bson::DateTime(a), Bson::DateTime(b)) => {
            a.timestamp_millis().cmp(&b.timestamp_millis())
        }
        _ => Ordering::Equal,
    }
}
