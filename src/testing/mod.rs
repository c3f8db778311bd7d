//! In-memory stand-ins for the storage seams, used by unit tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::database::DatabaseError;
use crate::importer::cells::{CellValue, SheetGrid};
use crate::importer::columns::ImportColumn;
use crate::importer::{TeacherCandidate, TeacherSink, UsernameDirectory};

/// Username directory and teacher sink over plain collections. Persisting
/// is all-or-nothing, like the PostgreSQL store.
#[derive(Default)]
pub struct MemoryTeacherStore {
    usernames: Mutex<HashSet<String>>,
    persisted: Mutex<Vec<TeacherCandidate>>,
    batches: Mutex<Vec<usize>>,
    lookups: AtomicUsize,
    fail_lookups: AtomicBool,
    fail_persist: AtomicBool,
}

impl MemoryTeacherStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_usernames<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::default();
        store
            .usernames
            .lock()
            .unwrap()
            .extend(names.into_iter().map(Into::into));
        store
    }

    pub fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    /// Make every persist fail after staging, leaving nothing stored
    pub fn fail_persist(&self) {
        self.fail_persist.store(true, Ordering::SeqCst);
    }

    pub fn persisted(&self) -> Vec<TeacherCandidate> {
        self.persisted.lock().unwrap().clone()
    }

    pub fn persisted_count(&self) -> usize {
        self.persisted.lock().unwrap().len()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UsernameDirectory for MemoryTeacherStore {
    async fn username_exists(&self, user_name: &str) -> Result<bool, DatabaseError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError("lookup failed".into()));
        }
        Ok(self.usernames.lock().unwrap().contains(user_name))
    }
}

#[async_trait]
impl TeacherSink for MemoryTeacherStore {
    async fn persist(&self, candidates: &[TeacherCandidate], batch_size: usize) -> Result<usize, DatabaseError> {
        let mut staged = Vec::new();
        let mut sizes = Vec::new();
        let taken = self.usernames.lock().unwrap().clone();
        let mut seen = HashSet::new();

        for chunk in candidates.chunks(batch_size.max(1)) {
            for candidate in chunk {
                let name = &candidate.user.user_name;
                if taken.contains(name) || !seen.insert(name.clone()) {
                    return Err(DatabaseError::Conflict(format!("duplicate user_name {}", name)));
                }
                staged.push(candidate.clone());
            }
            sizes.push(chunk.len());
        }

        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError("insert failed".into()));
        }

        let count = staged.len();
        self.usernames
            .lock()
            .unwrap()
            .extend(staged.iter().map(|c| c.user.user_name.clone()));
        self.persisted.lock().unwrap().extend(staged);
        self.batches.lock().unwrap().extend(sizes);
        Ok(count)
    }
}

/// Row cells from literals; `""` is an empty cell.
pub fn row_cells(values: &[&str]) -> Vec<CellValue> {
    values
        .iter()
        .map(|v| {
            if v.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(v.to_string())
            }
        })
        .collect()
}

/// Sheet with the import headers followed by `rows`.
pub fn grid(rows: &[Vec<&str>]) -> SheetGrid {
    let header = ImportColumn::ALL
        .iter()
        .map(|c| CellValue::Text(c.label().to_string()))
        .collect();
    let mut all = vec![header];
    all.extend(rows.iter().map(|r| row_cells(r)));
    SheetGrid {
        name: "Sheet1".to_string(),
        rows: all,
    }
}
