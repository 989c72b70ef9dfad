//! Generic keyed registry

use parking_lot::RwLock;
use playdeck_api_types::{
    Host, IdSequence, ManagedFile, Notification, RecordId, Role, Template,
};

use crate::error::{StorageError, StorageResult};

/// A record that a [`Registry`] can key by identifier
pub trait Record: Clone + Send + Sync + 'static {
    /// Human readable kind used in not-found errors
    const KIND: &'static str;

    fn id(&self) -> RecordId;

    fn assign_id(&mut self, id: RecordId);
}

struct Table<T> {
    ids: IdSequence,
    items: Vec<T>,
}

impl<T: Record> Table<T> {
    // Items are appended with increasing ids, so the vector stays sorted by id.
    fn position(&self, id: RecordId) -> Option<usize> {
        self.items.binary_search_by_key(&id, |item| item.id()).ok()
    }
}

/// In-memory, insertion-ordered collection guarded by a single lock
///
/// Reads and read-modify-write updates each take the lock once, so a reader
/// always observes a record either before or after an update, never half of it.
pub struct Registry<T> {
    table: RwLock<Table<T>>,
}

impl<T: Record> Registry<T> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                ids: IdSequence::new(),
                items: Vec::new(),
            }),
        }
    }

    /// Store `item` under the next identifier and return the stored copy
    pub fn insert(&self, mut item: T) -> T {
        let mut table = self.table.write();
        item.assign_id(table.ids.next_id());
        table.items.push(item.clone());
        item
    }

    /// Build the record from its freshly assigned identifier and store it
    pub fn insert_with(&self, build: impl FnOnce(RecordId) -> T) -> T {
        let mut table = self.table.write();
        let item = build(table.ids.next_id());
        table.items.push(item.clone());
        item
    }

    pub fn get(&self, id: RecordId) -> StorageResult<T> {
        let table = self.table.read();
        table
            .position(id)
            .map(|idx| table.items[idx].clone())
            .ok_or_else(|| StorageError::not_found(T::KIND, id))
    }

    /// All records in insertion order
    pub fn list(&self) -> Vec<T> {
        self.table.read().items.clone()
    }

    /// Records matching `predicate`, in insertion order
    pub fn list_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.table
            .read()
            .items
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Apply `change` to the record with `id` under the write lock
    pub fn update(&self, id: RecordId, change: impl FnOnce(&mut T)) -> StorageResult<T> {
        let mut table = self.table.write();
        let idx = table
            .position(id)
            .ok_or_else(|| StorageError::not_found(T::KIND, id))?;
        let item = &mut table.items[idx];
        change(item);
        // The identifier is owned by the registry.
        item.assign_id(id);
        Ok(item.clone())
    }

    pub fn len(&self) -> usize {
        self.table.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Record> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! impl_record {
    ($ty:ty, $kind:literal) => {
        impl Record for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> RecordId {
                self.id
            }

            fn assign_id(&mut self, id: RecordId) {
                self.id = id;
            }
        }
    };
}

impl_record!(Host, "Host");
impl_record!(Role, "Role");
impl_record!(ManagedFile, "File");
impl_record!(Notification, "Notification");
impl_record!(Template, "Template");
