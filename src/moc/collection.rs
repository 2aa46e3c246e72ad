use std::collections::HashSet;

use crate::errors::{AppError, StoreError};
use crate::moc::record::{OrderedRecord, Payload, RecordId, SaveStrategy};
use crate::moc::sink::{Level, StatusSink};
use crate::moc::store::RecordStore;

/// Editing-session state of a collection.
///
/// Clean: local list equals the last fetched/saved snapshot. Dirty: local
/// edits await a save. Saving: a persist is in flight — further edits are
/// accepted, a second save attempt is rejected (not queued).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Clean,
    Dirty,
    Saving,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub deleted: usize,
    pub upserted: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SaveReport),
    NoChanges,
    InFlight,
}

pub(crate) struct CollectionDiff<P> {
    pub to_delete: Vec<RecordId>,
    pub to_upsert: Vec<OrderedRecord<P>>,
}

impl<P> CollectionDiff<P> {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_upsert.is_empty()
    }
}

/// The single source of truth for one ordered collection during an editing
/// session. Holds the authoritative local list plus the snapshot it diffs
/// against, and converges the remote table to the local list on save.
pub struct Collection<P: Payload> {
    pub(crate) items: Vec<OrderedRecord<P>>,
    pub(crate) snapshot: Vec<OrderedRecord<P>>,
    pub(crate) state: SessionState,
    strategy: SaveStrategy,
}

impl<P: Payload> Collection<P> {
    /// Fetch the remote state and open a Clean session on it.
    pub fn load(store: &dyn RecordStore<P>) -> Result<Self, StoreError> {
        let items = store.fetch_all()?;
        Ok(Collection {
            snapshot: items.clone(),
            items,
            state: SessionState::Clean,
            strategy: P::STRATEGY,
        })
    }

    /// An empty session with nothing fetched. Useful for brand-new
    /// collections and for tests.
    pub fn empty() -> Self {
        Collection {
            items: Vec::new(),
            snapshot: Vec::new(),
            state: SessionState::Clean,
            strategy: P::STRATEGY,
        }
    }

    pub fn items(&self) -> &[OrderedRecord<P>] {
        &self.items
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SessionState::Dirty
    }

    /// Recompute Clean/Dirty from the snapshot. Adding then removing a
    /// pending record lands back on Clean, so a save issues zero calls.
    pub(crate) fn refresh_state(&mut self) {
        if self.state != SessionState::Saving {
            self.state = if self.items == self.snapshot {
                SessionState::Clean
            } else {
                SessionState::Dirty
            };
        }
    }

    /// Append a pending record. Its order is seeded past the current maximum
    /// — sparse until the next save realigns order with index.
    pub fn push(&mut self, payload: P) -> usize {
        let next_order = self.items.iter().map(|r| r.order).max().map_or(0, |m| m + 1);
        self.items.push(OrderedRecord::pending(payload, next_order));
        self.refresh_state();
        self.items.len() - 1
    }

    pub fn insert_at(&mut self, index: usize, payload: P) {
        let index = index.min(self.items.len());
        let next_order = self.items.iter().map(|r| r.order).max().map_or(0, |m| m + 1);
        self.items
            .insert(index, OrderedRecord::pending(payload, next_order));
        self.refresh_state();
    }

    pub fn remove(&mut self, index: usize) -> Option<OrderedRecord<P>> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.refresh_state();
        Some(removed)
    }

    pub fn update_payload(&mut self, index: usize, payload: P) -> bool {
        let Some(record) = self.items.get_mut(index) else {
            return false;
        };
        record.payload = payload;
        self.refresh_state();
        true
    }

    /// Flip the publish flag locally without touching the store. The
    /// optimistic remote variant lives in `moc::optimistic`.
    pub fn set_published_local(&mut self, index: usize, published: bool) -> bool {
        let Some(record) = self.items.get_mut(index) else {
            return false;
        };
        record.published = Some(published);
        self.refresh_state();
        true
    }

    /// Move a record from one position to another — the abstract form of a
    /// drag-and-drop. Order values are realigned on the next save.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        let record = self.items.remove(from);
        self.items.insert(to, record);
        self.refresh_state();
        true
    }

    /// Adopt a full desired list (the admin client submits the whole edited
    /// collection); the snapshot keeps serving as the diff baseline. A
    /// persisted record submitted without its publish flag inherits the
    /// snapshot's flag instead of defaulting to unpublished.
    pub fn set_items(&mut self, mut items: Vec<OrderedRecord<P>>) {
        for item in &mut items {
            if item.published.is_none()
                && let Some(id) = item.id
                && let Some(snap) = self.snapshot.iter().find(|s| s.id == Some(id))
            {
                item.published = snap.published;
            }
        }
        self.items = items;
        self.refresh_state();
    }

    /// Drop local edits and restore the snapshot.
    pub fn discard(&mut self) {
        self.items = self.snapshot.clone();
        self.state = SessionState::Clean;
    }

    /// Snapshot ids absent locally get deleted; pending records and records
    /// whose payload, publish flag, or order-vs-index changed get upserted
    /// with order = current array index. Never touches untouched records.
    pub(crate) fn diff(&self) -> CollectionDiff<P> {
        let current_ids: HashSet<RecordId> = self.items.iter().filter_map(|r| r.id).collect();
        let to_delete: Vec<RecordId> = self
            .snapshot
            .iter()
            .filter_map(|r| r.id)
            .filter(|id| !current_ids.contains(id))
            .collect();

        let mut to_upsert = Vec::new();
        for (index, record) in self.items.iter().enumerate() {
            let target_order = index as i64;
            let changed = match record.id {
                None => true,
                Some(id) => match self.snapshot.iter().find(|s| s.id == Some(id)) {
                    Some(snap) => {
                        snap.payload != record.payload
                            || snap.published != record.published
                            || snap.order != target_order
                    }
                    None => true,
                },
            };
            if changed {
                let mut row = record.clone();
                row.order = target_order;
                to_upsert.push(row);
            }
        }

        CollectionDiff { to_delete, to_upsert }
    }

    /// Persist local state. Validation runs first and aborts before any
    /// remote call; an empty diff returns `NoChanges` without touching the
    /// store. On success the remote state is refetched as the new baseline;
    /// on failure the session stays Dirty so the user can retry or discard.
    pub fn save(
        &mut self,
        store: &dyn RecordStore<P>,
        sink: &dyn StatusSink,
    ) -> Result<SaveOutcome, AppError> {
        if self.state == SessionState::Saving {
            return Ok(SaveOutcome::InFlight);
        }
        for record in &self.items {
            record.payload.validate()?;
        }

        let report = match self.strategy {
            SaveStrategy::DiffByRecord => {
                let diff = self.diff();
                if diff.is_empty() {
                    self.state = SessionState::Clean;
                    return Ok(SaveOutcome::NoChanges);
                }
                self.state = SessionState::Saving;
                let report = SaveReport {
                    deleted: diff.to_delete.len(),
                    upserted: diff.to_upsert.len(),
                };
                // Deletes first: frees order slots before upserts claim them.
                let result = (|| {
                    for id in &diff.to_delete {
                        store.delete_one(*id)?;
                    }
                    store.upsert_many(&diff.to_upsert)
                })();
                if let Err(e) = result {
                    return self.fail_save(sink, e);
                }
                report
            }
            SaveStrategy::ReplaceAll => {
                if self.items == self.snapshot {
                    return Ok(SaveOutcome::NoChanges);
                }
                self.state = SessionState::Saving;
                let report = SaveReport {
                    deleted: self.snapshot.len(),
                    upserted: self.items.len(),
                };
                // Destructive by construction: a failed insert after the
                // delete leaves the table holding only the inserted prefix
                // until the save is retried.
                let result = (|| {
                    store.delete_all()?;
                    for (index, record) in self.items.iter().enumerate() {
                        let mut row = record.clone();
                        row.id = None;
                        row.order = index as i64;
                        store.insert(&row)?;
                    }
                    Ok::<(), StoreError>(())
                })();
                if let Err(e) = result {
                    return self.fail_save(sink, e);
                }
                report
            }
        };

        // Committed: refetch as the new baseline.
        match store.fetch_all() {
            Ok(fresh) => {
                self.items = fresh.clone();
                self.snapshot = fresh;
                self.state = SessionState::Clean;
                sink.notify(
                    Level::Success,
                    &format!(
                        "Saved {}: {} deleted, {} written",
                        P::TABLE,
                        report.deleted,
                        report.upserted
                    ),
                );
                Ok(SaveOutcome::Saved(report))
            }
            Err(e) => self.fail_save(sink, e),
        }
    }

    fn fail_save(
        &mut self,
        sink: &dyn StatusSink,
        error: StoreError,
    ) -> Result<SaveOutcome, AppError> {
        self.state = SessionState::Dirty;
        sink.notify(
            Level::Error,
            &format!("Saving {} failed: {error}", P::TABLE),
        );
        Err(AppError::Store(error))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::models::Page;

    /// Counts every store call and fails it. A count of zero proves an
    /// operation never reached the store.
    struct RejectingStore {
        calls: Cell<usize>,
    }

    impl RejectingStore {
        fn new() -> Self {
            RejectingStore {
                calls: Cell::new(0),
            }
        }

        fn touch(&self) -> StoreError {
            self.calls.set(self.calls.get() + 1);
            StoreError::NotFound
        }
    }

    impl RecordStore<Page> for RejectingStore {
        fn fetch_all(&self) -> Result<Vec<OrderedRecord<Page>>, StoreError> {
            Err(self.touch())
        }

        fn insert(&self, _: &OrderedRecord<Page>) -> Result<RecordId, StoreError> {
            Err(self.touch())
        }

        fn update(&self, _: RecordId, _: &OrderedRecord<Page>) -> Result<(), StoreError> {
            Err(self.touch())
        }

        fn update_order(&self, _: RecordId, _: i64) -> Result<(), StoreError> {
            Err(self.touch())
        }

        fn set_published(&self, _: RecordId, _: bool) -> Result<(), StoreError> {
            Err(self.touch())
        }

        fn delete_one(&self, _: RecordId) -> Result<(), StoreError> {
            Err(self.touch())
        }

        fn delete_all(&self) -> Result<(), StoreError> {
            Err(self.touch())
        }

        fn upsert_many(&self, _: &[OrderedRecord<Page>]) -> Result<(), StoreError> {
            Err(self.touch())
        }
    }

    struct SilentSink;

    impl StatusSink for SilentSink {
        fn notify(&self, _: Level, _: &str) {}

        fn confirm(&self, _: &str, on_confirm: Box<dyn FnOnce() + '_>) {
            on_confirm();
        }
    }

    fn page(slug: &str) -> Page {
        Page {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            content: String::new(),
            is_original_page: false,
        }
    }

    fn persisted(id: RecordId, slug: &str, order: i64) -> OrderedRecord<Page> {
        OrderedRecord {
            id: Some(id),
            payload: page(slug),
            order,
            published: Some(false),
        }
    }

    fn session(snapshot: Vec<OrderedRecord<Page>>) -> Collection<Page> {
        let mut collection = Collection::empty();
        collection.items = snapshot.clone();
        collection.snapshot = snapshot;
        collection
    }

    #[test]
    fn diff_of_untouched_session_is_empty() {
        let collection = session(vec![persisted(1, "home", 0), persisted(2, "about", 1)]);
        assert!(collection.diff().is_empty());
    }

    #[test]
    fn removed_id_is_deleted_and_successor_reordered() {
        let mut collection = session(vec![
            persisted(1, "home", 0),
            persisted(2, "about", 1),
            persisted(3, "blog", 2),
        ]);
        collection.remove(1);

        let diff = collection.diff();
        assert_eq!(diff.to_delete, vec![2]);
        // Only the record that slid into the vacated slot is rewritten.
        assert_eq!(diff.to_upsert.len(), 1);
        assert_eq!(diff.to_upsert[0].id, Some(3));
        assert_eq!(diff.to_upsert[0].order, 1);
    }

    #[test]
    fn pending_records_are_upserted_never_deleted() {
        let mut collection = session(vec![persisted(1, "home", 0)]);
        collection.push(page("new"));

        let diff = collection.diff();
        assert!(diff.to_delete.is_empty());
        assert_eq!(diff.to_upsert.len(), 1);
        assert_eq!(diff.to_upsert[0].id, None);
        assert_eq!(diff.to_upsert[0].order, 1);
    }

    #[test]
    fn reorder_rewrites_orders_to_indices() {
        let mut collection = session(vec![
            persisted(1, "home", 0),
            persisted(2, "about", 1),
            persisted(3, "blog", 2),
        ]);
        collection.reorder(0, 2);

        let diff = collection.diff();
        assert!(diff.to_delete.is_empty());
        let orders: Vec<(Option<RecordId>, i64)> =
            diff.to_upsert.iter().map(|r| (r.id, r.order)).collect();
        assert_eq!(orders, vec![(Some(2), 0), (Some(3), 1), (Some(1), 2)]);
    }

    #[test]
    fn save_while_one_is_in_flight_is_rejected() {
        let mut collection = session(vec![persisted(1, "home", 0)]);
        collection.push(page("new"));
        collection.state = SessionState::Saving;

        let store = RejectingStore::new();
        let outcome = collection
            .save(&store, &SilentSink)
            .expect("rejected, not queued");
        assert_eq!(outcome, SaveOutcome::InFlight);
        assert_eq!(store.calls.get(), 0);
        assert_eq!(collection.state(), SessionState::Saving);
    }

    #[test]
    fn insert_at_clamps_index_and_seeds_order_past_max() {
        let mut collection = session(vec![persisted(1, "home", 0), persisted(2, "about", 1)]);
        collection.insert_at(1, page("mid"));
        assert_eq!(collection.items()[1].id, None);
        assert_eq!(collection.items()[1].order, 2);

        collection.insert_at(99, page("tail"));
        assert_eq!(collection.items()[3].payload.slug, "tail");
        assert!(collection.is_dirty());
    }

    #[test]
    fn local_publish_flip_marks_the_record_for_upsert() {
        let mut collection = session(vec![persisted(1, "home", 0)]);
        assert!(collection.set_published_local(0, true));
        assert!(collection.is_dirty());
        assert!(!collection.set_published_local(5, true));

        let diff = collection.diff();
        assert!(diff.to_delete.is_empty());
        assert_eq!(diff.to_upsert.len(), 1);
        assert_eq!(diff.to_upsert[0].published, Some(true));
    }

    #[test]
    fn submitted_list_without_publish_flags_inherits_snapshot() {
        let mut published_home = persisted(1, "home", 0);
        published_home.published = Some(true);
        let mut collection = session(vec![published_home]);

        let mut submitted = collection.items().to_vec();
        submitted[0].published = None;
        collection.set_items(submitted);

        assert_eq!(collection.items()[0].published, Some(true));
        assert_eq!(collection.state(), SessionState::Clean);
        assert!(collection.diff().is_empty());
    }

    #[test]
    fn add_then_remove_pending_returns_to_clean() {
        let mut collection = session(vec![persisted(1, "home", 0)]);
        let index = collection.push(page("ghost"));
        assert!(collection.is_dirty());
        collection.remove(index);
        assert_eq!(collection.state(), SessionState::Clean);
        assert!(collection.diff().is_empty());
    }
}
