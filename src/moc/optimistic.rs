use serde::Deserialize;

use crate::errors::AppError;
use crate::moc::collection::{Collection, SessionState};
use crate::moc::record::Payload;
use crate::moc::sink::{Level, StatusSink};
use crate::moc::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Both writes confirmed; local and remote agree.
    Moved,
    /// The move fell off either end of the list; nothing happened.
    OutOfBounds,
    /// A pending record was involved — moved locally only, persisted by the
    /// next save.
    LocalOnly,
}

/// Optimistic single-record mutations: apply locally first, fire the remote
/// write, roll back (or resynchronize) if the write fails.
impl<P: Payload> Collection<P> {
    /// Flip one record's publish flag. On remote failure the exact
    /// pre-mutation value is restored — no refetch, no flicker.
    pub fn toggle_published(
        &mut self,
        index: usize,
        store: &dyn RecordStore<P>,
        sink: &dyn StatusSink,
    ) -> Result<bool, AppError> {
        if P::PUBLISH_COLUMN.is_none() {
            return Err(AppError::NotFound);
        }
        let record = self.items.get(index).ok_or(AppError::NotFound)?;
        let previous = record.published.unwrap_or(false);
        let next = !previous;
        let id = record.id;

        self.items[index].published = Some(next);

        let Some(id) = id else {
            // Pending record: nothing to write yet.
            self.refresh_state();
            return Ok(next);
        };

        match store.set_published(id, next) {
            Ok(()) => {
                if let Some(snap) = self.snapshot.iter_mut().find(|s| s.id == Some(id)) {
                    snap.published = Some(next);
                }
                self.refresh_state();
                sink.notify(
                    Level::Success,
                    &format!("{} record {id} {}", P::TABLE, if next { "published" } else { "unpublished" }),
                );
                Ok(next)
            }
            Err(e) => {
                self.items[index].published = Some(previous);
                self.refresh_state();
                sink.notify(Level::Error, &format!("Publish toggle failed: {e}"));
                Err(AppError::Store(e))
            }
        }
    }

    /// Swap a record with its neighbour, exchanging order values, and push
    /// both writes to the store in sequence. If the second write fails after
    /// the first succeeded, a compensating revert of the first is attempted;
    /// if that also fails, local state is resynchronized from a fresh fetch
    /// so the UI never keeps showing an unconfirmed order.
    pub fn move_record(
        &mut self,
        index: usize,
        direction: Direction,
        store: &dyn RecordStore<P>,
        sink: &dyn StatusSink,
    ) -> Result<MoveOutcome, AppError> {
        if index >= self.items.len() {
            return Err(AppError::NotFound);
        }
        let neighbour = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => {
                let next = index + 1;
                (next < self.items.len()).then_some(next)
            }
        };
        let Some(neighbour) = neighbour else {
            return Ok(MoveOutcome::OutOfBounds);
        };

        let moved_id = self.items[index].id;
        let other_id = self.items[neighbour].id;
        let moved_order = self.items[index].order;
        let other_order = self.items[neighbour].order;

        self.swap_local(index, neighbour);

        let (Some(moved_id), Some(other_id)) = (moved_id, other_id) else {
            self.refresh_state();
            return Ok(MoveOutcome::LocalOnly);
        };

        // Write 1: the moved record takes its neighbour's slot.
        if let Err(e) = store.update_order(moved_id, other_order) {
            self.swap_local(neighbour, index);
            self.refresh_state();
            sink.notify(Level::Error, &format!("Reorder failed: {e}"));
            return Err(AppError::Store(e));
        }

        // Write 2: the neighbour takes the vacated slot.
        match store.update_order(other_id, moved_order) {
            Ok(()) => {
                for snap in self.snapshot.iter_mut() {
                    if snap.id == Some(moved_id) {
                        snap.order = other_order;
                    } else if snap.id == Some(other_id) {
                        snap.order = moved_order;
                    }
                }
                self.snapshot.sort_by_key(|r| (r.order, r.id));
                self.refresh_state();
                Ok(MoveOutcome::Moved)
            }
            Err(e) => {
                match store.update_order(moved_id, moved_order) {
                    Ok(()) => {
                        // Compensated: remote is back to the pre-move order.
                        self.swap_local(neighbour, index);
                        self.refresh_state();
                        sink.notify(Level::Error, &format!("Reorder failed: {e}"));
                    }
                    Err(_) => {
                        // Half-applied swap remains remotely; a refetch is
                        // the only state both sides can agree on.
                        sink.notify(
                            Level::Error,
                            &format!("Reorder failed and could not be reverted, resyncing: {e}"),
                        );
                        self.resync(store, sink);
                    }
                }
                Err(AppError::Store(e))
            }
        }
    }

    /// Replace local state with a fresh fetch. Falls back to reverting the
    /// local swap if even the fetch fails.
    fn resync(&mut self, store: &dyn RecordStore<P>, sink: &dyn StatusSink) {
        match store.fetch_all() {
            Ok(fresh) => {
                self.items = fresh.clone();
                self.snapshot = fresh;
                self.state = SessionState::Clean;
            }
            Err(e) => {
                sink.notify(Level::Error, &format!("Resync fetch failed: {e}"));
                self.discard();
            }
        }
    }

    /// Exchange both the order values and the vector positions of two
    /// records. Calling it twice with the same indices restores the original
    /// arrangement.
    fn swap_local(&mut self, a: usize, b: usize) {
        let order_a = self.items[a].order;
        let order_b = self.items[b].order;
        self.items[a].order = order_b;
        self.items[b].order = order_a;
        self.items.swap(a, b);
    }
}
