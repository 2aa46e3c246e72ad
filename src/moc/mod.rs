//! Managed ordered collections.
//!
//! One generic implementation of the pattern every admin section shares:
//! hold an ordered list locally, accept add/remove/edit/reorder/publish
//! edits, and converge the backing table to the local list with as few
//! writes as the chosen strategy allows. Instantiated per domain type via
//! the [`Payload`] trait.

pub mod collection;
pub mod optimistic;
pub mod record;
pub mod sink;
pub mod store;

pub use collection::{Collection, SaveOutcome, SaveReport, SessionState};
pub use optimistic::{Direction, MoveOutcome};
pub use record::{OrderedRecord, Payload, RecordId, SaveStrategy};
pub use sink::{Level, LogSink, StatusSink, confirm_destructive};
pub use store::{RecordStore, SqliteStore};
