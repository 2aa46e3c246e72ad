use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Warning,
}

/// User-feedback boundary of the collection machinery.
///
/// `notify` is fire-and-forget. `confirm` hands the destructive action to the
/// collaborator, which invokes it only if the user accepts — possibly later,
/// possibly never. Callers must not assume the closure ran synchronously.
pub trait StatusSink {
    fn notify(&self, level: Level, message: &str);

    fn confirm(&self, message: &str, on_confirm: Box<dyn FnOnce() + '_>);
}

/// Production sink: routes notifications into the process log. Confirms are
/// accepted immediately — the admin API is only reached after the operator
/// already confirmed in their client.
pub struct LogSink;

impl StatusSink for LogSink {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success => log::info!("{message}"),
            Level::Warning => log::warn!("{message}"),
            Level::Error => log::error!("{message}"),
        }
    }

    fn confirm(&self, message: &str, on_confirm: Box<dyn FnOnce() + '_>) {
        log::info!("Confirmed: {message}");
        on_confirm();
    }
}

/// Run `action` only if the sink confirms. Returns `None` when the sink
/// declined (or deferred past this call), in which case `action` never ran.
pub fn confirm_destructive<R>(
    sink: &dyn StatusSink,
    message: &str,
    action: impl FnOnce() -> R,
) -> Option<R> {
    let outcome: Cell<Option<R>> = Cell::new(None);
    sink.confirm(message, Box::new(|| outcome.set(Some(action()))));
    outcome.into_inner()
}
