//! Per-thread stack of active logging scopes.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::template::StructuredRecord;

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

struct Frame {
    id: u64,
    record: Arc<StructuredRecord>,
}

thread_local! {
    static SCOPES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Keeps a scope open; dropping it removes exactly this scope from the
/// current thread's stack.
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct ScopeGuard {
    id: u64,
    record: Arc<StructuredRecord>,
    // Scopes belong to the thread that opened them.
    _thread: PhantomData<*const ()>,
}

impl ScopeGuard {
    pub fn record(&self) -> &StructuredRecord {
        &self.record
    }
}

impl std::fmt::Debug for ScopeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("id", &self.id)
            .field("template", &self.record.template())
            .finish()
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let id = self.id;
        let _ = SCOPES.try_with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            if let Some(pos) = scopes.iter().rposition(|frame| frame.id == id) {
                scopes.remove(pos);
                log::trace!("closed scope {id}, depth {}", scopes.len());
            }
        });
    }
}

pub fn push(record: StructuredRecord) -> ScopeGuard {
    let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
    let record = Arc::new(record);
    SCOPES.with(|scopes| {
        let mut scopes = scopes.borrow_mut();
        scopes.push(Frame {
            id,
            record: Arc::clone(&record),
        });
        log::trace!("opened scope {id}, depth {}", scopes.len());
    });
    ScopeGuard {
        id,
        record,
        _thread: PhantomData,
    }
}

/// Active scopes of the current thread, innermost first.
pub fn snapshot() -> Vec<Arc<StructuredRecord>> {
    SCOPES.with(|scopes| {
        scopes
            .borrow()
            .iter()
            .rev()
            .map(|frame| Arc::clone(&frame.record))
            .collect()
    })
}

pub fn depth() -> usize {
    SCOPES.with(|scopes| scopes.borrow().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{interpolated, template::compile};
    use std::thread;

    fn record(text: &'static str) -> StructuredRecord {
        compile(interpolated!(text)).expect("compile")
    }

    #[test]
    fn snapshot_is_innermost_first() {
        let _outer = push(record("A"));
        let _inner = push(record("B"));
        let templates: Vec<_> = snapshot().iter().map(|r| r.template().to_string()).collect();
        assert_eq!(templates, vec!["B", "A"]);
    }

    #[test]
    fn out_of_order_drop_removes_only_its_frame() {
        let outer = push(record("A"));
        let inner = push(record("B"));
        drop(outer);
        assert_eq!(depth(), 1);
        assert_eq!(snapshot()[0].template(), "B");
        drop(inner);
        assert_eq!(depth(), 0);
    }

    #[test]
    fn scopes_pop_during_unwinding() {
        let result = std::panic::catch_unwind(|| {
            let _guard = push(record("A"));
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(depth(), 0);
    }

    #[test]
    fn threads_do_not_share_scopes() {
        let _guard = push(record("main"));
        let seen = thread::spawn(depth).join().expect("thread");
        assert_eq!(seen, 0);
        assert_eq!(depth(), 1);
    }
}
