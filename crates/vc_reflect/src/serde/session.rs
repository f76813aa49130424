use alloc::vec::Vec;
use core::cell::RefCell;

use crate::serde::{NotSupported, SerdeOptions};

struct Session {
    options: SerdeOptions,
    failure: Option<NotSupported>,
}

std::thread_local! {
    static SESSIONS: RefCell<Vec<Session>> = const { RefCell::new(Vec::new()) };
}

/// Pops its session when dropped.
pub(super) struct SessionGuard(());

impl SessionGuard {
    pub(super) fn enter(options: SerdeOptions) -> Self {
        SESSIONS.with_borrow_mut(|sessions| {
            sessions.push(Session {
                options,
                failure: None,
            });
        });
        Self(())
    }

    /// The first failure reported in this session.
    pub(super) fn take_failure(&self) -> Option<NotSupported> {
        SESSIONS.with_borrow_mut(|sessions| {
            sessions
                .last_mut()
                .and_then(|session| session.failure.take())
        })
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        SESSIONS.with_borrow_mut(|sessions| {
            sessions.pop();
        });
    }
}

/// Options of the innermost session of this thread.
pub(super) fn current() -> Result<SerdeOptions, NotSupported> {
    SESSIONS
        .with_borrow(|sessions| sessions.last().map(|session| session.options.clone()))
        .ok_or(NotSupported::NoSession)
}

/// Runs `f`, forgetting the failures it reported if it succeeds.
///
/// A caller such as an untagged enum may try a `Poly` value, recover
/// from its failure and go on. Failures recorded before `f` are kept.
pub(super) fn recover<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    let clean = SESSIONS.with_borrow(|sessions| {
        sessions
            .last()
            .is_none_or(|session| session.failure.is_none())
    });
    let result = f();
    if clean && result.is_ok() {
        SESSIONS.with_borrow_mut(|sessions| {
            if let Some(session) = sessions.last_mut() {
                session.failure = None;
            }
        });
    }
    result
}

/// Records `err` in the innermost session, the first record wins.
pub(super) fn report(err: NotSupported) -> NotSupported {
    tracing::debug!(error = %err, "serde operation not supported");
    SESSIONS.with_borrow_mut(|sessions| {
        if let Some(session) = sessions.last_mut() {
            session.failure.get_or_insert_with(|| err.clone());
        }
    });
    err
}
