//! Per-thread current-session stack.
//!
//! Nested translation code asks for "the session in use" instead of taking
//! one as a parameter. Each thread owns one stack per registry, created on
//! first push and dropped again once empty.

use roibridge_core::SessionError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use super::Session;

thread_local! {
    static STACKS: RefCell<HashMap<u64, Vec<Arc<Session>>>> = RefCell::new(HashMap::new());
}

pub(crate) fn push(registry: u64, session: Arc<Session>) {
    STACKS.with(|stacks| stacks.borrow_mut().entry(registry).or_default().push(session));
}

pub(crate) fn pop(registry: u64) -> Result<Arc<Session>, SessionError> {
    STACKS.with(|stacks| {
        let mut stacks = stacks.borrow_mut();
        let stack = stacks.get_mut(&registry).ok_or(SessionError::EmptySessionStack)?;
        let session = stack.pop().ok_or(SessionError::EmptySessionStack)?;
        if stack.is_empty() {
            stacks.remove(&registry);
        }
        Ok(session)
    })
}

pub(crate) fn peek(registry: u64) -> Result<Arc<Session>, SessionError> {
    STACKS.with(|stacks| {
        stacks
            .borrow()
            .get(&registry)
            .and_then(|stack| stack.last().cloned())
            .ok_or(SessionError::NoActiveSession { endpoint: None })
    })
}

pub(crate) fn depth(registry: u64) -> usize {
    STACKS.with(|stacks| stacks.borrow().get(&registry).map_or(0, Vec::len))
}

/// Keeps a session current on this thread until dropped
///
/// Created by [`SessionRegistry::enter`](super::registry::SessionRegistry::enter).
/// Scopes nest; dropping one restores the session that was current before.
#[must_use = "the session stops being current when the scope is dropped"]
pub struct SessionScope {
    registry: u64,
    session: Arc<Session>,
    _thread_bound: PhantomData<*const ()>,
}

impl SessionScope {
    pub(crate) fn new(registry: u64, session: Arc<Session>) -> Self {
        push(registry, session.clone());
        Self {
            registry,
            session,
            _thread_bound: PhantomData,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}

impl Drop for SessionScope {
    fn drop(&mut self) {
        match pop(self.registry) {
            Ok(popped) if Arc::ptr_eq(&popped, &self.session) => {}
            Ok(popped) => tracing::warn!(
                expected = %self.session.id(),
                popped = %popped.id(),
                "Session scope closed out of order"
            ),
            Err(_) => tracing::warn!(
                session = %self.session.id(),
                "Session scope closed on an empty stack"
            ),
        }
    }
}
