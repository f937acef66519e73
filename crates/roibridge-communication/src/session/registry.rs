//! Session registry.
//!
//! Caches at most one session per server endpoint. Each endpoint has its own
//! slot lock, so concurrent first requests for one endpoint create exactly
//! one session while other endpoints proceed independently.

use parking_lot::Mutex;
use roibridge_core::{thread_safe_none, Result, SessionError, ThreadSafeOption};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::current::{self, SessionScope};
use super::Session;
use crate::client::RemoteClient;
use crate::endpoint::{Credentials, Endpoint};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

type Slot = ThreadSafeOption<Arc<Session>>;

/// One cached session per server endpoint
pub struct SessionRegistry {
    id: u64,
    client: Arc<dyn RemoteClient>,
    slots: Mutex<HashMap<Endpoint, Slot>>,
}

impl SessionRegistry {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            client,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &Arc<dyn RemoteClient> {
        &self.client
    }

    /// The cached session for `endpoint`, after a liveness check
    pub fn session(&self, endpoint: &Endpoint) -> Result<Arc<Session>> {
        let slot = self.slots.lock().get(endpoint).cloned();
        let cached = slot.as_ref().and_then(|slot| slot.lock().clone());
        match cached.filter(|s| s.is_active()) {
            Some(session) => {
                session.restore(None)?;
                Ok(session)
            }
            None => Err(SessionError::NoActiveSession {
                endpoint: Some(endpoint.to_string()),
            }
            .into()),
        }
    }

    /// The session for `endpoint`, creating it with `credentials` if needed
    pub fn session_with(
        &self,
        endpoint: &Endpoint,
        credentials: &Credentials,
    ) -> Result<Arc<Session>> {
        loop {
            let slot = self.slot(endpoint);
            let mut guard = slot.lock();

            // A dispose that drained this slot before we locked it has already
            // passed it by; a session stored there would never be closed.
            if !self.holds(endpoint, &slot) {
                continue;
            }

            if let Some(session) = guard.as_ref().filter(|s| s.is_active()) {
                session.restore(Some(credentials))?;
                tracing::debug!(session = %session.id(), endpoint = %endpoint, "Reusing session");
                return Ok(session.clone());
            }

            let session = Arc::new(Session::open(
                endpoint.clone(),
                credentials,
                self.client.clone(),
            )?);
            *guard = Some(session.clone());
            return Ok(session);
        }
    }

    /// Number of cached sessions
    pub fn session_count(&self) -> usize {
        let slots: Vec<Slot> = self.slots.lock().values().cloned().collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    /// Make `session` current on this thread
    pub fn push_current(&self, session: Arc<Session>) {
        current::push(self.id, session);
    }

    /// Remove and return this thread's current session
    pub fn pop_current(&self) -> Result<Arc<Session>> {
        Ok(current::pop(self.id)?)
    }

    /// This thread's current session
    pub fn current(&self) -> Result<Arc<Session>> {
        Ok(current::peek(self.id)?)
    }

    /// Depth of this thread's current-session stack
    pub fn current_depth(&self) -> usize {
        current::depth(self.id)
    }

    /// Make `session` current until the returned scope is dropped
    pub fn enter(&self, session: Arc<Session>) -> SessionScope {
        SessionScope::new(self.id, session)
    }

    /// Close every cached session and clear the registry.
    ///
    /// Every session is closed even if some fail; the failures are logged
    /// and reported together. A session being created for a drained slot is
    /// waited for and closed as well.
    pub fn dispose(&self) -> Result<()> {
        let slots: Vec<(Endpoint, Slot)> = self.slots.lock().drain().collect();

        let mut failures = Vec::new();
        for (endpoint, slot) in slots {
            let Some(session) = slot.lock().take() else {
                continue;
            };
            if let Err(e) = session.close() {
                tracing::warn!(endpoint = %endpoint, error = %e, "Failed to close session");
                failures.push(format!("{endpoint}: {e}"));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SessionError::DisposeFailed { failures }.into())
        }
    }

    /// Whether `slot` is still the registered slot for `endpoint`
    fn holds(&self, endpoint: &Endpoint, slot: &Slot) -> bool {
        self.slots
            .lock()
            .get(endpoint)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    fn slot(&self, endpoint: &Endpoint) -> Slot {
        self.slots
            .lock()
            .entry(endpoint.clone())
            .or_insert_with(thread_safe_none)
            .clone()
    }
}

impl Drop for SessionRegistry {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            tracing::warn!(error = %e, "Session registry dropped with close failures");
        }
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("id", &self.id)
            .field("sessions", &self.session_count())
            .finish()
    }
}
