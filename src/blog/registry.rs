//! At most one live body write per entry id.
//!
//! Starting a write for an id that already has one in flight cancels the older
//! write through its token. The newer write then waits for the older one to stop
//! before it truncates the file, so the newest write always owns the final bytes.
//! Cancelled writes are abandoned where they stopped and are not cleaned up.
//!
//! The store write runs on its own task, which owns the id's turn until the
//! store returns. A caller that goes away mid-write cancels its token, and the
//! next write for the id still waits for the abandoned one to stop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use tokio::sync::{Mutex as TurnLock, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;

use crate::content_store::{ContentStore, ContentStoreError};

struct Handle {
    /// Generation of the newest write for the id
    generation: u64,
    cancel: CancellationToken,
    turn: Arc<TurnLock<()>>,
    /// Writes still registered: waiting, running, or holding a ticket
    writers: usize,
}

type Handles = Arc<Mutex<HashMap<String, Handle>>>;

#[derive(Debug)]
pub enum WriteOutcome {
    /// The body is fully written. Newer writes for the same id wait until the
    /// ticket is dropped, so index updates made while holding it cannot be overtaken.
    Completed(WriteTicket),
    /// A newer write for the same id started; this one was abandoned.
    Superseded,
}

/// Proof of a completed write; releases the id's turn when dropped.
pub struct WriteTicket {
    generation: u64,
    _turn: OwnedMutexGuard<()>,
    _registration: Registration,
}

impl std::fmt::Debug for WriteTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteTicket")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl WriteTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One write's claim on its id's handle. The handle goes away with the last claim.
struct Registration {
    handles: Handles,
    id: String,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        let last = match handles.get_mut(&self.id) {
            Some(handle) => {
                handle.writers -= 1;
                handle.writers == 0
            }
            None => false,
        };
        if last {
            handles.remove(&self.id);
        }
    }
}

pub struct WriteRegistry {
    store: Arc<dyn ContentStore>,
    handles: Handles,
    next_generation: AtomicU64,
}

impl WriteRegistry {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            handles: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Number of ids with a registered write.
    pub fn live_handles(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn register(
        &self,
        id: &str,
        generation: u64,
        cancel: &CancellationToken,
    ) -> (Arc<TurnLock<()>>, Registration) {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = handles.entry(id.to_string()).or_insert_with(|| Handle {
            generation,
            cancel: cancel.clone(),
            turn: Arc::new(TurnLock::new(())),
            writers: 0,
        });
        if handle.generation != generation {
            tracing::debug!(entry_id = %id, "Superseding in-flight body write");
            handle.cancel.cancel();
            handle.generation = generation;
            handle.cancel = cancel.clone();
        }
        handle.writers += 1;

        let registration = Registration {
            handles: Arc::clone(&self.handles),
            id: id.to_string(),
        };
        (Arc::clone(&handle.turn), registration)
    }

    /// Replace the body at `key` for entry `id`, superseding any write in flight for `id`.
    pub async fn begin_write(
        &self,
        id: &str,
        key: &str,
        data: Bytes,
    ) -> Result<WriteOutcome, ContentStoreError> {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let (turn, registration) = self.register(id, generation, &cancel);

        // Dropping this future stops the write at its next chunk.
        let cancel_on_drop = cancel.clone().drop_guard();
        let turn = turn.lock_owned().await;
        if cancel.is_cancelled() {
            return Ok(WriteOutcome::Superseded);
        }

        let store = Arc::clone(&self.store);
        let key = key.to_string();
        let write_cancel = cancel.clone();
        let write = tokio::spawn(async move {
            let result = store.write_full(&key, data, write_cancel).await;
            (result, turn, registration)
        });
        let (result, turn, registration) = write
            .await
            .map_err(|e| ContentStoreError::Backend(format!("write task failed: {e}")))?;
        cancel_on_drop.disarm();

        match result {
            // A newer write is queued behind us and will overwrite these bytes.
            Ok(()) if cancel.is_cancelled() => Ok(WriteOutcome::Superseded),
            Ok(()) => Ok(WriteOutcome::Completed(WriteTicket {
                generation,
                _turn: turn,
                _registration: registration,
            })),
            Err(ContentStoreError::Cancelled(_)) => Ok(WriteOutcome::Superseded),
            Err(e) => Err(e),
        }
    }
}
