//! The shared block store and bar renderer.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use stag_blocks::{Block, BlockStore, Response, ValidationPolicy, apply_request};
use tracing::debug;

use crate::render::{BarOutput, RenderError, StatusRenderer};

use super::DISPATCH_TARGET;
use super::errors::DispatchError;

struct BoardState {
    store: BlockStore,
    renderer: StatusRenderer<BarOutput>,
}

/// Block store and renderer behind one lock.
///
/// Holding both under the same mutex makes validate, mutate and render a
/// single critical section: no frame shows a half-applied store and frames
/// appear in the order mutations were applied. Clones share the same state.
#[derive(Clone)]
pub struct BlockBoard {
    state: Arc<Mutex<BoardState>>,
    policy: ValidationPolicy,
}

impl BlockBoard {
    /// Creates an empty board rendering to `output`.
    #[must_use]
    pub fn new(output: BarOutput, policy: ValidationPolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState {
                store: BlockStore::new(),
                renderer: StatusRenderer::new(output),
            })),
            policy,
        }
    }

    /// Writes the bar stream's header and opening bracket.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned or the bar output is already
    /// closed.
    pub fn open_stream(&self) -> Result<(), DispatchError> {
        let mut state = self.lock()?;
        if let Err(error) = state.renderer.write_preamble() {
            log_render_error(&error);
        }
        Ok(())
    }

    /// Applies one raw request and re-renders the bar when the store changed.
    ///
    /// Rejected requests come back as failed responses; only a poisoned lock
    /// is an error.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Internal`] if the lock is poisoned.
    pub fn submit(&self, request: &[u8]) -> Result<Response, DispatchError> {
        let mut state = self.lock()?;
        let BoardState { store, renderer } = &mut *state;
        let outcome = apply_request(store, request, self.policy);
        if outcome.changed
            && let Err(error) = renderer.render(store.snapshot())
        {
            log_render_error(&error);
        }
        Ok(outcome.response)
    }

    /// Copies the current block sequence.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Internal`] if the lock is poisoned.
    pub fn snapshot(&self) -> Result<Vec<Block>, DispatchError> {
        Ok(self.lock()?.store.snapshot().to_vec())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BoardState>, DispatchError> {
        self.state
            .lock()
            .map_err(|_| DispatchError::internal("block board lock poisoned"))
    }
}

impl fmt::Debug for BlockBoard {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("BlockBoard")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn log_render_error(error: &RenderError) {
    debug!(target: DISPATCH_TARGET, %error, "frame not rendered");
}
