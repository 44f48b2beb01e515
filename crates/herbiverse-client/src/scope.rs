//! Liveness guard for async work started by transient views.
//!
//! A view hands out a [`Ticket`] when it starts an async operation and
//! checks it before writing the result back. Closing the view, or renewing
//! it for different content, bumps the generation so results of work that
//! was already in flight become detectable no-ops.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation reserved for a closed scope.
const CLOSED: u64 = u64::MAX;

fn next(generation: u64) -> u64 {
    if generation >= CLOSED - 1 {
        0
    } else {
        generation + 1
    }
}

/// Generation stamp issued by a [`ViewScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// Generation counter shared by a view and its in-flight operations.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    generation: Arc<AtomicU64>,
}

impl ViewScope {
    /// Create an open scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for the current generation.
    pub fn ticket(&self) -> Ticket {
        Ticket { generation: self.generation.load(Ordering::Acquire) }
    }

    /// Invalidate outstanding tickets and return a fresh one.
    ///
    /// A closed scope stays closed; the returned ticket is then never
    /// current.
    pub fn renew(&self) -> Ticket {
        let renewed = self
            .generation
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |g| (g != CLOSED).then(|| next(g)));
        match renewed {
            Ok(previous) => Ticket { generation: next(previous) },
            Err(_) => Ticket { generation: CLOSED },
        }
    }

    /// Mark the view as gone. Every ticket stops being current.
    pub fn close(&self) {
        self.generation.store(CLOSED, Ordering::Release);
    }

    /// Check whether the view was closed.
    pub fn is_closed(&self) -> bool {
        self.generation.load(Ordering::Acquire) == CLOSED
    }

    /// Check whether results stamped with `ticket` may still be applied.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation != CLOSED && self.generation.load(Ordering::Acquire) == ticket.generation
    }

    /// Run `fut`, yielding its output only if the scope did not move on
    /// while it ran.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let ticket = self.ticket();
        let output = fut.await;
        if self.is_current(&ticket) {
            Some(output)
        } else {
            tracing::debug!("Dropping result of work that outlived its view");
            None
        }
    }
}
