//! Guard against applying superseded responses.
//!
//! A caller that issues the same kind of request repeatedly (for example
//! re-fetching rates whenever the market changes) takes a [`Ticket`] before
//! each request. When a response arrives, [`Latest::apply`] only keeps it if
//! no newer request has started since.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::warn;

/// Identifies one started request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter.
#[derive(Debug, Default)]
pub struct Generation {
    current: AtomicU64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return its ticket.
    pub fn advance(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Ticket of the newest generation.
    pub fn current(&self) -> Ticket {
        Ticket(self.current.load(Ordering::Acquire))
    }

    /// Whether no newer generation has started since `ticket`.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket >= self.current()
    }
}

/// What [`Latest::apply`] did with a response.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome<E> {
    /// The value was stored.
    Applied,
    /// A newer request has started; the response was dropped.
    Stale,
    /// The request failed; the held value was cleared.
    Failed(E),
}

impl<E> Outcome<E> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// The most recent result of a repeated request.
#[derive(Debug)]
pub struct Latest<T> {
    generation: Generation,
    value: Option<T>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            generation: Generation::new(),
            value: None,
        }
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request. Responses to earlier tickets become stale.
    pub fn begin(&self) -> Ticket {
        self.generation.advance()
    }

    /// Apply the response of the request identified by `ticket`.
    ///
    /// Errors clear the held value so a failed refresh never leaves an old
    /// value in place.
    pub fn apply<E>(&mut self, ticket: Ticket, result: Result<T, E>) -> Outcome<E> {
        if !self.generation.is_current(ticket) {
            warn!(
                ticket = ticket.value(),
                current = self.generation.current().value(),
                "dropping stale response"
            );
            return Outcome::Stale;
        }

        match result {
            Ok(value) => {
                self.value = Some(value);
                Outcome::Applied
            }
            Err(e) => {
                self.value = None;
                Outcome::Failed(e)
            }
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}
