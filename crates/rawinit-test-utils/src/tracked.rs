//! Instrumented element type and failure injection.

// `non_trivial_lifecycle!` expands to an `unsafe impl`.
#![allow(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// One lifecycle event of a tracked copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Construct(u32),
    Destroy(u32),
}

impl Event {
    pub fn is_construct(&self) -> bool {
        matches!(self, Self::Construct(_))
    }

    pub fn value(&self) -> u32 {
        match self {
            Self::Construct(v) | Self::Destroy(v) => *v,
        }
    }
}

/// Shared, ordered record of [`Event`]s.
///
/// Cloning the log yields another handle to the same record.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    /// Snapshot of every event so far, in order.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn constructs(&self) -> usize {
        self.events.borrow().iter().filter(|e| e.is_construct()).count()
    }

    pub fn destroys(&self) -> usize {
        self.events.borrow().iter().filter(|e| !e.is_construct()).count()
    }

    /// Constructions minus destructions.
    pub fn live(&self) -> isize {
        self.constructs() as isize - self.destroys() as isize
    }
}

/// Error produced when a [`Tripwire`] fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tripped {
    /// Zero-based call on which the wire fired.
    pub call: usize,
}

impl fmt::Display for Tripped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tripwire fired on call {}", self.call)
    }
}

impl Error for Tripped {}

/// Shared call counter that fails from the `limit`-th call onwards.
///
/// `Tripwire::after(2)` lets calls 0 and 1 through and fails call 2.
#[derive(Clone, Debug)]
pub struct Tripwire {
    calls: Rc<Cell<usize>>,
    limit: usize,
}

impl Tripwire {
    pub fn after(limit: usize) -> Self {
        Self {
            calls: Rc::new(Cell::new(0)),
            limit,
        }
    }

    pub fn never() -> Self {
        Self::after(usize::MAX)
    }

    /// Count one call; `Err` once the limit is reached.
    pub fn check(&self) -> Result<(), Tripped> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call >= self.limit {
            return Err(Tripped { call });
        }
        Ok(())
    }

    /// Number of calls counted so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Default for Tripwire {
    fn default() -> Self {
        Self::never()
    }
}

/// Non-trivial element that logs the lifecycle of its copies.
///
/// Values made with [`Tracked::new`] or [`Tracked::armed`] are originals:
/// they log nothing. Every `clone()` logs [`Event::Construct`] and the
/// clone logs [`Event::Destroy`] when dropped. An armed original (and its
/// copies) consults its [`Tripwire`] before cloning and panics when it
/// fires, before anything is logged.
///
/// `Tracked::default()` is a detached original with value 0, which is what
/// moved-from slots are left holding.
pub struct Tracked {
    pub value: u32,
    log: EventLog,
    trip: Option<Tripwire>,
    copy: bool,
}

impl Tracked {
    pub fn new(value: u32, log: &EventLog) -> Self {
        Self {
            value,
            log: log.clone(),
            trip: None,
            copy: false,
        }
    }

    pub fn armed(value: u32, log: &EventLog, trip: &Tripwire) -> Self {
        Self {
            value,
            log: log.clone(),
            trip: Some(trip.clone()),
            copy: false,
        }
    }

    /// `true` if this value was produced by `clone()`.
    pub fn is_copy(&self) -> bool {
        self.copy
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        if let Some(trip) = &self.trip {
            if let Err(tripped) = trip.check() {
                panic!("Tracked({}) clone failed: {tripped}", self.value);
            }
        }
        self.log.record(Event::Construct(self.value));
        Self {
            value: self.value,
            log: self.log.clone(),
            trip: self.trip.clone(),
            copy: true,
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        if self.copy {
            self.log.record(Event::Destroy(self.value));
        }
    }
}

impl Default for Tracked {
    fn default() -> Self {
        Self::new(0, &EventLog::new())
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("value", &self.value)
            .field("copy", &self.copy)
            .finish()
    }
}

rawinit_core::non_trivial_lifecycle!(Tracked);
