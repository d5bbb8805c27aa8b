//! Table-driven finite state machine engine.
//!
//! Classic embedded transition-table pattern in Rust:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  &'static [Transition<C>]                                 │
//! │  ┌────────┬───────────────┬──────────────┬─────────────┐  │
//! │  │ origin │ guard         │ destination  │ action      │  │
//! │  ├────────┼───────────────┼──────────────┼─────────────┤  │
//! │  │ 0      │ fn(&mut C)->b │ To(1)        │ Some(fn)    │  │
//! │  │ 1      │ fn(&mut C)->b │ To(5)        │ Some(fn)    │  │
//! │  │ 1      │ fn(&mut C)->b │ To(2)        │ Some(fn)    │  │
//! │  │ 2      │ fn(&mut C)->b │ Stay         │ None        │  │
//! │  │ …      │               │              │             │  │
//! │  └────────┴───────────────┴──────────────┴─────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Each `update` scans the rows whose `origin` is the current state, in
//! declaration order, and evaluates their guards.  The first guard that
//! returns `true` wins: its action runs, then the state moves to the
//! destination (or stays, for [`Destination::Stay`]).  At most one row
//! fires per call.  The end of the table is the end of the slice.
//!
//! Guards may have side effects (the level checks nudge the register),
//! so evaluation order is part of the contract.  All functions receive
//! the same `&mut C` context.

pub mod callbacks;
pub mod context;
pub mod tables;

use core::fmt;

use log::{debug, info};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Numeric state identifier.  Meaning is defined by each table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u8);

impl StateId {
    /// Every machine starts here.
    pub const INITIAL: Self = Self(0);
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a fired row leaves the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Move to the given state.
    To(StateId),
    /// Keep the current state.  The action (if any) still runs.
    Stay,
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Guard predicate.  May read and mutate the context.
pub type GuardFn<C> = fn(&mut C) -> bool;

/// Action run when a row fires.
pub type ActionFn<C> = fn(&mut C);

// ---------------------------------------------------------------------------
// Transition row
// ---------------------------------------------------------------------------

/// One row of a transition table.
pub struct Transition<C: 'static> {
    pub origin: StateId,
    pub guard: GuardFn<C>,
    pub destination: Destination,
    pub action: Option<ActionFn<C>>,
}

impl<C: 'static> Transition<C> {
    pub const fn new(
        origin: StateId,
        guard: GuardFn<C>,
        destination: Destination,
        action: Option<ActionFn<C>>,
    ) -> Self {
        Self {
            origin,
            guard,
            destination,
            action,
        }
    }
}

/// Report of the row that fired during an `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub from: StateId,
    pub destination: Destination,
}

impl Fired {
    /// State after the row fired.
    pub fn to(&self) -> StateId {
        match self.destination {
            Destination::To(next) => next,
            Destination::Stay => self.from,
        }
    }

    pub fn changed_state(&self) -> bool {
        self.to() != self.from
    }
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// One machine instance: a table reference plus its own current state.
pub struct Fsm<C: 'static> {
    name: &'static str,
    table: &'static [Transition<C>],
    /// Human-readable state names, indexed by `StateId`.  May be empty.
    state_names: &'static [&'static str],
    current: StateId,
    /// Rows fired since construction.
    fired_count: u64,
}

impl<C: 'static> Fsm<C> {
    /// Create a machine in [`StateId::INITIAL`].
    pub fn new(name: &'static str, table: &'static [Transition<C>]) -> Self {
        Self {
            name,
            table,
            state_names: &[],
            current: StateId::INITIAL,
            fired_count: 0,
        }
    }

    pub fn with_state_names(mut self, names: &'static [&'static str]) -> Self {
        self.state_names = names;
        self
    }

    /// Evaluate the current state's rows once.
    ///
    /// Returns the row that fired, or `None` if no guard held (state and
    /// context untouched apart from guard side effects).
    pub fn update(&mut self, ctx: &mut C) -> Option<Fired> {
        let from = self.current;

        let row = self
            .table
            .iter()
            .filter(|row| row.origin == from)
            .find(|row| (row.guard)(ctx))?;

        if let Some(action) = row.action {
            action(ctx);
        }
        if let Destination::To(next) = row.destination {
            self.current = next;
        }
        self.fired_count += 1;

        let fired = Fired {
            from,
            destination: row.destination,
        };
        if fired.changed_state() {
            info!(
                "{}: {} ({}) -> {} ({})",
                self.name,
                from,
                self.state_name(from),
                self.current,
                self.state_name(self.current)
            );
        } else {
            debug!("{}: stay in {} ({})", self.name, from, self.state_name(from));
        }
        Some(fired)
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Jump directly to `state` without running any guard or action.
    /// Test and replay hook.
    pub fn force_state(&mut self, state: StateId) {
        self.current = state;
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state_name(&self, state: StateId) -> &'static str {
        self.state_names
            .get(usize::from(state.0))
            .copied()
            .unwrap_or("?")
    }

    pub fn fired_count(&self) -> u64 {
        self.fired_count
    }
}
