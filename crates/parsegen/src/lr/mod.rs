//! LR item sets and the canonical automata built from them.

mod lr0;
mod lr1;

pub use self::lr0::{Lr0Automaton, Lr0Item, Lr0State};
pub use self::lr1::{Lr1Automaton, Lr1State};

use std::fmt;

/// Identifier of a state of an LR automaton.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct StateID {
    raw: u16,
}

impl StateID {
    /// The initial state, holding the kernel `S' -> . start`.
    pub const START: Self = Self::from_raw(0);

    #[inline]
    pub(crate) const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }
}

impl fmt::Display for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.raw)
    }
}
