//! Parse table builders.
//!
//! Each builder takes an augmented [`Grammar`](crate::grammar::Grammar),
//! builds the automaton (or the FIRST/FOLLOW machinery) it needs, and
//! fills an action/goto table. Construction either yields a complete,
//! reusable table or an error naming the conflict that blocked it; a
//! table is never partially filled.

mod ll;
mod lr;

pub use self::ll::LlTable;
pub use self::lr::{LrAction, LrTable};

use crate::{analysis::Ll1Conflict, lr::StateID};

/// Incompatible actions competing for a single table cell.
///
/// Candidate actions for a cell are collected first and resolved as a
/// set, so classification does not depend on the order the automaton
/// yields its items.
#[derive(Debug, thiserror::Error)]
pub enum Conflict {
    #[error(
        "shift/reduce conflict in state {} on `{}': shift({}) vs reduce({})",
        state,
        terminal,
        shift,
        reduce
    )]
    ShiftReduce {
        state: StateID,
        terminal: String,
        shift: StateID,
        reduce: String,
    },

    #[error(
        "reduce/reduce conflict in state {} on `{}': reduce({}) vs reduce({})",
        state,
        terminal,
        first,
        second
    )]
    ReduceReduce {
        state: StateID,
        terminal: String,
        first: String,
        second: String,
    },

    #[error("accept/shift conflict in state {} on `{}'", state, terminal)]
    AcceptShift { state: StateID, terminal: String },

    #[error(
        "accept/reduce conflict in state {} on `{}': reduce({})",
        state,
        terminal,
        reduce
    )]
    AcceptReduce {
        state: StateID,
        terminal: String,
        reduce: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("the grammar is not LL(1): {0}")]
    NotLl1(
        #[from]
        #[source]
        Ll1Conflict,
    ),

    #[error("the grammar is not SLR(1): {0}")]
    NotSlr1(#[source] Conflict),

    #[error("the grammar is not CLR(1): {0}")]
    NotClr1(#[source] Conflict),

    #[error("the grammar is not LALR(1){}: {conflict}", merge_note(.merge_introduced))]
    NotLalr1 {
        #[source]
        conflict: Conflict,
        /// Whether the canonical LR(1) table is conflict-free, i.e. the
        /// conflict exists only because of lookahead merging.
        merge_introduced: bool,
    },
}

fn merge_note(merge_introduced: &bool) -> &'static str {
    if *merge_introduced {
        " (the state merge introduced the conflict)"
    } else {
        ""
    }
}
