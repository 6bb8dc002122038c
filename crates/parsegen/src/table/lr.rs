//! SLR(1), CLR(1) and LALR(1) action/goto tables.

use super::{Conflict, TableError};
use crate::{
    analysis::{FirstSets, FollowSets},
    grammar::{Grammar, NonterminalID, RuleID, SymbolID, TerminalID},
    lr::{Lr0Automaton, Lr1Automaton, StateID},
    types::{display_with, Map},
};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LrAction {
    /// Consume the lookahead and move to the target state.
    Shift(StateID),
    /// Pop the production's right-hand side and emit its head.
    Reduce(RuleID),
    Accept,
}

#[derive(Debug, Default)]
pub struct LrTableRow {
    pub(crate) actions: Map<TerminalID, LrAction>,
    pub(crate) gotos: Map<NonterminalID, StateID>,
}

/// A filled LR parse table. A missing action cell means the terminal is a
/// syntax error in that state.
#[derive(Debug)]
pub struct LrTable {
    pub(crate) rows: Map<StateID, LrTableRow>,
    warnings: Vec<String>,
}

impl LrTable {
    /// Build an SLR(1) table: reduce actions of the LR(0) collection are
    /// gated by FOLLOW of the producing head.
    pub fn slr(grammar: &Grammar, allow_ambig: bool) -> Result<Self, TableError> {
        let span = tracing::trace_span!("slr_table");
        let _entered = span.enter();

        let first = FirstSets::new(grammar);
        let follow = FollowSets::new(grammar, &first);
        let automaton = Lr0Automaton::generate(grammar);
        let (rows, warnings) =
            fill_lr0(grammar, &automaton, &follow, allow_ambig).map_err(TableError::NotSlr1)?;
        Ok(Self { rows, warnings })
    }

    /// Build a canonical LR(1) table.
    pub fn clr(grammar: &Grammar, allow_ambig: bool) -> Result<Self, TableError> {
        let span = tracing::trace_span!("clr_table");
        let _entered = span.enter();

        let automaton = Lr1Automaton::generate_canonical(grammar);
        let (rows, warnings) =
            fill_lr1(grammar, &automaton, allow_ambig).map_err(TableError::NotClr1)?;
        Ok(Self { rows, warnings })
    }

    /// Build an LALR(1) table from the merged canonical collection.
    ///
    /// When the merged table has a conflict, the canonical table is
    /// filled as well to tell a grammar that is not LR(1) at all apart
    /// from one where merging manufactured the conflict.
    pub fn lalr(grammar: &Grammar, allow_ambig: bool) -> Result<Self, TableError> {
        let span = tracing::trace_span!("lalr_table");
        let _entered = span.enter();

        let canonical = Lr1Automaton::generate_canonical(grammar);
        let merged = canonical.merge_lalr();
        match fill_lr1(grammar, &merged, allow_ambig) {
            Ok((rows, warnings)) => Ok(Self { rows, warnings }),
            Err(conflict) => {
                let merge_introduced = fill_lr1(grammar, &canonical, allow_ambig).is_ok();
                Err(TableError::NotLalr1 {
                    conflict,
                    merge_introduced,
                })
            }
        }
    }

    pub fn action(&self, state: StateID, terminal: TerminalID) -> Option<LrAction> {
        self.rows[&state].actions.get(&terminal).copied()
    }

    pub fn goto(&self, state: StateID, n: NonterminalID) -> Option<StateID> {
        self.rows[&state].gotos.get(&n).copied()
    }

    pub fn states(&self) -> impl Iterator<Item = StateID> + '_ {
        self.rows.keys().copied()
    }

    /// Shift/reduce resolutions recorded while `allow_ambig` was set.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_with(|f| {
            for (i, (id, row)) in self.rows.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                writeln!(f, "#### State {}", id)?;
                writeln!(f, "## actions")?;
                for (terminal, action) in &row.actions {
                    let name = g.symbol_name(SymbolID::T(*terminal));
                    match action {
                        LrAction::Shift(target) => writeln!(f, "- {} => shift({})", name, target)?,
                        LrAction::Reduce(rule) => {
                            writeln!(f, "- {} => reduce({})", name, g.rule(*rule).display(g))?
                        }
                        LrAction::Accept => writeln!(f, "- {} => accept", name)?,
                    }
                }
                writeln!(f, "## gotos")?;
                for (n, target) in &row.gotos {
                    writeln!(f, "- {} => goto({})", g.symbol_name(SymbolID::N(*n)), target)?;
                }
            }
            Ok(())
        })
    }
}

/// Candidate actions collected for one `(state, terminal)` cell before
/// any resolution is applied. A shift candidate is unique by construction
/// (the automaton has one transition per symbol), so a shift/shift
/// conflict cannot be represented and would be a construction bug.
#[derive(Debug, Default)]
struct PendingAction {
    shift: Option<StateID>,
    accept: bool,
    reduces: Vec<RuleID>,
}

fn resolve(
    grammar: &Grammar,
    state: StateID,
    pending: Map<TerminalID, PendingAction>,
    allow_ambig: bool,
    warnings: &mut Vec<String>,
) -> Result<Map<TerminalID, LrAction>, Conflict> {
    let mut actions = Map::default();
    for (t, mut candidate) in pending {
        candidate.reduces.sort();
        candidate.reduces.dedup();
        let terminal = grammar.symbol_name(SymbolID::T(t));
        let render = |rule: &RuleID| grammar.rule(*rule).display(grammar).to_string();

        let action = match (candidate.accept, candidate.shift, &candidate.reduces[..]) {
            (true, None, []) => LrAction::Accept,
            (true, Some(_), _) => {
                return Err(Conflict::AcceptShift {
                    state,
                    terminal: terminal.to_owned(),
                })
            }
            (true, None, [reduce, ..]) => {
                return Err(Conflict::AcceptReduce {
                    state,
                    terminal: terminal.to_owned(),
                    reduce: render(reduce),
                })
            }
            // reduce/reduce is never resolved, `allow_ambig` or not
            (false, _, [first, second, ..]) => {
                return Err(Conflict::ReduceReduce {
                    state,
                    terminal: terminal.to_owned(),
                    first: render(first),
                    second: render(second),
                })
            }
            (false, Some(shift), [reduce]) => {
                if !allow_ambig {
                    return Err(Conflict::ShiftReduce {
                        state,
                        terminal: terminal.to_owned(),
                        shift,
                        reduce: render(reduce),
                    });
                }
                warnings.push(format!(
                    "state {} on `{}': resolved shift({}) over reduce({})",
                    state,
                    terminal,
                    shift,
                    render(reduce),
                ));
                LrAction::Shift(shift)
            }
            (false, Some(shift), []) => LrAction::Shift(shift),
            (false, None, [reduce]) => LrAction::Reduce(*reduce),
            (false, None, []) => unreachable!("pending action without candidates"),
        };
        actions.insert(t, action);
    }
    Ok(actions)
}

fn fill_lr1(
    grammar: &Grammar,
    automaton: &Lr1Automaton,
    allow_ambig: bool,
) -> Result<(Map<StateID, LrTableRow>, Vec<String>), Conflict> {
    let mut rows = Map::default();
    let mut warnings = vec![];
    for (id, state) in automaton.states() {
        let mut pending: Map<TerminalID, PendingAction> = Map::default();
        let mut gotos = Map::default();
        for (symbol, target) in state.transitions() {
            match symbol {
                SymbolID::T(t) => {
                    pending.entry(t).or_default().shift = Some(target);
                }
                SymbolID::N(n) => {
                    gotos.insert(n, target);
                }
            }
        }

        for (core, lookaheads) in state.items() {
            if !core.is_complete(grammar) {
                continue;
            }
            if core.rule == RuleID::ACCEPT {
                pending.entry(TerminalID::EOI).or_default().accept = true;
                continue;
            }
            for t in lookaheads.iter() {
                pending.entry(t).or_default().reduces.push(core.rule);
            }
        }

        let actions = resolve(grammar, id, pending, allow_ambig, &mut warnings)?;
        rows.insert(id, LrTableRow { actions, gotos });
    }
    Ok((rows, warnings))
}

fn fill_lr0(
    grammar: &Grammar,
    automaton: &Lr0Automaton,
    follow: &FollowSets,
    allow_ambig: bool,
) -> Result<(Map<StateID, LrTableRow>, Vec<String>), Conflict> {
    let mut rows = Map::default();
    let mut warnings = vec![];
    for (id, state) in automaton.states() {
        let mut pending: Map<TerminalID, PendingAction> = Map::default();
        let mut gotos = Map::default();
        for (symbol, target) in state.transitions() {
            match symbol {
                SymbolID::T(t) => {
                    pending.entry(t).or_default().shift = Some(target);
                }
                SymbolID::N(n) => {
                    gotos.insert(n, target);
                }
            }
        }

        for core in state.items() {
            if !core.is_complete(grammar) {
                continue;
            }
            if core.rule == RuleID::ACCEPT {
                pending.entry(TerminalID::EOI).or_default().accept = true;
                continue;
            }
            let left = grammar.rule(core.rule).left;
            for t in follow.follow(left).iter() {
                pending.entry(t).or_default().reduces.push(core.rule);
            }
        }

        let actions = resolve(grammar, id, pending, allow_ambig, &mut warnings)?;
        rows.insert(id, LrTableRow { actions, gotos });
    }
    Ok((rows, warnings))
}
