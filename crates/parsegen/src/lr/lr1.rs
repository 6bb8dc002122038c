//! The canonical LR(1) collection and its LALR(1) merge.

use super::{lr0::Lr0Item, StateID};
use crate::{
    analysis::FirstSets,
    grammar::{Grammar, RuleID, SymbolID, TerminalID, TerminalIDSet},
    types::{display_with, Map},
};
use std::{collections::BTreeMap, fmt};

// Keyed by the item core with the lookaheads held apart, so that the
// LR(0) core set of a state falls out of the key set. BTreeMap keeps the
// items in a canonical order for comparison and display.
pub(crate) type Lr1ItemSet = BTreeMap<Lr0Item, TerminalIDSet>;

/// Close an LR(1) item set in place: for `[A -> α . B β, b]` and every
/// production `B -> γ`, add `[B -> . γ, t]` for every `t` in FIRST(β b),
/// to a fixed point.
fn closure(g: &Grammar, first: &FirstSets, items: &mut Lr1ItemSet) {
    let mut changed = true;
    while changed {
        changed = false;

        let mut added: Map<Lr0Item, TerminalIDSet> = Map::default();
        for (core, lookaheads) in items.iter() {
            let rule = g.rule(core.rule);
            let (b, beta) = match &rule.right[core.marker..] {
                [SymbolID::N(b), beta @ ..] => (*b, beta),
                _ => continue,
            };

            let (mut x, nullable) = first.first_of(beta);
            if nullable {
                x.union_with(lookaheads);
            }

            for prod in g.rules_of(b) {
                added
                    .entry(Lr0Item {
                        rule: prod.id,
                        marker: 0,
                    })
                    .or_default()
                    .union_with(&x);
            }
        }

        for (core, lookaheads) in added {
            let entry = items.entry(core).or_insert_with(|| {
                changed = true;
                TerminalIDSet::default()
            });
            for t in lookaheads.iter() {
                changed |= entry.insert(t);
            }
        }
    }
}

/// The kernels of the states reachable from `items` in one step, keyed by
/// the recognized symbol. Lookaheads travel with their items unchanged.
fn transitions(g: &Grammar, items: &Lr1ItemSet) -> Map<SymbolID, Lr1ItemSet> {
    let mut kernels: Map<SymbolID, Lr1ItemSet> = Map::default();
    for (core, lookaheads) in items {
        let Some(label) = core.symbol_after_marker(g) else {
            continue;
        };
        kernels
            .entry(label)
            .or_default()
            .entry(core.advanced())
            .or_default()
            .union_with(lookaheads);
    }
    kernels
}

#[derive(Debug)]
pub struct Lr1State {
    pub(crate) id: StateID,
    pub(crate) items: Lr1ItemSet,
    pub(crate) transitions: Map<SymbolID, StateID>,
}

impl Lr1State {
    pub fn id(&self) -> StateID {
        self.id
    }

    pub fn items(&self) -> impl Iterator<Item = (Lr0Item, &TerminalIDSet)> + '_ {
        self.items.iter().map(|(core, lookaheads)| (*core, lookaheads))
    }

    pub fn transitions(&self) -> impl Iterator<Item = (SymbolID, StateID)> + '_ {
        self.transitions.iter().map(|(symbol, target)| (*symbol, *target))
    }

    pub fn transition(&self, symbol: SymbolID) -> Option<StateID> {
        self.transitions.get(&symbol).copied()
    }

    fn cores(&self) -> Vec<Lr0Item> {
        self.items.keys().copied().collect()
    }
}

/// An LR(1) automaton, either the canonical collection or its LALR merge.
#[derive(Debug)]
pub struct Lr1Automaton {
    pub(crate) states: Map<StateID, Lr1State>,
}

impl Lr1Automaton {
    /// Build the canonical LR(1) collection for an augmented grammar,
    /// breadth-first from the closure of `{ [S' -> . start, $] }`. Two
    /// states are the same only if their closed item sets are equal,
    /// cores and lookaheads both.
    pub fn generate_canonical(grammar: &Grammar) -> Self {
        let span = tracing::trace_span!("lr1_automaton");
        let _entered = span.enter();

        let first = FirstSets::new(grammar);

        let mut start = Lr1ItemSet::new();
        start.insert(
            Lr0Item {
                rule: RuleID::ACCEPT,
                marker: 0,
            },
            Some(TerminalID::EOI).into_iter().collect(),
        );
        closure(grammar, &first, &mut start);

        let mut same_cores: Map<Vec<Lr0Item>, Vec<usize>> = Map::default();
        same_cores.insert(start.keys().copied().collect(), vec![0]);
        let mut item_sets: Vec<Lr1ItemSet> = vec![start];
        let mut edges: Vec<Map<SymbolID, usize>> = vec![];

        let mut i = 0;
        while i < item_sets.len() {
            let mut state_edges = Map::default();
            for (symbol, kernel) in transitions(grammar, &item_sets[i]) {
                let mut closed = kernel;
                closure(grammar, &first, &mut closed);

                let cores: Vec<Lr0Item> = closed.keys().copied().collect();
                let candidates = same_cores.entry(cores).or_default();
                let target = match candidates.iter().copied().find(|&j| item_sets[j] == closed)
                {
                    Some(j) => j,
                    None => {
                        let j = item_sets.len();
                        item_sets.push(closed);
                        candidates.push(j);
                        j
                    }
                };
                state_edges.insert(symbol, target);
            }
            edges.push(state_edges);
            i += 1;
        }

        let mut states = Map::default();
        for (j, (items, state_edges)) in item_sets.into_iter().zip(edges).enumerate() {
            let id = StateID::from_raw(j as u16);
            tracing::trace!(%id, items = items.len(), "lr1 state");
            states.insert(
                id,
                Lr1State {
                    id,
                    items,
                    transitions: state_edges
                        .into_iter()
                        .map(|(symbol, target)| (symbol, StateID::from_raw(target as u16)))
                        .collect(),
                },
            );
        }
        Self { states }
    }

    /// Merge states whose LR(0) core sets are equal, unioning their
    /// lookaheads, and renumber the merged states in first-appearance
    /// order. The merge can manufacture conflicts the canonical
    /// collection does not have; detecting that is the table builder's
    /// responsibility, the automaton itself stays deterministic.
    pub fn merge_lalr(&self) -> Self {
        let span = tracing::trace_span!("merge_lalr");
        let _entered = span.enter();

        let mut groups: Map<Vec<Lr0Item>, StateID> = Map::default();
        let mut remap: Map<StateID, StateID> = Map::default();
        for (id, state) in &self.states {
            let n = groups.len() as u16;
            let merged = *groups.entry(state.cores()).or_insert(StateID::from_raw(n));
            remap.insert(*id, merged);
        }

        let mut states: Map<StateID, Lr1State> = Map::default();
        for (id, state) in &self.states {
            let merged_id = remap[id];
            let merged = states.entry(merged_id).or_insert_with(|| Lr1State {
                id: merged_id,
                items: Lr1ItemSet::new(),
                transitions: Map::default(),
            });
            for (core, lookaheads) in &state.items {
                merged.items.entry(*core).or_default().union_with(lookaheads);
            }
            // isocoric states transition to isocoric states, so remapped
            // edges of all group members agree
            for (symbol, target) in &state.transitions {
                merged.transitions.insert(*symbol, remap[target]);
            }
        }
        Self { states }
    }

    pub fn states(&self) -> impl Iterator<Item = (StateID, &Lr1State)> + '_ {
        self.states.iter().map(|(id, state)| (*id, state))
    }

    pub fn state(&self, id: StateID) -> &Lr1State {
        &self.states[&id]
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_with(|f| {
            for (i, (id, state)) in self.states().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                writeln!(f, "#### State {}", id)?;
                writeln!(f, "## items")?;
                for (core, lookaheads) in state.items() {
                    write!(f, "- {}  [", core.display(g))?;
                    for (i, lookahead) in lookaheads.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" ")?;
                        }
                        f.write_str(g.symbol_name(SymbolID::T(lookahead)))?;
                    }
                    f.write_str("]\n")?;
                }
                writeln!(f, "## transitions")?;
                for (symbol, target) in state.transitions() {
                    writeln!(f, "- {} => {}", g.symbol_name(symbol), target)?;
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_split_grammar() -> Grammar {
        // the lookahead contexts of C differ before and after the first C
        Grammar::from_str(
            "S -> C C ;
             C -> c C | d ;",
        )
        .unwrap()
    }

    #[test]
    fn start_item_lookahead_is_eoi() {
        let g = context_split_grammar();
        let automaton = Lr1Automaton::generate_canonical(&g);
        let start = automaton.state(StateID::START);
        let (_, lookaheads) = start
            .items()
            .find(|(core, _)| core.rule == RuleID::ACCEPT)
            .unwrap();
        let expected: TerminalIDSet = Some(TerminalID::EOI).into_iter().collect();
        assert_eq!(*lookaheads, expected);
    }

    #[test]
    fn canonical_collection_splits_contexts() {
        let g = context_split_grammar();
        let automaton = Lr1Automaton::generate_canonical(&g);
        assert_eq!(automaton.states().count(), 10);
    }

    #[test]
    fn lalr_merge_collapses_isocores() {
        let g = context_split_grammar();
        let canonical = Lr1Automaton::generate_canonical(&g);
        let lalr = canonical.merge_lalr();
        assert_eq!(lalr.states().count(), 7);

        // every canonical core set survives exactly once
        let mut cores: Vec<_> = canonical.states().map(|(_, s)| s.cores()).collect();
        cores.sort();
        cores.dedup();
        assert_eq!(cores.len(), lalr.states().count());
    }

    #[test]
    fn lalr_matches_lr0_for_expression_grammar() {
        let g = Grammar::from_str(
            "E -> E plus T | T ;
             T -> T star F | F ;
             F -> lparen E rparen | id ;",
        )
        .unwrap();
        let lalr = Lr1Automaton::generate_canonical(&g).merge_lalr();
        let lr0 = crate::lr::Lr0Automaton::generate(&g);
        assert_eq!(lalr.states().count(), lr0.states().count());
    }

    #[test]
    fn merge_is_idempotent_without_isocores() {
        let g = Grammar::from_str(
            "E -> E plus T | T ;
             T -> T star F | F ;
             F -> lparen E rparen | id ;",
        )
        .unwrap();
        let lalr = Lr1Automaton::generate_canonical(&g).merge_lalr();
        let again = lalr.merge_lalr();
        assert_eq!(lalr.display(&g).to_string(), again.display(&g).to_string());
    }
}
