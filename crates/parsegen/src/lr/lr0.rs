//! LR(0) items and the canonical LR(0) collection.

use super::StateID;
use crate::{
    grammar::{Grammar, RuleID, SymbolID},
    types::{display_with, Map, Set},
};
use std::{collections::VecDeque, fmt};

/// A production with a marker denoting how much of it has been recognized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lr0Item {
    pub rule: RuleID,
    pub marker: usize,
}

impl Lr0Item {
    /// Whether the marker has reached the end of the production.
    ///
    /// Epsilon productions have an empty right-hand side, so their only
    /// item is complete from the start.
    pub fn is_complete(&self, g: &Grammar) -> bool {
        self.marker >= g.rule(self.rule).right.len()
    }

    /// The symbol immediately after the marker, if any.
    pub fn symbol_after_marker(&self, g: &Grammar) -> Option<SymbolID> {
        g.rule(self.rule).right.get(self.marker).copied()
    }

    pub(crate) fn advanced(&self) -> Self {
        Self {
            rule: self.rule,
            marker: self.marker + 1,
        }
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_with(|f| {
            let rule = g.rule(self.rule);
            write!(f, "({} ->", g.symbol_name(SymbolID::N(rule.left)))?;
            for (i, symbol) in rule.right.iter().enumerate() {
                if i == self.marker {
                    f.write_str(" .")?;
                }
                write!(f, " {}", g.symbol_name(*symbol))?;
            }
            if self.marker == rule.right.len() {
                f.write_str(" .")?;
            }
            f.write_str(")")
        })
    }
}

/// Close an item set: for every item with the marker before a nonterminal
/// `B`, add `B -> . γ` for every production of `B`, to a fixed point.
pub fn closure(g: &Grammar, kernels: &[Lr0Item]) -> Set<Lr0Item> {
    let mut items: Set<Lr0Item> = kernels.iter().copied().collect();
    let mut changed = true;
    while changed {
        changed = false;
        let mut added = vec![];
        for item in &items {
            if let Some(SymbolID::N(b)) = item.symbol_after_marker(g) {
                for rule in g.rules_of(b) {
                    added.push(Lr0Item {
                        rule: rule.id,
                        marker: 0,
                    });
                }
            }
        }
        for item in added {
            changed |= items.insert(item);
        }
    }
    items
}

/// The kernel of the state reached from `items` by recognizing `symbol`:
/// every item with the marker before `symbol`, advanced past it. Sorted so
/// the kernel doubles as the state's identity.
pub fn goto(g: &Grammar, items: &Set<Lr0Item>, symbol: SymbolID) -> Vec<Lr0Item> {
    let mut kernel: Vec<Lr0Item> = items
        .iter()
        .filter(|item| item.symbol_after_marker(g) == Some(symbol))
        .map(Lr0Item::advanced)
        .collect();
    kernel.sort();
    kernel.dedup();
    kernel
}

#[derive(Debug)]
pub struct Lr0State {
    pub(crate) id: StateID,
    pub(crate) kernels: Vec<Lr0Item>,
    pub(crate) items: Set<Lr0Item>,
    pub(crate) transitions: Map<SymbolID, StateID>,
}

impl Lr0State {
    pub fn id(&self) -> StateID {
        self.id
    }

    /// The sorted kernel items identifying this state.
    pub fn kernels(&self) -> impl Iterator<Item = Lr0Item> + '_ {
        self.kernels.iter().copied()
    }

    pub fn items(&self) -> impl Iterator<Item = Lr0Item> + '_ {
        self.items.iter().copied()
    }

    pub fn transitions(&self) -> impl Iterator<Item = (SymbolID, StateID)> + '_ {
        self.transitions.iter().map(|(symbol, target)| (*symbol, *target))
    }

    pub fn transition(&self, symbol: SymbolID) -> Option<StateID> {
        self.transitions.get(&symbol).copied()
    }
}

/// The canonical LR(0) collection.
#[derive(Debug)]
pub struct Lr0Automaton {
    pub(crate) states: Map<StateID, Lr0State>,
}

impl Lr0Automaton {
    /// Build the collection for an augmented grammar, breadth-first from
    /// the kernel `{ S' -> . start }`. States are identified by their
    /// sorted kernels, so the numbering is independent of closure order.
    pub fn generate(grammar: &Grammar) -> Self {
        let span = tracing::trace_span!("lr0_automaton");
        let _entered = span.enter();

        let start_kernel = vec![Lr0Item {
            rule: RuleID::ACCEPT,
            marker: 0,
        }];

        let mut isocores: Map<Vec<Lr0Item>, StateID> = Map::default();
        isocores.insert(start_kernel.clone(), StateID::START);
        let mut next_state = 1u16;
        let mut queue = VecDeque::new();
        queue.push_back((StateID::START, start_kernel));

        let mut states: Map<StateID, Lr0State> = Map::default();
        while let Some((id, kernels)) = queue.pop_front() {
            let items = closure(grammar, &kernels);

            let labels: Set<SymbolID> = items
                .iter()
                .filter_map(|item| item.symbol_after_marker(grammar))
                .collect();

            let mut transitions = Map::default();
            for label in labels {
                let kernel = goto(grammar, &items, label);
                let target = match isocores.get(&kernel) {
                    Some(target) => *target,
                    None => {
                        let target = StateID::from_raw(next_state);
                        next_state += 1;
                        isocores.insert(kernel.clone(), target);
                        queue.push_back((target, kernel));
                        target
                    }
                };
                transitions.insert(label, target);
            }

            tracing::trace!(%id, items = items.len(), "lr0 state");
            states.insert(
                id,
                Lr0State {
                    id,
                    kernels,
                    items,
                    transitions,
                },
            );
        }

        Self { states }
    }

    pub fn states(&self) -> impl Iterator<Item = (StateID, &Lr0State)> + '_ {
        self.states.iter().map(|(id, state)| (*id, state))
    }

    pub fn state(&self, id: StateID) -> &Lr0State {
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
                for item in state.items() {
                    writeln!(f, "- {}", item.display(g))?;
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
