//! The working copy the transforms rewrite.

use crate::{
    grammar::{
        Grammar, Nonterminal, NonterminalID, Rule, RuleID, SymbolID, Terminal, TerminalID,
    },
    types::{Map, Set},
};

/// A snapshot of a grammar's rules in definition order, rewritable without
/// touching the source grammar. `finish` rebuilds a proper [`Grammar`]
/// with compacted IDs and a fresh augmentation rule.
#[derive(Debug)]
pub(crate) struct RuleDraft {
    order: Vec<NonterminalID>,
    names: Map<NonterminalID, String>,
    alts: Map<NonterminalID, Vec<Vec<SymbolID>>>,
    next_fresh: u16,
}

impl RuleDraft {
    pub(crate) fn new(grammar: &Grammar) -> Self {
        let mut order = vec![];
        let mut names = Map::default();
        let mut alts: Map<NonterminalID, Vec<Vec<SymbolID>>> = Map::default();
        for n in grammar.nonterminals.values() {
            if n.id == NonterminalID::START {
                continue;
            }
            order.push(n.id);
            names.insert(n.id, n.name.clone());
            alts.insert(
                n.id,
                grammar.rules_of(n.id).map(|rule| rule.right.clone()).collect(),
            );
        }
        Self {
            order,
            names,
            alts,
            next_fresh: grammar.nonterminals.len() as u16,
        }
    }

    /// The definition order at this point, including fresh nonterminals.
    pub(crate) fn order(&self) -> Vec<NonterminalID> {
        self.order.clone()
    }

    pub(crate) fn name(&self, n: NonterminalID) -> &str {
        &self.names[&n]
    }

    pub(crate) fn alts(&self, n: NonterminalID) -> &[Vec<SymbolID>] {
        &self.alts[&n]
    }

    pub(crate) fn alts_mut(&mut self, n: NonterminalID) -> &mut Vec<Vec<SymbolID>> {
        &mut self.alts[&n]
    }

    pub(crate) fn set_alts(&mut self, n: NonterminalID, alts: Vec<Vec<SymbolID>>) {
        self.alts[&n] = alts;
    }

    /// Add an alternative unless an identical one is already present.
    pub(crate) fn add_alt(&mut self, n: NonterminalID, alt: Vec<SymbolID>) -> bool {
        let alts = &mut self.alts[&n];
        if alts.contains(&alt) {
            return false;
        }
        alts.push(alt);
        true
    }

    /// Introduce a fresh nonterminal named after `base` with the
    /// deterministic prime-suffix scheme, placed immediately after
    /// `after` in definition order.
    pub(crate) fn fresh_nonterminal(
        &mut self,
        base: NonterminalID,
        after: NonterminalID,
    ) -> NonterminalID {
        let mut name = format!("{}'", self.names[&base]);
        while self.names.values().any(|existing| *existing == name) {
            name.push('\'');
        }

        let id = NonterminalID::from_raw(self.next_fresh);
        self.next_fresh += 1;
        self.names.insert(id, name);
        self.alts.insert(id, vec![]);

        let pos = self
            .order
            .iter()
            .position(|n| *n == after)
            .expect("`after' is not part of this draft");
        self.order.insert(pos + 1, id);
        id
    }

    /// Keep only the listed nonterminals.
    pub(crate) fn retain(&mut self, keep: &Set<NonterminalID>) {
        self.order.retain(|n| keep.contains(n));
        self.names.retain(|n, _| keep.contains(n));
        self.alts.retain(|n, _| keep.contains(n));
    }

    /// Drop nonterminals left without any alternative.
    pub(crate) fn drop_empty_rules(&mut self) {
        let keep: Set<NonterminalID> = self
            .alts
            .iter()
            .filter_map(|(n, alts)| (!alts.is_empty()).then_some(*n))
            .collect();
        self.retain(&keep);
    }

    /// Rebuild a grammar: nonterminal IDs are compacted in draft order,
    /// terminals are carried over from the source grammar (optionally
    /// dropping the ones no production mentions any more), and the
    /// augmentation rule is reinstalled.
    pub(crate) fn finish(self, grammar: &Grammar, drop_unused_terminals: bool) -> Grammar {
        let mut remap = Map::<NonterminalID, NonterminalID>::default();
        let mut nonterminals = Map::<NonterminalID, Nonterminal>::default();
        nonterminals.insert(NonterminalID::START, Nonterminal {
            id: NonterminalID::START,
            name: "S'".to_owned(),
        });
        for (i, old) in self.order.iter().enumerate() {
            let id = NonterminalID::from_raw(i as u16 + 1);
            remap.insert(*old, id);
            nonterminals.insert(id, Nonterminal {
                id,
                name: self.names[old].clone(),
            });
        }

        let used_terminals: Set<TerminalID> = self
            .alts
            .values()
            .flatten()
            .flatten()
            .filter_map(|symbol| match symbol {
                SymbolID::T(t) => Some(*t),
                SymbolID::N(..) => None,
            })
            .collect();
        let mut terminals = Map::<TerminalID, Terminal>::default();
        for t in grammar.terminals.values() {
            if drop_unused_terminals && t.id != TerminalID::EOI && !used_terminals.contains(&t.id)
            {
                continue;
            }
            terminals.insert(t.id, Terminal {
                id: t.id,
                name: t.name.clone(),
                class: t.class.clone(),
            });
        }

        let start = remap
            .get(&grammar.start_symbol)
            .copied()
            .expect("transforms must preserve the start symbol");

        let mut rules = Map::<RuleID, Rule>::default();
        let mut next_rule = 1u16;
        for old in &self.order {
            for alt in &self.alts[old] {
                let id = RuleID::from_raw(next_rule);
                next_rule += 1;
                let right = alt
                    .iter()
                    .map(|symbol| match symbol {
                        SymbolID::T(t) => SymbolID::T(*t),
                        SymbolID::N(n) => SymbolID::N(remap[n]),
                    })
                    .collect();
                rules.insert(id, Rule {
                    id,
                    left: remap[old],
                    right,
                });
            }
        }
        rules.insert(RuleID::ACCEPT, Rule {
            id: RuleID::ACCEPT,
            left: NonterminalID::START,
            right: vec![SymbolID::N(start)],
        });

        Grammar {
            terminals,
            nonterminals,
            rules,
            start_symbol: start,
        }
    }
}

/// Structural deduplication of alternatives, first occurrence wins.
pub(crate) fn dedup_alts(alts: Vec<Vec<SymbolID>>) -> Vec<Vec<SymbolID>> {
    let mut seen = Set::<Vec<SymbolID>>::default();
    alts.into_iter().filter(|alt| seen.insert(alt.clone())).collect()
}
