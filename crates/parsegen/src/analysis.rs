//! FIRST/FOLLOW set calculation and the LL(1) condition.

use crate::grammar::{
    Grammar, NonterminalID, RuleID, SymbolID, TerminalID, TerminalIDSet,
};
use crate::types::{Map, Set};

/// FIRST sets for every grammar symbol.
///
/// Epsilon membership is tracked separately as nullability: `ε ∈ FIRST(X)`
/// iff `X` can derive the empty string, which is exactly [`FirstSets::nullable`].
#[derive(Debug)]
pub struct FirstSets {
    nullables: Set<NonterminalID>,
    sets: Map<SymbolID, TerminalIDSet>,
}

impl FirstSets {
    pub fn new(grammar: &Grammar) -> Self {
        let nullables = nullables_set(grammar);
        let sets = first_sets(grammar, &nullables);
        Self { nullables, sets }
    }

    pub fn nullable(&self, n: NonterminalID) -> bool {
        self.nullables.contains(&n)
    }

    pub fn nullable_symbol(&self, symbol: SymbolID) -> bool {
        match symbol {
            SymbolID::T(..) => false,
            SymbolID::N(n) => self.nullable(n),
        }
    }

    /// `FIRST(X)` without the epsilon marker; pair with [`Self::nullable_symbol`].
    pub fn first(&self, symbol: SymbolID) -> &TerminalIDSet {
        &self.sets[&symbol]
    }

    /// `FIRST(X1 X2 ... Xn)`: concatenates left to right, short-circuiting
    /// at the first non-nullable symbol. The boolean is the epsilon flag,
    /// true only when epsilon survived through every symbol.
    pub fn first_of(&self, symbols: &[SymbolID]) -> (TerminalIDSet, bool) {
        let mut result = TerminalIDSet::default();
        for symbol in symbols {
            result.union_with(&self.sets[symbol]);
            if !self.nullable_symbol(*symbol) {
                return (result, false);
            }
        }
        (result, true)
    }
}

/// The set of nullable nonterminals, iterated to quiescence.
fn nullables_set(grammar: &Grammar) -> Set<NonterminalID> {
    let mut nullables: Set<NonterminalID> = grammar
        .rules
        .values()
        .filter(|rule| rule.is_epsilon())
        .map(|rule| rule.left)
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for rule in grammar.rules.values() {
            if nullables.contains(&rule.left) {
                continue;
            }
            let rhs_nullable = rule.right.iter().all(|symbol| match symbol {
                SymbolID::T(..) => false,
                SymbolID::N(n) => nullables.contains(n),
            });
            if rhs_nullable {
                nullables.insert(rule.left);
                changed = true;
            }
        }
    }

    nullables
}

/// FIRST as superset-constraint propagation.
///
/// For a rule `X -> Y1 Y2 ... Yn`, walk the right-hand side until the
/// first non-nullable symbol `Yk`; each of `Y1..Yk` contributes the
/// constraint `FIRST(X) ⊇ FIRST(Yi)`. Resolving the constraints to a
/// fixed point yields the FIRST sets.
fn first_sets(
    grammar: &Grammar,
    nullables: &Set<NonterminalID>,
) -> Map<SymbolID, TerminalIDSet> {
    let mut map: Map<SymbolID, TerminalIDSet> = Map::default();

    // FIRST(t) = {t} for terminal symbols
    for id in grammar.terminals.keys() {
        map.insert(SymbolID::T(*id), Some(*id).into_iter().collect());
    }
    for id in grammar.nonterminals.keys() {
        map.insert(SymbolID::N(*id), TerminalIDSet::default());
    }

    struct Constraint {
        sup: SymbolID,
        sub: SymbolID,
    }
    let mut constraints = vec![];
    for rule in grammar.rules.values() {
        if rule.id == RuleID::ACCEPT {
            continue;
        }
        for symbol in &rule.right {
            if SymbolID::N(rule.left) != *symbol {
                constraints.push(Constraint {
                    sup: SymbolID::N(rule.left),
                    sub: *symbol,
                });
            }
            let symbol_nullable = matches!(symbol, SymbolID::N(n) if nullables.contains(n));
            if !symbol_nullable {
                break;
            }
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for Constraint { sup, sub } in &constraints {
            let subset = map[sub].clone();
            let superset = &mut map[sup];
            let before = superset.len();
            superset.union_with(&subset);
            changed |= superset.len() != before;
        }
    }

    map
}

/// FOLLOW sets for every nonterminal.
#[derive(Debug)]
pub struct FollowSets {
    sets: Map<NonterminalID, TerminalIDSet>,
}

impl FollowSets {
    pub fn new(grammar: &Grammar, first: &FirstSets) -> Self {
        let mut sets: Map<NonterminalID, TerminalIDSet> = grammar
            .nonterminals
            .keys()
            .map(|n| (*n, TerminalIDSet::default()))
            .collect();

        // the augmented start is followed by the end of input
        sets[&NonterminalID::START].insert(TerminalID::EOI);

        let mut changed = true;
        while changed {
            changed = false;
            for rule in grammar.rules.values() {
                for (i, symbol) in rule.right.iter().enumerate() {
                    let n = match symbol {
                        SymbolID::N(n) => *n,
                        SymbolID::T(..) => continue,
                    };
                    let (rest_first, rest_nullable) = first.first_of(&rule.right[i + 1..]);

                    let target = &mut sets[&n];
                    let before = target.len();
                    target.union_with(&rest_first);
                    changed |= target.len() != before;

                    if rest_nullable {
                        let from = sets[&rule.left].clone();
                        let target = &mut sets[&n];
                        let before = target.len();
                        target.union_with(&from);
                        changed |= target.len() != before;
                    }
                }
            }
        }

        Self { sets }
    }

    pub fn follow(&self, n: NonterminalID) -> &TerminalIDSet {
        &self.sets[&n]
    }
}

/// The specific violation found by [`check_ll1`].
#[derive(Debug, thiserror::Error)]
pub enum Ll1Conflict {
    #[error(
        "FIRST/FIRST conflict in `{}': `{}' and `{}' both start with `{}'",
        head,
        left,
        right,
        terminal
    )]
    FirstFirst {
        head: String,
        left: String,
        right: String,
        terminal: String,
    },

    #[error("`{}' has multiple nullable alternatives (`{}' and `{}')", head, left, right)]
    MultipleNullable {
        head: String,
        left: String,
        right: String,
    },

    #[error(
        "FIRST/FOLLOW conflict in `{}': `{}' starts with `{}' which may follow `{}'",
        head,
        alternative,
        terminal,
        head
    )]
    FirstFollow {
        head: String,
        alternative: String,
        terminal: String,
    },

    #[error(
        "table cell conflict: `{}' on `{}' selects both `{}' and `{}'",
        head,
        terminal,
        first,
        second
    )]
    TableCell {
        head: String,
        terminal: String,
        first: String,
        second: String,
    },
}

/// Check the pairwise LL(1) condition for every rule.
///
/// The disjointness test deliberately inspects FIRST of each alternative's
/// *first symbol* only (not FIRST of the whole alternative); the LL(1)
/// table builder reports any residual cell collision during fill.
pub fn check_ll1(
    grammar: &Grammar,
    first: &FirstSets,
    follow: &FollowSets,
) -> Result<(), Ll1Conflict> {
    for n in grammar.nonterminals.keys() {
        if *n == NonterminalID::START {
            continue;
        }
        let alternatives: Vec<_> = grammar.rules_of(*n).collect();
        for (i, p) in alternatives.iter().enumerate() {
            for q in &alternatives[i + 1..] {
                let p_first = leading_first(first, p.right.first());
                let q_first = leading_first(first, q.right.first());
                if !p_first.is_disjoint(&q_first) {
                    let t = p_first.iter().find(|t| q_first.contains(*t)).unwrap();
                    return Err(Ll1Conflict::FirstFirst {
                        head: grammar.nonterminals[n].name.clone(),
                        left: p.display(grammar).to_string(),
                        right: q.display(grammar).to_string(),
                        terminal: grammar.symbol_name(SymbolID::T(t)).to_owned(),
                    });
                }

                let p_eps = derives_epsilon(first, p.right.as_slice());
                let q_eps = derives_epsilon(first, q.right.as_slice());
                if p_eps && q_eps {
                    return Err(Ll1Conflict::MultipleNullable {
                        head: grammar.nonterminals[n].name.clone(),
                        left: p.display(grammar).to_string(),
                        right: q.display(grammar).to_string(),
                    });
                }
                let partner = if p_eps {
                    q
                } else if q_eps {
                    p
                } else {
                    continue;
                };
                let partner_first = leading_first(first, partner.right.first());
                let head_follow = follow.follow(*n);
                if !partner_first.is_disjoint(head_follow) {
                    let t = partner_first
                        .iter()
                        .find(|t| head_follow.contains(*t))
                        .unwrap();
                    return Err(Ll1Conflict::FirstFollow {
                        head: grammar.nonterminals[n].name.clone(),
                        alternative: partner.display(grammar).to_string(),
                        terminal: grammar.symbol_name(SymbolID::T(t)).to_owned(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn leading_first(first: &FirstSets, leading: Option<&SymbolID>) -> TerminalIDSet {
    match leading {
        Some(symbol) => first.first(*symbol).clone(),
        None => TerminalIDSet::default(),
    }
}

fn derives_epsilon(first: &FirstSets, right: &[SymbolID]) -> bool {
    right.iter().all(|symbol| first.nullable_symbol(*symbol))
}
