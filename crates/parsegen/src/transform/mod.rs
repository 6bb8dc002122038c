//! Grammar transforms.
//!
//! Every transform snapshots the ordered nonterminal list, rewrites a
//! working copy ([`draft::RuleDraft`]), and returns a freshly built
//! [`Grammar`]; the input grammar is never mutated. Each transform is
//! idempotent on its own output.

mod draft;
mod epsilon;
mod left_factor;
mod left_recursion;
mod unit;

pub use self::epsilon::remove_epsilons;
pub use self::left_factor::left_factor;
pub use self::left_recursion::remove_left_recursion;
pub use self::unit::remove_units;

use self::draft::RuleDraft;
use crate::{
    grammar::{Grammar, NonterminalID, SymbolID},
    types::{Queue, Set},
};

impl Grammar {
    /// Remove nonterminals unreachable from the start symbol, and any
    /// terminal left without a use.
    pub fn remove_unreachable(&self) -> Grammar {
        let d = RuleDraft::new(self);

        let mut reachable = Set::<NonterminalID>::default();
        let mut queue: Queue<NonterminalID> = Some(self.start_symbol).into_iter().collect();
        while let Some(n) = queue.pop() {
            reachable.insert(n);
            for alt in d.alts(n) {
                for symbol in alt {
                    if let SymbolID::N(m) = symbol {
                        queue.push(*m);
                    }
                }
            }
        }

        let mut d = d;
        d.retain(&reachable);
        d.finish(self, true)
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::Grammar;

    #[test]
    fn removes_unreachable_nonterminals_and_terminals() {
        let g = Grammar::from_str(
            "S -> a S | b ;
             DEAD -> c DEAD | d ;",
        )
        .unwrap();
        let trimmed = g.remove_unreachable();

        assert!(trimmed.nonterminal_by_name("S").is_some());
        assert!(trimmed.nonterminal_by_name("DEAD").is_none());
        assert!(trimmed.terminal_by_name("a").is_some());
        assert!(trimmed.terminal_by_name("c").is_none());
        trimmed.validate().unwrap();
    }
}
