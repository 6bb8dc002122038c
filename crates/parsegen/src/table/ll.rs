//! The LL(1) predictive parse table.

use super::TableError;
use crate::{
    analysis::{check_ll1, FirstSets, FollowSets, Ll1Conflict},
    grammar::{Grammar, NonterminalID, RuleID, SymbolID, TerminalID},
    types::{display_with, Map},
};
use std::fmt;

/// A filled LL(1) table. A missing cell is the error entry: the terminal
/// cannot begin any expansion of the nonterminal in that context.
#[derive(Debug)]
pub struct LlTable {
    pub(crate) cells: Map<(NonterminalID, TerminalID), RuleID>,
}

impl LlTable {
    /// Build the table per the textbook fill: for `A -> α`, every
    /// terminal in FIRST(α) selects the production, and when α can
    /// vanish, so does every terminal in FOLLOW(A), `$` included.
    ///
    /// The grammar must pass [`check_ll1`] first; the cell fill still
    /// rejects any residual collision the pairwise check missed.
    pub fn build(grammar: &Grammar) -> Result<Self, TableError> {
        let span = tracing::trace_span!("ll_table");
        let _entered = span.enter();

        let first = FirstSets::new(grammar);
        let follow = FollowSets::new(grammar, &first);
        check_ll1(grammar, &first, &follow)?;

        let mut cells = Map::<(NonterminalID, TerminalID), RuleID>::default();
        let mut fill = |n: NonterminalID, t: TerminalID, rule: RuleID| {
            match cells.insert((n, t), rule) {
                Some(prev) if prev != rule => Err(Ll1Conflict::TableCell {
                    head: grammar.nonterminals[&n].name.clone(),
                    terminal: grammar.symbol_name(SymbolID::T(t)).to_owned(),
                    first: grammar.rule(prev).display(grammar).to_string(),
                    second: grammar.rule(rule).display(grammar).to_string(),
                }),
                _ => Ok(()),
            }
        };

        for rule in grammar.rules.values() {
            if rule.id == RuleID::ACCEPT {
                continue;
            }
            let (first_alpha, nullable) = first.first_of(&rule.right);
            for t in first_alpha.iter() {
                fill(rule.left, t, rule.id)?;
            }
            if nullable {
                for t in follow.follow(rule.left).iter() {
                    fill(rule.left, t, rule.id)?;
                }
            }
        }

        Ok(Self { cells })
    }

    /// The production selected for `n` on lookahead `t`. `None` is the
    /// error entry.
    pub fn production(&self, n: NonterminalID, t: TerminalID) -> Option<RuleID> {
        self.cells.get(&(n, t)).copied()
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_with(|f| {
            for ((n, t), rule) in &self.cells {
                writeln!(
                    f,
                    "[{}, {}] => {}",
                    g.symbol_name(SymbolID::N(*n)),
                    g.symbol_name(SymbolID::T(*t)),
                    g.rule(*rule).display(g),
                )?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::TerminalID;

    fn ll_expression_grammar() -> Grammar {
        Grammar::from_str(
            "E -> T E_TAIL ;
             E_TAIL -> plus T E_TAIL | ε ;
             T -> F T_TAIL ;
             T_TAIL -> star F T_TAIL | ε ;
             F -> lparen E rparen | id ;",
        )
        .unwrap()
    }

    #[test]
    fn fills_the_textbook_cells() {
        let g = ll_expression_grammar();
        let table = LlTable::build(&g).unwrap();

        let e_tail = g.nonterminal_by_name("E_TAIL").unwrap();
        let plus = g.terminal_by_name("plus").unwrap();
        let rparen = g.terminal_by_name("rparen").unwrap();

        let on_plus = g.rule(table.production(e_tail, plus).unwrap());
        assert_eq!(on_plus.display(&g).to_string(), "E_TAIL -> plus T E_TAIL");

        // the epsilon production covers FOLLOW(E_TAIL), `$` included
        let on_rparen = g.rule(table.production(e_tail, rparen).unwrap());
        assert!(on_rparen.is_epsilon());
        let on_eoi = g.rule(table.production(e_tail, TerminalID::EOI).unwrap());
        assert!(on_eoi.is_epsilon());

        // error entry
        let star = g.terminal_by_name("star").unwrap();
        assert!(table.production(e_tail, star).is_none());
    }

    #[test]
    fn rejects_left_recursive_grammar() {
        let g = Grammar::from_str(
            "E -> E plus T | T ;
             T -> T star F | F ;
             F -> lparen E rparen | id ;",
        )
        .unwrap();
        assert!(matches!(LlTable::build(&g), Err(TableError::NotLl1(..))));
    }

    #[test]
    fn construction_is_deterministic() {
        let g = ll_expression_grammar();
        let first = LlTable::build(&g).unwrap().display(&g).to_string();
        let second = LlTable::build(&g).unwrap().display(&g).to_string();
        assert_eq!(first, second);
    }
}
