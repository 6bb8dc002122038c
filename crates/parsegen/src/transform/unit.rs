//! Unit-production elimination.

use super::draft::RuleDraft;
use crate::{
    grammar::{Grammar, NonterminalID, SymbolID},
    types::Set,
};

/// Remove every unit production `A -> B`.
///
/// For each head, unit alternatives are repeatedly replaced by the
/// productions of the referenced nonterminal, skipping productions that
/// would cycle straight back to the head and duplicates of alternatives
/// already present. Each head hoists from any given nonterminal at most
/// once, which breaks unit cycles. Finishes by removing nonterminals the
/// hoisting left unreachable.
pub fn remove_units(grammar: &Grammar) -> Grammar {
    let span = tracing::trace_span!("remove_units");
    let _entered = span.enter();

    let mut d = RuleDraft::new(grammar);
    for a in d.order() {
        let mut hoisted = Set::<NonterminalID>::default();
        hoisted.insert(a);
        loop {
            let unit = d.alts(a).iter().find_map(|alt| match alt[..] {
                [SymbolID::N(b)] => Some(b),
                _ => None,
            });
            let Some(b) = unit else { break };

            d.alts_mut(a).retain(|alt| alt[..] != [SymbolID::N(b)]);
            if !hoisted.insert(b) {
                // hoisting from b again could only reintroduce what the
                // first hoist already considered
                continue;
            }
            tracing::trace!(head = d.name(a), from = d.name(b), "hoisting unit production");
            for alt in d.alts(b).to_vec() {
                if alt[..] == [SymbolID::N(a)] {
                    continue; // would cycle back to the head
                }
                d.add_alt(a, alt);
            }
        }
    }

    d.finish(grammar, false).remove_unreachable()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_unit(g: &Grammar) -> bool {
        g.rules
            .values()
            .filter(|rule| rule.id != crate::grammar::RuleID::ACCEPT)
            .any(|rule| matches!(rule.right[..], [SymbolID::N(..)]))
    }

    #[test]
    fn hoists_chained_units() {
        let g = Grammar::from_str(
            "E -> E plus T | T ;
             T -> T star F | F ;
             F -> lparen E rparen | id ;",
        )
        .unwrap();
        let out = remove_units(&g);
        assert!(!has_unit(&out));
        out.validate().unwrap();

        let e = out.nonterminal_by_name("E").unwrap();
        let rendered: Vec<String> = out
            .rules_of(e)
            .map(|rule| rule.display(&out).to_string())
            .collect();
        assert_eq!(
            rendered,
            [
                "E -> E plus T",
                "E -> T star F",
                "E -> lparen E rparen",
                "E -> id",
            ]
        );
    }

    #[test]
    fn breaks_unit_cycles() {
        // A and B form a unit cycle with an escape each
        let g = Grammar::from_str(
            "A -> B | a ;
             B -> A | b ;",
        )
        .unwrap();
        let out = remove_units(&g);
        assert!(!has_unit(&out));

        let a = out.nonterminal_by_name("A").unwrap();
        let rendered: Vec<String> = out
            .rules_of(a)
            .map(|rule| rule.display(&out).to_string())
            .collect();
        assert_eq!(rendered, ["A -> a", "A -> b"]);

        // B became unreachable and is removed
        assert!(out.nonterminal_by_name("B").is_none());
    }

    #[test]
    fn idempotent() {
        let g = Grammar::from_str(
            "E -> E plus T | T ;
             T -> T star F | F ;
             F -> lparen E rparen | id ;",
        )
        .unwrap();
        let once = remove_units(&g);
        let twice = remove_units(&once);
        assert_eq!(once.to_string(), twice.to_string());
    }
}
