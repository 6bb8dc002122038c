//! Left factoring.

use super::draft::RuleDraft;
use crate::grammar::{Grammar, SymbolID};

/// Factor out common prefixes of alternatives.
///
/// For every head whose alternatives share a first symbol, the longest
/// common prefix of that group is hoisted into `A -> prefix A'` with the
/// differing suffixes moved to the fresh `A'`. Fresh heads are appended
/// to the work order, so suffixes that still share a prefix get factored
/// in turn; the result has no two alternatives of any head starting with
/// the same symbol.
pub fn left_factor(grammar: &Grammar) -> Grammar {
    let span = tracing::trace_span!("left_factor");
    let _entered = span.enter();

    let mut d = RuleDraft::new(grammar);
    let mut i = 0;
    while i < d.order().len() {
        let head = d.order()[i];
        i += 1;

        loop {
            let alts = d.alts(head);
            let group: Vec<usize> = match alts.iter().find_map(|alt| {
                let lead = *alt.first()?;
                let members: Vec<usize> = alts
                    .iter()
                    .enumerate()
                    .filter_map(|(j, other)| (other.first() == Some(&lead)).then_some(j))
                    .collect();
                (members.len() >= 2).then_some(members)
            }) {
                Some(group) => group,
                None => break,
            };

            let mut prefix_len = alts[group[0]].len();
            for &j in &group[1..] {
                let alt = &alts[group[0]];
                let other = &alts[j];
                let common = alt
                    .iter()
                    .zip(other.iter())
                    .take_while(|(a, b)| a == b)
                    .count();
                prefix_len = prefix_len.min(common);
            }

            tracing::trace!(
                head = d.name(head),
                prefix_len,
                alternatives = group.len(),
                "factoring common prefix"
            );

            let prime = d.fresh_nonterminal(head, head);
            let suffixes: Vec<Vec<SymbolID>> = group
                .iter()
                .map(|&j| d.alts(head)[j][prefix_len..].to_vec())
                .collect();

            let mut factored = d.alts(head)[group[0]][..prefix_len].to_vec();
            factored.push(SymbolID::N(prime));

            let rewritten: Vec<Vec<SymbolID>> = d
                .alts(head)
                .iter()
                .enumerate()
                .filter_map(|(j, alt)| {
                    if j == group[0] {
                        Some(factored.clone())
                    } else if group.contains(&j) {
                        None
                    } else {
                        Some(alt.clone())
                    }
                })
                .collect();
            d.set_alts(head, rewritten);
            d.set_alts(prime, suffixes);
        }
    }

    d.finish(grammar, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(g: &Grammar, name: &str) -> Vec<String> {
        let n = g.nonterminal_by_name(name).unwrap();
        g.rules_of(n).map(|rule| rule.display(g).to_string()).collect()
    }

    fn is_factored(g: &Grammar) -> bool {
        g.nonterminals.keys().all(|n| {
            let leads: Vec<_> = g.rules_of(*n).filter_map(|rule| rule.right.first()).collect();
            let mut sorted = leads.clone();
            sorted.sort();
            sorted.dedup();
            sorted.len() == leads.len()
        })
    }

    #[test]
    fn factors_dangling_else() {
        let g = Grammar::from_str(
            "S -> i E t S | i E t S e S | a ;
             E -> b ;",
        )
        .unwrap();
        let out = left_factor(&g);
        assert!(is_factored(&out));
        out.validate().unwrap();

        assert_eq!(rendered(&out, "S"), ["S -> i E t S S'", "S -> a"]);
        assert_eq!(rendered(&out, "S'"), ["S' -> ε", "S' -> e S"]);
    }

    #[test]
    fn factors_suffixes_recursively() {
        let g = Grammar::from_str("S -> a b c | a b d | a e ;").unwrap();
        let out = left_factor(&g);
        assert!(is_factored(&out));
        out.validate().unwrap();

        assert_eq!(rendered(&out, "S"), ["S -> a S'"]);
        assert_eq!(rendered(&out, "S'"), ["S' -> b S''", "S' -> e"]);
        assert_eq!(rendered(&out, "S''"), ["S'' -> c", "S'' -> d"]);
    }

    #[test]
    fn leaves_factored_grammar_alone() {
        let g = Grammar::from_str(
            "E -> lparen E rparen | id ;",
        )
        .unwrap();
        let out = left_factor(&g);
        assert_eq!(g.to_string(), out.to_string());
    }

    #[test]
    fn idempotent() {
        let g = Grammar::from_str(
            "S -> i E t S | i E t S e S | a ;
             E -> b ;",
        )
        .unwrap();
        let once = left_factor(&g);
        let twice = left_factor(&once);
        assert_eq!(once.to_string(), twice.to_string());
    }
}
