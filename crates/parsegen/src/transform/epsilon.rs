//! Epsilon-production elimination.

use super::draft::{dedup_alts, RuleDraft};
use crate::{
    grammar::{Grammar, NonterminalID, SymbolID},
    types::Set,
};

/// Remove every epsilon production.
///
/// Repeatedly picks a nonterminal `A` with an epsilon alternative and
/// rewrites every occurrence of `A` in other productions by enumerating
/// all present/elided subsets of the occurrences. Once processed, a
/// nonterminal is covered: epsilon alternatives propagated back into it
/// are pruned immediately instead of re-expanded.
///
/// A grammar whose language contains the empty string loses it; the
/// result has no epsilon production at all.
pub fn remove_epsilons(grammar: &Grammar) -> Grammar {
    let span = tracing::trace_span!("remove_epsilons");
    let _entered = span.enter();

    let mut d = RuleDraft::new(grammar);
    let mut covered = Set::<NonterminalID>::default();

    loop {
        let a = d
            .order()
            .into_iter()
            .find(|n| !covered.contains(n) && d.alts(*n).iter().any(|alt| alt.is_empty()));
        let Some(a) = a else { break };
        covered.insert(a);
        tracing::trace!(nonterminal = d.name(a), "eliminating epsilon production");

        // edge case: when epsilon is A's only production, occurrences of A
        // are elided outright, with no combinatorial expansion
        let only_epsilon = d.alts(a).iter().all(|alt| alt.is_empty());
        d.alts_mut(a).retain(|alt| !alt.is_empty());

        for b in d.order() {
            let mut rewritten: Vec<Vec<SymbolID>> = vec![];
            for alt in d.alts(b).to_vec() {
                let occurrences: Vec<usize> = alt
                    .iter()
                    .enumerate()
                    .filter_map(|(i, symbol)| (*symbol == SymbolID::N(a)).then_some(i))
                    .collect();
                if occurrences.is_empty() {
                    rewritten.push(alt);
                    continue;
                }

                if only_epsilon {
                    rewritten.push(
                        alt.iter()
                            .copied()
                            .filter(|symbol| *symbol != SymbolID::N(a))
                            .collect(),
                    );
                    continue;
                }

                // one keep/elide flag per occurrence, stepped through all
                // combinations odometer-style so the count of occurrences
                // is not capped by the machine word size
                let mut keep = vec![false; occurrences.len()];
                loop {
                    let variant: Vec<SymbolID> = alt
                        .iter()
                        .enumerate()
                        .filter_map(|(i, symbol)| {
                            match occurrences.iter().position(|o| *o == i) {
                                // elided occurrence
                                Some(slot) if !keep[slot] => None,
                                _ => Some(*symbol),
                            }
                        })
                        .collect();
                    rewritten.push(variant);

                    let Some(slot) = keep.iter().position(|flag| !flag) else {
                        break;
                    };
                    keep[..slot].iter_mut().for_each(|flag| *flag = false);
                    keep[slot] = true;
                }
            }

            // covered nonterminals never regain an epsilon alternative
            rewritten.retain(|alt| !(alt.is_empty() && covered.contains(&b)));
            d.set_alts(b, dedup_alts(rewritten));
        }
    }

    // a nonterminal whose only production was epsilon has been elided from
    // every right-hand side and keeps no alternative
    d.drop_empty_rules();
    d.finish(grammar, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_epsilon(g: &Grammar) -> bool {
        g.rules.values().any(|rule| rule.is_epsilon())
    }

    #[test]
    fn expands_occurrence_subsets() {
        // A -> a A | ε, so S -> A b A must expand to all elision choices
        let g = Grammar::from_str(
            "S -> A b A ;
             A -> a A | ε ;",
        )
        .unwrap();
        let out = remove_epsilons(&g);
        assert!(!has_epsilon(&out));

        let s = out.nonterminal_by_name("S").unwrap();
        let rendered: Vec<String> = out
            .rules_of(s)
            .map(|rule| rule.display(&out).to_string())
            .collect();
        assert_eq!(
            rendered,
            ["S -> b", "S -> A b", "S -> b A", "S -> A b A"]
        );

        let a = out.nonterminal_by_name("A").unwrap();
        let rendered: Vec<String> = out
            .rules_of(a)
            .map(|rule| rule.display(&out).to_string())
            .collect();
        assert_eq!(rendered, ["A -> a", "A -> a A"]);
    }

    #[test]
    fn elides_pure_epsilon_nonterminal() {
        // A only produces epsilon and must disappear entirely
        let g = Grammar::from_str(
            "S -> a A b ;
             A -> ε ;",
        )
        .unwrap();
        let out = remove_epsilons(&g);
        assert!(!has_epsilon(&out));
        assert!(out.nonterminal_by_name("A").is_none());

        let s = out.nonterminal_by_name("S").unwrap();
        let rendered: Vec<String> = out
            .rules_of(s)
            .map(|rule| rule.display(&out).to_string())
            .collect();
        assert_eq!(rendered, ["S -> a b"]);
    }

    #[test]
    fn propagated_epsilon_is_processed() {
        // eliding A's epsilon makes B epsilon-producing in turn
        let g = Grammar::from_str(
            "S -> B c ;
             B -> A ;
             A -> a | ε ;",
        )
        .unwrap();
        let out = remove_epsilons(&g);
        assert!(!has_epsilon(&out));
        out.validate().unwrap();

        let s = out.nonterminal_by_name("S").unwrap();
        let rendered: Vec<String> = out
            .rules_of(s)
            .map(|rule| rule.display(&out).to_string())
            .collect();
        assert_eq!(rendered, ["S -> c", "S -> B c"]);
    }

    #[test]
    fn expands_wide_occurrence_lists() {
        // 17 occurrences of the nullable nonterminal in one production
        let g = Grammar::from_str(&format!(
            "S -> {};
             A -> a | ε ;",
            "A ".repeat(17),
        ))
        .unwrap();
        let out = remove_epsilons(&g);
        assert!(!has_epsilon(&out));

        // the 2^17 variants collapse to one production per retained
        // count, the empty one eliminated in turn
        let s = out.nonterminal_by_name("S").unwrap();
        assert_eq!(out.rules_of(s).count(), 17);
    }

    #[test]
    fn idempotent() {
        let g = Grammar::from_str(
            "S -> A b A ;
             A -> a A | ε ;",
        )
        .unwrap();
        let once = remove_epsilons(&g);
        let twice = remove_epsilons(&once);
        assert_eq!(once.to_string(), twice.to_string());
    }
}
