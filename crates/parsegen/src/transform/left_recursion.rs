//! Left-recursion elimination (dragon book Algorithm 4.19).

use super::{
    draft::{dedup_alts, RuleDraft},
    epsilon::remove_epsilons,
    unit::remove_units,
};
use crate::grammar::{Grammar, SymbolID};

/// Eliminate direct and indirect left recursion.
///
/// The algorithm requires an epsilon- and unit-free grammar, so those
/// transforms run first. Nonterminals are ordered by reverse definition
/// order; for every earlier `Aj`, productions `Ai -> Aj γ` are substituted
/// by `Ai -> δ γ` for each `Aj -> δ`, then immediate left recursion on
/// `Ai` is split into `Ai -> β Ai'` and `Ai' -> α Ai' | ε`.
pub fn remove_left_recursion(grammar: &Grammar) -> Grammar {
    let span = tracing::trace_span!("remove_left_recursion");
    let _entered = span.enter();

    let grammar = remove_units(&remove_epsilons(grammar));
    let mut d = RuleDraft::new(&grammar);

    let order: Vec<_> = d.order().into_iter().rev().collect();
    for (i, &ai) in order.iter().enumerate() {
        // substitute the already-processed heads into leading position
        for &aj in &order[..i] {
            let mut substituted = vec![];
            for alt in d.alts(ai).to_vec() {
                if alt.first() == Some(&SymbolID::N(aj)) {
                    for delta in d.alts(aj).to_vec() {
                        let mut replacement = delta.clone();
                        replacement.extend_from_slice(&alt[1..]);
                        substituted.push(replacement);
                    }
                } else {
                    substituted.push(alt);
                }
            }
            d.set_alts(ai, dedup_alts(substituted));
        }

        // immediate left recursion on ai
        let (recursive, rest): (Vec<_>, Vec<_>) = d
            .alts(ai)
            .to_vec()
            .into_iter()
            .partition(|alt| alt.first() == Some(&SymbolID::N(ai)));
        if recursive.is_empty() {
            continue;
        }
        tracing::trace!(nonterminal = d.name(ai), "splitting left recursion");

        if rest.is_empty() {
            // no non-recursive alternative: a separate Ai' would be an
            // unreachable unit production, fold it back into Ai
            let mut alts = vec![];
            for alpha in recursive {
                let mut alt = alpha[1..].to_vec();
                alt.push(SymbolID::N(ai));
                alts.push(alt);
            }
            alts.push(vec![]);
            d.set_alts(ai, dedup_alts(alts));
            continue;
        }

        let prime = d.fresh_nonterminal(ai, ai);
        let mut alts = vec![];
        for beta in rest {
            let mut alt = beta;
            alt.push(SymbolID::N(prime));
            alts.push(alt);
        }
        d.set_alts(ai, dedup_alts(alts));

        let mut prime_alts = vec![];
        for alpha in recursive {
            let mut alt = alpha[1..].to_vec();
            alt.push(SymbolID::N(prime));
            prime_alts.push(alt);
        }
        prime_alts.push(vec![]);
        d.set_alts(prime, dedup_alts(prime_alts));
    }

    d.finish(&grammar, false)
}
