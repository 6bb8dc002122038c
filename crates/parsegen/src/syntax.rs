//! Grammar source DSL.
//!
//! Rules are separated by `;`, each of the form `HEAD -> ALT | ALT | ...`.
//! Heads match `[A-Z_-]+`; alternative symbols are space-separated;
//! lowercase spellings are terminals (auto-registered with a token class
//! derived from the spelling), uppercase spellings are nonterminals, and
//! `ε` on its own is the epsilon alternative. The marker is only the
//! Greek letter, so `e` and `E` remain ordinary symbols. The first
//! rule's head is the start symbol. `#` starts a line comment.

use crate::grammar::{Grammar, GrammarDef, NonterminalID, SymbolID, TokenClass};
use crate::types::Map;
use anyhow::{bail, ensure, Context as _};

pub fn parse(source: &str) -> anyhow::Result<Grammar> {
    let span = tracing::trace_span!("parse_grammar");
    let _entered = span.enter();

    let mut def = GrammarDef::default();
    let mut terminals = Map::<String, SymbolID>::default();
    let mut nonterminals = Map::<String, NonterminalID>::default();
    let mut start = None;

    let source: String = source
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");

    for segment in source.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (head, body) = segment
            .split_once("->")
            .with_context(|| format!("missing `->' in rule `{}'", segment))?;
        let head = head.trim();
        ensure!(
            !head.is_empty() && head.chars().all(|c| c.is_ascii_uppercase() || c == '_' || c == '-'),
            "rule head `{}' must match [A-Z_-]+",
            head
        );

        let head_id = match nonterminals.get(head) {
            Some(id) => *id,
            None => {
                let id = def.nonterminal(head)?;
                nonterminals.insert(head.to_owned(), id);
                id
            }
        };
        if start.is_none() {
            start = Some(head_id);
        }

        for alternative in body.split('|') {
            let elems: Vec<&str> = alternative.split_whitespace().collect();
            ensure!(
                !elems.is_empty(),
                "empty alternative in rule for `{}'",
                head
            );

            if elems.iter().any(|elem| is_epsilon(elem)) {
                ensure!(
                    elems.len() == 1,
                    "epsilon must be the sole symbol of its alternative in rule for `{}'",
                    head
                );
                tracing::trace!(head, "epsilon alternative");
                def.rule(head_id, [])?;
                continue;
            }

            let mut right = vec![];
            for elem in elems {
                right.push(classify(&mut def, &mut terminals, &mut nonterminals, elem)?);
            }
            tracing::trace!(head, ?right, "alternative");
            def.rule(head_id, right)?;
        }
    }

    let start = start.context("the grammar source defines no rule")?;
    def.start_symbol(start);
    def.end().map_err(Into::into)
}

fn is_epsilon(elem: &str) -> bool {
    elem == "ε"
}

fn classify(
    def: &mut GrammarDef,
    terminals: &mut Map<String, SymbolID>,
    nonterminals: &mut Map<String, NonterminalID>,
    elem: &str,
) -> anyhow::Result<SymbolID> {
    if elem
        .chars()
        .all(|c| c.is_ascii_uppercase() || c == '_' || c == '-' || c == '\'')
    {
        let id = match nonterminals.get(elem) {
            Some(id) => *id,
            None => {
                let id = def.nonterminal(elem)?;
                nonterminals.insert(elem.to_owned(), id);
                id
            }
        };
        return Ok(SymbolID::N(id));
    }

    if elem.chars().any(|c| c.is_ascii_uppercase()) {
        bail!(
            "`{}' mixes letter cases; terminals are lowercase, nonterminals uppercase",
            elem
        );
    }

    match terminals.get(elem) {
        Some(id) => Ok(*id),
        None => {
            let id = def.terminal(elem, TokenClass::from_id(elem))?;
            let symbol = SymbolID::T(id);
            terminals.insert(elem.to_owned(), symbol);
            Ok(symbol)
        }
    }
}
