//! The shift-reduce engine driving any LR table.

use super::{join_expected, ParseError};
use crate::{
    grammar::{Grammar, SymbolID, TerminalID},
    lr::StateID,
    table::{LrAction, LrTable, TableError},
    token::{Token, TokenStream},
    tree::{NodeID, ParseTree},
};

/// A bottom-up parser driven by an [`LrTable`]. The same engine runs
/// SLR(1), CLR(1), and LALR(1) tables; only construction differs.
#[derive(Debug)]
pub struct LrParser<'g> {
    grammar: &'g Grammar,
    table: LrTable,
}

impl<'g> LrParser<'g> {
    pub fn slr(grammar: &'g Grammar, allow_ambig: bool) -> Result<Self, TableError> {
        Ok(Self::from_table(grammar, LrTable::slr(grammar, allow_ambig)?))
    }

    pub fn clr(grammar: &'g Grammar, allow_ambig: bool) -> Result<Self, TableError> {
        Ok(Self::from_table(grammar, LrTable::clr(grammar, allow_ambig)?))
    }

    pub fn lalr(grammar: &'g Grammar, allow_ambig: bool) -> Result<Self, TableError> {
        Ok(Self::from_table(grammar, LrTable::lalr(grammar, allow_ambig)?))
    }

    pub fn from_table(grammar: &'g Grammar, table: LrTable) -> Self {
        Self { grammar, table }
    }

    pub fn table(&self) -> &LrTable {
        &self.table
    }

    /// Shift/reduce resolutions recorded during construction.
    pub fn warnings(&self) -> &[String] {
        self.table.warnings()
    }

    pub fn parse<S>(&self, stream: &mut S) -> Result<ParseTree, ParseError>
    where
        S: TokenStream,
    {
        self.parse_with_trace(stream, &mut |_| {})
    }

    /// Parse with a trace callback receiving one line per shift, reduce,
    /// goto, and accept.
    pub fn parse_with_trace<S>(
        &self,
        stream: &mut S,
        trace: &mut dyn FnMut(&str),
    ) -> Result<ParseTree, ParseError>
    where
        S: TokenStream,
    {
        let span = tracing::trace_span!("lr_parse");
        let _entered = span.enter();

        let g = self.grammar;
        let mut tree = ParseTree::new();
        let mut states = vec![StateID::START];
        let mut subtrees: Vec<NodeID> = vec![];

        loop {
            let top = *states.last().expect("the state stack never empties");
            let lookahead = match stream.peek() {
                Some(token) => match g.terminal_by_class(&token.class().id) {
                    Some(t) => t,
                    None => {
                        let message =
                            format!("unrecognized token class `{}'", token.class().id);
                        return Err(ParseError::at_token(message, token));
                    }
                },
                None => TerminalID::EOI,
            };

            match self.table.action(top, lookahead) {
                Some(LrAction::Shift(target)) => {
                    // a shift on `$` cannot be constructed, so the stream
                    // still holds a token here
                    if let Some(token) = stream.next_token() {
                        trace(&format!("shift {} => {}", token.lexeme(), target));
                        let node =
                            tree.add_terminal(g.symbol_name(SymbolID::T(lookahead)), token.lexeme());
                        subtrees.push(node);
                        states.push(target);
                    }
                }
                Some(LrAction::Reduce(rule_id)) => {
                    let rule = g.rule(rule_id);
                    trace(&format!("reduce {}", rule.display(g)));

                    let arity = rule.right.len();
                    let mut children = subtrees.split_off(subtrees.len() - arity);
                    states.truncate(states.len() - arity);
                    if arity == 0 {
                        children.push(tree.add_epsilon());
                    }
                    let node = tree.add_nonterminal(g.symbol_name(SymbolID::N(rule.left)), children);
                    subtrees.push(node);

                    let top = *states.last().expect("the state stack never empties");
                    let Some(target) = self.table.goto(top, rule.left) else {
                        // a validated table covers every reachable goto
                        unreachable!(
                            "missing goto for {} in state {}",
                            g.symbol_name(SymbolID::N(rule.left)),
                            top,
                        );
                    };
                    trace(&format!("goto {}", target));
                    states.push(target);
                }
                Some(LrAction::Accept) => {
                    trace("accept");
                    let Some(root) = subtrees.pop() else {
                        unreachable!("accept with an empty subtree stack");
                    };
                    tree.set_root(root);
                    return Ok(tree);
                }
                None => {
                    let expected: Vec<String> = g
                        .terminals
                        .values()
                        .filter(|terminal| self.table.action(top, terminal.id).is_some())
                        .map(|terminal| terminal.class.human.clone())
                        .collect();
                    let message = format!("expected {}", join_expected(&expected));
                    return Err(match stream.peek() {
                        Some(token) => ParseError::at_token(message, token),
                        None => ParseError::at_end(message),
                    });
                }
            }
        }
    }
}
