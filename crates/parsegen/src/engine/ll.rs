//! The LL(1) predictive engine.

use super::ParseError;
use crate::{
    grammar::{Grammar, SymbolID, TerminalID},
    table::{LlTable, TableError},
    token::{Token, TokenStream},
    tree::{NodeID, ParseTree},
};

/// A top-down parser driven by an [`LlTable`].
#[derive(Debug)]
pub struct LlParser<'g> {
    grammar: &'g Grammar,
    table: LlTable,
}

impl<'g> LlParser<'g> {
    /// Build the LL(1) table for `grammar`. Fails if the grammar is not
    /// LL(1).
    pub fn new(grammar: &'g Grammar) -> Result<Self, TableError> {
        Ok(Self {
            grammar,
            table: LlTable::build(grammar)?,
        })
    }

    pub fn table(&self) -> &LlTable {
        &self.table
    }

    pub fn parse<S>(&self, stream: &mut S) -> Result<ParseTree, ParseError>
    where
        S: TokenStream,
    {
        self.parse_with_trace(stream, &mut |_| {})
    }

    /// Parse with a trace callback receiving one line per pop, match, and
    /// expansion.
    pub fn parse_with_trace<S>(
        &self,
        stream: &mut S,
        trace: &mut dyn FnMut(&str),
    ) -> Result<ParseTree, ParseError>
    where
        S: TokenStream,
    {
        let span = tracing::trace_span!("ll_parse");
        let _entered = span.enter();

        let g = self.grammar;
        let mut tree = ParseTree::new();
        let start = g.start_symbol;
        let root = tree.add_nonterminal(g.symbol_name(SymbolID::N(start)), vec![]);
        tree.set_root(root);

        let mut stack: Vec<(SymbolID, NodeID)> = vec![(SymbolID::N(start), root)];
        while let Some((symbol, node)) = stack.pop() {
            trace(&format!("pop {}", g.symbol_name(symbol)));
            match symbol {
                SymbolID::T(t) => {
                    let expected = &g.terminals[&t];
                    let matched = stream
                        .peek()
                        .map_or(false, |token| token.class().id == expected.class.id);
                    if !matched {
                        let message = format!("expected {}", expected.class.human);
                        return Err(match stream.peek() {
                            Some(token) => ParseError::at_token(message, token),
                            None => ParseError::at_end(message),
                        });
                    }
                    if let Some(token) = stream.next_token() {
                        trace(&format!("match {}", token.lexeme()));
                        tree.set_lexeme(node, token.lexeme());
                    }
                }
                SymbolID::N(n) => {
                    let lookahead = match stream.peek() {
                        Some(token) => match g.terminal_by_class(&token.class().id) {
                            Some(t) => t,
                            None => {
                                let message = format!(
                                    "unrecognized token class `{}'",
                                    token.class().id
                                );
                                return Err(ParseError::at_token(message, token));
                            }
                        },
                        None => TerminalID::EOI,
                    };

                    let Some(rule_id) = self.table.production(n, lookahead) else {
                        return Err(match stream.peek() {
                            Some(token) => ParseError::at_token(
                                format!("unexpected {}", token.class().human),
                                token,
                            ),
                            None => ParseError::at_end(format!(
                                "unexpected end of input while expanding {}",
                                g.symbol_name(symbol),
                            )),
                        });
                    };

                    let rule = g.rule(rule_id);
                    trace(&format!("expand {}", rule.display(g)));
                    if rule.right.is_empty() {
                        let eps = tree.add_epsilon();
                        tree.attach(node, eps);
                        continue;
                    }

                    let mut expansion = Vec::with_capacity(rule.right.len());
                    for symbol in &rule.right {
                        let child = match symbol {
                            SymbolID::T(..) => tree.add_terminal(g.symbol_name(*symbol), ""),
                            SymbolID::N(..) => {
                                tree.add_nonterminal(g.symbol_name(*symbol), vec![])
                            }
                        };
                        tree.attach(node, child);
                        expansion.push((*symbol, child));
                    }
                    for entry in expansion.into_iter().rev() {
                        stack.push(entry);
                    }
                }
            }
        }

        if let Some(token) = stream.peek() {
            return Err(ParseError::at_token(
                format!("expected end of input, found {}", token.class().human),
                token,
            ));
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokens;

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
    fn parses_expression() {
        let g = ll_expression_grammar();
        let parser = LlParser::new(&g).unwrap();
        let tree = parser.parse(&mut tokens("id plus id star id")).unwrap();
        assert_eq!(
            tree.sexp(),
            "(E (T (F id) (T_TAIL ε)) \
             (E_TAIL plus (T (F id) (T_TAIL star (F id) (T_TAIL ε))) (E_TAIL ε)))"
        );
    }

    #[test]
    fn rejects_unexpected_token() {
        let g = ll_expression_grammar();
        let parser = LlParser::new(&g).unwrap();
        let err = parser.parse(&mut tokens("plus id")).unwrap_err();
        let ParseError::Syntax { message, lexeme, .. } = err;
        assert!(message.contains("unexpected plus"), "{}", message);
        assert_eq!(lexeme, "plus");
    }

    #[test]
    fn rejects_trailing_input() {
        // the stack must empty with input remaining to reach the
        // trailing-input check; a nullable tail nonterminal would fail
        // its table lookup first
        let g = Grammar::from_str("S -> a ;").unwrap();
        let parser = LlParser::new(&g).unwrap();
        let err = parser.parse(&mut tokens("a a")).unwrap_err();
        let ParseError::Syntax { message, lexeme, .. } = err;
        assert!(message.contains("expected end of input"), "{}", message);
        assert_eq!(lexeme, "a");
    }

    #[test]
    fn rejects_truncated_input() {
        let g = ll_expression_grammar();
        let parser = LlParser::new(&g).unwrap();
        let err = parser.parse(&mut tokens("id plus")).unwrap_err();
        let ParseError::Syntax { lexeme, .. } = err;
        assert_eq!(lexeme, "$");
    }

    #[test]
    fn table_is_reusable_after_failure() {
        let g = ll_expression_grammar();
        let parser = LlParser::new(&g).unwrap();
        assert!(parser.parse(&mut tokens("plus")).is_err());
        assert!(parser.parse(&mut tokens("id")).is_ok());
    }

    #[test]
    fn trace_reports_steps() {
        let g = ll_expression_grammar();
        let parser = LlParser::new(&g).unwrap();
        let mut lines = vec![];
        parser
            .parse_with_trace(&mut tokens("id"), &mut |line| lines.push(line.to_owned()))
            .unwrap();
        assert!(lines.iter().any(|line| line.starts_with("expand")));
        assert!(lines.iter().any(|line| line.starts_with("match")));
    }
}
