//! Contracts for the external lexer collaborator.
//!
//! The parse engines never see raw source text; they consume a stream of
//! tokens, each tagged with the [`TokenClass`] the grammar's terminals
//! match against. Exhaustion is represented by `None`, which the engines
//! treat as the end-of-input terminal `$`.

use crate::grammar::TokenClass;

/// A single token produced by the lexer.
pub trait Token {
    fn class(&self) -> &TokenClass;

    /// The matched source text, carried into the parse tree and into
    /// syntax error messages.
    fn lexeme(&self) -> &str;

    /// 1-based source line, 0 when unknown.
    fn line(&self) -> u32;

    /// 1-based character position within the line, 0 when unknown.
    fn column(&self) -> u32;

    /// The full source line the token came from, for error excerpts.
    /// Empty when the lexer does not retain line text.
    fn source_line(&self) -> &str {
        ""
    }
}

/// A sequential token source with one token of lookahead.
pub trait TokenStream {
    type Token: Token;

    /// The upcoming token without consuming it.
    fn peek(&mut self) -> Option<&Self::Token>;

    /// Consume and return the upcoming token.
    fn next_token(&mut self) -> Option<Self::Token>;

    fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }
}

/// Adapter implementing [`TokenStream`] over any token iterator, eager
/// or lazy.
#[derive(Debug)]
pub struct IterStream<I: Iterator> {
    iter: I,
    peeked: Option<I::Item>,
}

impl<I: Iterator> IterStream<I> {
    pub fn new<T>(tokens: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: tokens.into_iter(),
            peeked: None,
        }
    }
}

impl<I> TokenStream for IterStream<I>
where
    I: Iterator,
    I::Item: Token,
{
    type Token = I::Item;

    fn peek(&mut self) -> Option<&Self::Token> {
        if self.peeked.is_none() {
            self.peeked = self.iter.next();
        }
        self.peeked.as_ref()
    }

    fn next_token(&mut self) -> Option<Self::Token> {
        match self.peeked.take() {
            Some(token) => Some(token),
            None => self.iter.next(),
        }
    }
}

/// The simplest conforming token, used by the test suites.
#[derive(Debug, Clone)]
pub struct SimpleToken {
    pub class: TokenClass,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
    pub source_line: String,
}

impl SimpleToken {
    /// A token whose class id and lexeme are both `spelling`, with no
    /// position information.
    pub fn new(spelling: &str) -> Self {
        Self {
            class: TokenClass::from_id(spelling),
            lexeme: spelling.to_owned(),
            line: 0,
            column: 0,
            source_line: String::new(),
        }
    }

    pub fn at(spelling: &str, line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            ..Self::new(spelling)
        }
    }
}

impl Token for SimpleToken {
    fn class(&self) -> &TokenClass {
        &self.class
    }

    fn lexeme(&self) -> &str {
        &self.lexeme
    }

    fn line(&self) -> u32 {
        self.line
    }

    fn column(&self) -> u32 {
        self.column
    }

    fn source_line(&self) -> &str {
        &self.source_line
    }
}

/// Tokenize a whitespace-separated spelling list, e.g. `"id plus id"`.
/// Every token carries `source` as its source line.
pub fn tokens(source: &str) -> IterStream<std::vec::IntoIter<SimpleToken>> {
    let tokens: Vec<SimpleToken> = source
        .split_whitespace()
        .map(|spelling| SimpleToken {
            source_line: source.to_owned(),
            ..SimpleToken::new(spelling)
        })
        .collect();
    IterStream::new(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let mut stream = tokens("id plus id");
        assert_eq!(stream.peek().unwrap().lexeme(), "id");
        assert_eq!(stream.peek().unwrap().lexeme(), "id");
        assert_eq!(stream.next_token().unwrap().lexeme(), "id");
        assert_eq!(stream.peek().unwrap().lexeme(), "plus");
    }

    #[test]
    fn exhaustion_is_none() {
        let mut stream = tokens("id");
        assert!(stream.has_next());
        stream.next_token();
        assert!(!stream.has_next());
        assert!(stream.next_token().is_none());
    }
}
