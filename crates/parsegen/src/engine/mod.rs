//! Parse execution engines.
//!
//! Both engines consume a [`TokenStream`](crate::token::TokenStream) and
//! produce a [`ParseTree`](crate::tree::ParseTree). A failed parse never
//! corrupts the parser; the same table drives any number of subsequent
//! calls. An optional trace callback receives a human-readable line for
//! every primitive step, purely observational.

mod ll;
mod lr;

pub use self::ll::LlParser;
pub use self::lr::LrParser;

use crate::token::Token;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(
        "syntax error at line {line}, column {column} near `{lexeme}': {message}{}",
        excerpt(.source_line)
    )]
    Syntax {
        message: String,
        lexeme: String,
        line: u32,
        column: u32,
        /// The offending token's full source line, empty when the lexer
        /// does not retain line text.
        source_line: String,
    },
}

fn excerpt(source_line: &String) -> String {
    if source_line.is_empty() {
        String::new()
    } else {
        format!("\n  {}", source_line)
    }
}

impl ParseError {
    fn at_token(message: impl Into<String>, token: &impl Token) -> Self {
        Self::Syntax {
            message: message.into(),
            lexeme: token.lexeme().to_owned(),
            line: token.line(),
            column: token.column(),
            source_line: token.source_line().to_owned(),
        }
    }

    fn at_end(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            lexeme: "$".to_owned(),
            line: 0,
            column: 0,
            source_line: String::new(),
        }
    }
}

/// `"a"`, `"a or b"`, `"a, b, or c"`.
fn join_expected(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [single] => single.clone(),
        [left, right] => format!("{} or {}", left, right),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_phrasing() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(join_expected(&names(&["id"])), "id");
        assert_eq!(join_expected(&names(&["id", "lparen"])), "id or lparen");
        assert_eq!(
            join_expected(&names(&["id", "lparen", "$"])),
            "id, lparen, or $"
        );
    }
}
