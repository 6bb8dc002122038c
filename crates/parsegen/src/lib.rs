//! Grammar analysis and parser-table construction.
//!
//! Given a context-free grammar, this crate derives the classic analysis
//! data (FIRST/FOLLOW sets, LR item automata) and the parse tables that
//! drive LL(1) and LR-family parsers, and ships two interpreting engines
//! that execute those tables against an external token stream to produce
//! a parse tree.
//!
//! Lexing and attribute evaluation are external collaborators; see the
//! traits in [`token`] and the [`tree::ParseTree`] handoff value.

pub mod analysis;
pub mod engine;
pub mod grammar;
pub mod lr;
pub mod syntax;
pub mod table;
pub mod token;
pub mod transform;
pub mod tree;

mod types;
