//! Grammar model types.

use crate::types::{display_with, Map, Queue, Set};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TerminalID {
    raw: u16,
}

impl TerminalID {
    /// Reserved terminal that means the end of input, token class `$`.
    pub const EOI: Self = Self::from_raw(0);

    const OFFSET: u16 = 1;

    #[inline]
    pub(crate) const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    #[inline]
    pub(crate) const fn into_raw(self) -> u16 {
        self.raw
    }
}

/// A set of terminal symbols, backed by a bit set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TerminalIDSet {
    inner: bit_set::BitSet,
}

impl TerminalIDSet {
    pub fn contains(&self, id: TerminalID) -> bool {
        self.inner.contains(id.into_raw().into())
    }
    pub fn insert(&mut self, id: TerminalID) -> bool {
        self.inner.insert(id.into_raw().into())
    }
    pub fn union_with(&mut self, other: &Self) {
        self.inner.union_with(&other.inner)
    }
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.inner.is_disjoint(&other.inner)
    }
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = TerminalID> + '_ {
        self.inner.iter().map(|raw| TerminalID::from_raw(raw as u16))
    }
}

impl FromIterator<TerminalID> for TerminalIDSet {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = TerminalID>,
    {
        Self {
            inner: iter.into_iter().map(|t| usize::from(t.into_raw())).collect(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NonterminalID {
    raw: u16,
}

impl NonterminalID {
    /// Reserved nonterminal for the augmented start symbol `S'`.
    pub const START: Self = Self::from_raw(0);

    const OFFSET: u16 = 1;

    #[inline]
    pub(crate) const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolID {
    T(TerminalID),
    N(NonterminalID),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct RuleID {
    raw: u16,
}

impl RuleID {
    /// Reserved rule `S' -> start`, installed by augmentation.
    pub const ACCEPT: Self = Self::from_raw(0);

    const OFFSET: u16 = 1;

    #[inline]
    pub(crate) const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }
}

/// The token class a terminal symbol matches against, supplied by the
/// external lexer contract: a machine id and a human-readable display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenClass {
    pub id: String,
    pub human: String,
}

impl TokenClass {
    pub fn new(id: impl Into<String>, human: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            human: human.into(),
        }
    }

    /// A class whose display name is its id, the default for DSL terminals.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let human = id.clone();
        Self { id, human }
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct Terminal {
    pub id: TerminalID,
    pub name: String,
    pub class: TokenClass,
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            TerminalID::EOI => f.write_str("$"),
            _ => f.write_str(&self.name),
        }
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct Nonterminal {
    pub id: NonterminalID,
    pub name: String,
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            NonterminalID::START => f.write_str("S'"),
            _ => f.write_str(&self.name),
        }
    }
}

/// A single production. A head's ordered alternatives are the
/// insertion-ordered subsequence of productions sharing a left-hand side;
/// see [`Grammar::rules_of`].
///
/// An empty right-hand side is the epsilon production.
#[derive(Debug)]
#[non_exhaustive]
pub struct Rule {
    pub id: RuleID,
    pub left: NonterminalID,
    pub right: Vec<SymbolID>,
}

impl Rule {
    pub fn is_epsilon(&self) -> bool {
        self.right.is_empty()
    }

    // `"LHS -> R1 R2 R3"`, epsilon rendered as `ε`
    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_with(|f| {
            write!(f, "{} ->", g.nonterminals[&self.left])?;
            if self.right.is_empty() {
                return f.write_str(" ε");
            }
            for symbol in &self.right {
                write!(f, " {}", g.symbol_name(*symbol))?;
            }
            Ok(())
        })
    }
}

/// The grammar definition used to derive the analysis data and parse
/// tables. Logically immutable once built; transforms return new values.
#[derive(Debug)]
#[non_exhaustive]
pub struct Grammar {
    pub terminals: Map<TerminalID, Terminal>,
    pub nonterminals: Map<NonterminalID, Nonterminal>,
    pub rules: Map<RuleID, Rule>,
    pub start_symbol: NonterminalID,
}

impl Grammar {
    /// Parse a grammar from its DSL source form.
    pub fn from_str(source: &str) -> Result<Self, GrammarDefError> {
        crate::syntax::parse(source).map_err(GrammarDefError::Syntax)
    }

    /// Define a grammar using the specified function.
    pub fn define<F>(f: F) -> Result<Self, GrammarDefError>
    where
        F: FnOnce(&mut GrammarDef) -> Result<(), GrammarDefError>,
    {
        let mut def = GrammarDef::default();
        f(&mut def)?;
        def.end()
    }

    pub fn rule(&self, id: RuleID) -> &Rule {
        &self.rules[&id]
    }

    /// The ordered alternatives of a head. Empty when the head has no rule;
    /// callers must check rather than treat absence as an error.
    pub fn rules_of(&self, left: NonterminalID) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.values().filter(move |rule| rule.left == left)
    }

    pub fn symbol_name(&self, symbol: SymbolID) -> &str {
        match symbol {
            SymbolID::T(TerminalID::EOI) => "$",
            SymbolID::T(t) => &self.terminals[&t].name,
            SymbolID::N(NonterminalID::START) => "S'",
            SymbolID::N(n) => &self.nonterminals[&n].name,
        }
    }

    pub fn terminal_by_name(&self, name: &str) -> Option<TerminalID> {
        self.terminals
            .values()
            .find(|t| t.id != TerminalID::EOI && t.name == name)
            .map(|t| t.id)
    }

    pub fn nonterminal_by_name(&self, name: &str) -> Option<NonterminalID> {
        self.nonterminals
            .values()
            .find(|n| n.id != NonterminalID::START && n.name == name)
            .map(|n| n.id)
    }

    /// Map an external token class id onto the terminal declared for it.
    /// The reserved class `$` maps to [`TerminalID::EOI`].
    pub fn terminal_by_class(&self, class_id: &str) -> Option<TerminalID> {
        if class_id == "$" {
            return Some(TerminalID::EOI);
        }
        self.terminals
            .values()
            .find(|t| t.id != TerminalID::EOI && t.class.id == class_id)
            .map(|t| t.id)
    }

    /// Check the structural invariants that every table builder relies on.
    pub fn validate(&self) -> Result<(), ValidateError> {
        // every produced nonterminal must have at least one rule
        for rule in self.rules.values() {
            for symbol in &rule.right {
                if let SymbolID::N(n) = symbol {
                    if self.rules_of(*n).next().is_none() {
                        return Err(ValidateError::MissingRule {
                            nonterminal: self.nonterminals[n].name.clone(),
                            producer: self.nonterminals[&rule.left].to_string(),
                        });
                    }
                }
            }
        }

        if self.rules_of(self.start_symbol).next().is_none() {
            return Err(ValidateError::MissingStartRule {
                start: self.nonterminals[&self.start_symbol].name.clone(),
            });
        }

        // token classes are a bijection onto terminals
        let mut classes = Map::<&str, &Terminal>::default();
        for terminal in self.terminals.values() {
            if terminal.id == TerminalID::EOI {
                continue;
            }
            if let Some(prev) = classes.insert(&terminal.class.id, terminal) {
                return Err(ValidateError::DuplicateTokenClass {
                    class: terminal.class.id.clone(),
                    first: prev.name.clone(),
                    second: terminal.name.clone(),
                });
            }
        }

        for terminal in self.terminals.values() {
            if terminal.id == TerminalID::EOI {
                continue;
            }
            let used = self
                .rules
                .values()
                .any(|rule| rule.right.contains(&SymbolID::T(terminal.id)));
            if !used {
                return Err(ValidateError::UnusedTerminal {
                    terminal: terminal.name.clone(),
                });
            }
        }

        self.check_productive()
    }

    /// Every nonterminal must have at least one terminating derivation.
    /// A full pass that proves nothing new while unproven nonterminals
    /// remain is an inescapable (possibly indirect) derivation cycle.
    fn check_productive(&self) -> Result<(), ValidateError> {
        let mut productive = Set::<NonterminalID>::default();
        loop {
            let mut changed = false;
            for rule in self.rules.values() {
                if productive.contains(&rule.left) {
                    continue;
                }
                let terminating = rule.right.iter().all(|symbol| match symbol {
                    SymbolID::T(..) => true,
                    SymbolID::N(n) => productive.contains(n),
                });
                if terminating {
                    changed |= productive.insert(rule.left);
                }
            }
            if !changed {
                break;
            }
        }

        for n in self.nonterminals.keys() {
            if *n == NonterminalID::START {
                continue;
            }
            if self.rules_of(*n).next().is_some() && !productive.contains(n) {
                return Err(ValidateError::DerivationCycle {
                    nonterminal: self.nonterminals[n].name.clone(),
                });
            }
        }
        Ok(())
    }

    /// The literal derivation path from `from` to `to` over produces-edges,
    /// or `None` when `to` is unreachable from `from`.
    pub fn derivation_path(&self, from: NonterminalID, to: SymbolID) -> Option<Vec<SymbolID>> {
        let mut parents = Map::<SymbolID, SymbolID>::default();
        let mut queue: Queue<SymbolID> = Some(SymbolID::N(from)).into_iter().collect();
        while let Some(symbol) = queue.pop() {
            if symbol == to && !parents.is_empty() {
                let mut path = vec![symbol];
                let mut cursor = symbol;
                while let Some(parent) = parents.get(&cursor) {
                    path.push(*parent);
                    cursor = *parent;
                }
                path.reverse();
                return Some(path);
            }
            if let SymbolID::N(n) = symbol {
                for rule in self.rules_of(n) {
                    for produced in &rule.right {
                        if !parents.contains_key(produced) && *produced != SymbolID::N(from) {
                            parents.insert(*produced, symbol);
                            queue.push(*produced);
                        }
                    }
                }
            }
        }
        if SymbolID::N(from) == to {
            // trivial path, `from` derives itself in zero steps
            return Some(vec![to]);
        }
        None
    }

    /// Whether `from` can (transitively) produce `to`.
    pub fn derives(&self, from: NonterminalID, to: SymbolID) -> bool {
        self.derivation_path(from, to).is_some()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## terminals:")?;
        for terminal in self.terminals.values() {
            if terminal.id == TerminalID::EOI {
                continue;
            }
            writeln!(f, "{} (class: {})", terminal, terminal.class.id)?;
        }

        writeln!(f, "\n## nonterminals:")?;
        for nonterminal in self.nonterminals.values() {
            if nonterminal.id == NonterminalID::START {
                continue;
            }
            write!(f, "{}", nonterminal)?;
            if nonterminal.id == self.start_symbol {
                write!(f, " (start)")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\n## rules:")?;
        for rule in self.rules.values() {
            if rule.id == RuleID::ACCEPT {
                continue;
            }
            writeln!(f, "{}", rule.display(self))?;
        }

        Ok(())
    }
}

/// The contextural values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef {
    terminals: Map<TerminalID, Terminal>,
    nonterminals: Map<NonterminalID, Nonterminal>,
    rules: Map<RuleID, Rule>,
    start: Option<NonterminalID>,
    next_terminal_id: u16,
    next_nonterminal_id: u16,
    next_rule_id: u16,
}

impl Default for GrammarDef {
    fn default() -> Self {
        let mut def = GrammarDef {
            terminals: Map::default(),
            nonterminals: Map::default(),
            rules: Map::default(),
            start: None,
            next_terminal_id: TerminalID::OFFSET,
            next_nonterminal_id: NonterminalID::OFFSET,
            next_rule_id: RuleID::OFFSET,
        };

        def.terminals.insert(
            TerminalID::EOI,
            Terminal {
                id: TerminalID::EOI,
                name: "$".to_owned(),
                class: TokenClass::from_id("$"),
            },
        );
        def.nonterminals.insert(
            NonterminalID::START,
            Nonterminal {
                id: NonterminalID::START,
                name: "S'".to_owned(),
            },
        );

        def
    }
}

impl GrammarDef {
    /// Declare a terminal symbol and the token class it matches.
    pub fn terminal(
        &mut self,
        name: &str,
        class: TokenClass,
    ) -> Result<TerminalID, GrammarDefError> {
        if !verify_terminal_name(name) {
            return Err(GrammarDefError::BadTerminalName { name: name.into() });
        }
        if class.id == "$" || class.id == "undefined" {
            return Err(GrammarDefError::ReservedTokenClass {
                class: class.id.clone(),
            });
        }
        for terminal in self.terminals.values() {
            if terminal.name == name {
                return Err(GrammarDefError::DuplicateTerminal { name: name.into() });
            }
            if terminal.class.id == class.id {
                return Err(GrammarDefError::DuplicateTokenClass {
                    class: class.id.clone(),
                });
            }
        }

        let id = TerminalID::from_raw(self.next_terminal_id);
        self.next_terminal_id += 1;
        self.terminals.insert(
            id,
            Terminal {
                id,
                name: name.to_owned(),
                class,
            },
        );
        Ok(id)
    }

    /// Remove a previously declared terminal. Fails if any rule mentions it.
    pub fn remove_terminal(&mut self, id: TerminalID) -> Result<(), GrammarDefError> {
        if id == TerminalID::EOI {
            return Err(GrammarDefError::ReservedTokenClass { class: "$".into() });
        }
        for rule in self.rules.values() {
            if rule.right.contains(&SymbolID::T(id)) {
                return Err(GrammarDefError::TerminalInUse {
                    name: self.terminals[&id].name.clone(),
                });
            }
        }
        self.terminals.shift_remove(&id);
        Ok(())
    }

    /// Declare a nonterminal symbol.
    pub fn nonterminal(&mut self, name: &str) -> Result<NonterminalID, GrammarDefError> {
        if !verify_nonterminal_name(name) {
            return Err(GrammarDefError::BadNonterminalName { name: name.into() });
        }
        for nonterminal in self.nonterminals.values() {
            if nonterminal.name == name {
                return Err(GrammarDefError::DuplicateNonterminal { name: name.into() });
            }
        }

        let id = NonterminalID::from_raw(self.next_nonterminal_id);
        self.next_nonterminal_id += 1;
        self.nonterminals.insert(id, Nonterminal {
            id,
            name: name.to_owned(),
        });
        Ok(id)
    }

    /// Add a production. An empty `right` is the epsilon production;
    /// epsilon can never co-occur with other symbols since it has no
    /// symbol-level representation.
    pub fn rule<I>(&mut self, left: NonterminalID, right: I) -> Result<RuleID, GrammarDefError>
    where
        I: IntoIterator<Item = SymbolID>,
    {
        let right_: Vec<_> = right.into_iter().collect();
        for rule in self.rules.values() {
            if rule.left == left && rule.right == right_ {
                return Err(GrammarDefError::DuplicateRule {
                    left: self.nonterminals[&left].name.clone(),
                });
            }
        }

        let id = RuleID::from_raw(self.next_rule_id);
        self.next_rule_id += 1;
        self.rules.insert(id, Rule {
            id,
            left,
            right: right_,
        });
        Ok(id)
    }

    /// Specify the start symbol. Defaults to the first declared nonterminal.
    pub fn start_symbol(&mut self, symbol: NonterminalID) {
        self.start.replace(symbol);
    }

    pub(crate) fn end(mut self) -> Result<Grammar, GrammarDefError> {
        let start = match self.start.take() {
            Some(start) => start,
            None => self
                .nonterminals
                .keys()
                .find(|id| **id != NonterminalID::START)
                .copied()
                .ok_or(GrammarDefError::EmptyGrammar)?,
        };

        // augmentation: `S' -> start`
        self.rules.insert(RuleID::ACCEPT, Rule {
            id: RuleID::ACCEPT,
            left: NonterminalID::START,
            right: vec![SymbolID::N(start)],
        });

        Ok(Grammar {
            terminals: self.terminals,
            nonterminals: self.nonterminals,
            rules: self.rules,
            start_symbol: start,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarDefError {
    #[error("syntax error in grammar source: {0}")]
    Syntax(anyhow::Error),

    #[error("invalid terminal name `{}'", name)]
    BadTerminalName { name: String },

    #[error("invalid nonterminal name `{}'", name)]
    BadNonterminalName { name: String },

    #[error("the token class `{}' is reserved", class)]
    ReservedTokenClass { class: String },

    #[error("the terminal `{}' has already been declared", name)]
    DuplicateTerminal { name: String },

    #[error("the nonterminal `{}' has already been declared", name)]
    DuplicateNonterminal { name: String },

    #[error("two terminals would map to the token class `{}'", class)]
    DuplicateTokenClass { class: String },

    #[error("duplicate production rule for `{}'", left)]
    DuplicateRule { left: String },

    #[error("the terminal `{}' is still used by a production", name)]
    TerminalInUse { name: String },

    #[error("a grammar needs at least one nonterminal")]
    EmptyGrammar,
}

#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error("missing rule for nonterminal `{}' produced by `{}'", nonterminal, producer)]
    MissingRule {
        nonterminal: String,
        producer: String,
    },

    #[error("the start symbol `{}' has no rule", start)]
    MissingStartRule { start: String },

    #[error(
        "terminals `{}' and `{}' both map to token class `{}'",
        first,
        second,
        class
    )]
    DuplicateTokenClass {
        class: String,
        first: String,
        second: String,
    },

    #[error("the terminal `{}' is declared but never used", terminal)]
    UnusedTerminal { terminal: String },

    #[error(
        "inescapable derivation cycle: every production of `{}' requires itself",
        nonterminal
    )]
    DerivationCycle { nonterminal: String },
}

/// Terminal names may not collide with the reserved end-of-text symbol or
/// contain separator characters of the grammar DSL.
fn verify_terminal_name(name: &str) -> bool {
    !name.is_empty()
        && name != "$"
        && !name.contains(|c: char| c.is_whitespace() || c == '.' || c == '|')
}

/// Nonterminal heads use the uppercase lexical class, plus the prime
/// suffix generated by the transforms.
fn verify_nonterminal_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_' || c == '-' || c == '\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def_expr() -> Grammar {
        Grammar::define(|g| {
            let plus = g.terminal("+", TokenClass::from_id("+"))?;
            let id = g.terminal("id", TokenClass::from_id("id"))?;
            let e = g.nonterminal("E")?;
            let t = g.nonterminal("T")?;
            g.start_symbol(e);
            g.rule(e, [SymbolID::N(e), SymbolID::T(plus), SymbolID::N(t)])?;
            g.rule(e, [SymbolID::N(t)])?;
            g.rule(t, [SymbolID::T(id)])?;
            Ok(())
        })
        .unwrap()
    }

    #[test]
    fn define_and_validate() {
        let g = def_expr();
        g.validate().unwrap();
        assert_eq!(g.rules_of(g.start_symbol).count(), 2);
        assert_eq!(g.rules[&RuleID::ACCEPT].left, NonterminalID::START);
    }

    #[test]
    fn rejects_reserved_terminal_names() {
        let err = Grammar::define(|g| {
            g.terminal("$", TokenClass::from_id("dollar"))?;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, GrammarDefError::BadTerminalName { .. }));

        let err = Grammar::define(|g| {
            g.terminal("a b", TokenClass::from_id("ab"))?;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, GrammarDefError::BadTerminalName { .. }));

        let err = Grammar::define(|g| {
            g.terminal("x", TokenClass::from_id("undefined"))?;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, GrammarDefError::ReservedTokenClass { .. }));
    }

    #[test]
    fn rejects_duplicate_token_class() {
        let err = Grammar::define(|g| {
            g.terminal("plus", TokenClass::from_id("op"))?;
            g.terminal("minus", TokenClass::from_id("op"))?;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, GrammarDefError::DuplicateTokenClass { .. }));
    }

    #[test]
    fn validate_missing_rule_names_producer() {
        let g = Grammar::define(|g| {
            let x = g.terminal("x", TokenClass::from_id("x"))?;
            let s = g.nonterminal("S")?;
            let a = g.nonterminal("A")?;
            g.rule(s, [SymbolID::N(a), SymbolID::T(x)])?;
            Ok(())
        })
        .unwrap();
        match g.validate().unwrap_err() {
            ValidateError::MissingRule {
                nonterminal,
                producer,
            } => {
                assert_eq!(nonterminal, "A");
                assert_eq!(producer, "S");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_unused_terminal() {
        let g = Grammar::define(|g| {
            let _unused = g.terminal("y", TokenClass::from_id("y"))?;
            let x = g.terminal("x", TokenClass::from_id("x"))?;
            let s = g.nonterminal("S")?;
            g.rule(s, [SymbolID::T(x)])?;
            Ok(())
        })
        .unwrap();
        assert!(matches!(
            g.validate(),
            Err(ValidateError::UnusedTerminal { .. })
        ));
    }

    #[test]
    fn validate_derivation_cycle() {
        // every production of A requires A again, directly or via B
        let g = Grammar::define(|g| {
            let x = g.terminal("x", TokenClass::from_id("x"))?;
            let s = g.nonterminal("S")?;
            let a = g.nonterminal("A")?;
            let b = g.nonterminal("B")?;
            g.rule(s, [SymbolID::T(x)])?;
            g.rule(s, [SymbolID::N(a)])?;
            g.rule(a, [SymbolID::N(b), SymbolID::T(x)])?;
            g.rule(b, [SymbolID::N(a)])?;
            Ok(())
        })
        .unwrap();
        assert!(matches!(
            g.validate(),
            Err(ValidateError::DerivationCycle { .. })
        ));
    }

    #[test]
    fn derivation_path() {
        let g = def_expr();
        let e = g.nonterminal_by_name("E").unwrap();
        let t = g.nonterminal_by_name("T").unwrap();
        let id = g.terminal_by_name("id").unwrap();

        let path = g.derivation_path(e, SymbolID::T(id)).unwrap();
        assert_eq!(*path.first().unwrap(), SymbolID::N(e));
        assert_eq!(*path.last().unwrap(), SymbolID::T(id));
        assert!(path.contains(&SymbolID::N(t)));

        // T never derives E
        assert!(!g.derives(t, SymbolID::N(e)));
    }
}
