//! The parse tree handed to the syntax-directed translation stage.

use std::fmt;

/// Index of a node within its [`ParseTree`] arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeID {
    raw: u32,
}

impl NodeID {
    #[inline]
    const fn from_raw(raw: u32) -> Self {
        Self { raw }
    }
}

#[derive(Debug)]
pub struct ParseNode {
    /// The grammar symbol name; empty for a synthetic epsilon leaf.
    pub symbol: String,
    pub terminal: bool,
    /// The matched source text, present on terminal leaves shifted from
    /// the token stream.
    pub lexeme: Option<String>,
    pub children: Vec<NodeID>,
}

impl ParseNode {
    pub fn is_epsilon(&self) -> bool {
        self.terminal && self.symbol.is_empty()
    }
}

/// An arena-allocated parse tree.
#[derive(Debug, Default)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
    root: Option<NodeID>,
}

impl ParseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_terminal(
        &mut self,
        symbol: impl Into<String>,
        lexeme: impl Into<String>,
    ) -> NodeID {
        self.push(ParseNode {
            symbol: symbol.into(),
            terminal: true,
            lexeme: Some(lexeme.into()),
            children: vec![],
        })
    }

    /// The synthetic empty leaf attached under an epsilon expansion.
    pub(crate) fn add_epsilon(&mut self) -> NodeID {
        self.push(ParseNode {
            symbol: String::new(),
            terminal: true,
            lexeme: None,
            children: vec![],
        })
    }

    pub(crate) fn add_nonterminal(
        &mut self,
        symbol: impl Into<String>,
        children: Vec<NodeID>,
    ) -> NodeID {
        self.push(ParseNode {
            symbol: symbol.into(),
            terminal: false,
            lexeme: None,
            children,
        })
    }

    fn push(&mut self, node: ParseNode) -> NodeID {
        let id = NodeID::from_raw(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(crate) fn attach(&mut self, parent: NodeID, child: NodeID) {
        self.nodes[parent.raw as usize].children.push(child);
    }

    pub(crate) fn set_lexeme(&mut self, id: NodeID, lexeme: impl Into<String>) {
        self.nodes[id.raw as usize].lexeme = Some(lexeme.into());
    }

    pub(crate) fn set_root(&mut self, id: NodeID) {
        self.root = Some(id);
    }

    pub fn node(&self, id: NodeID) -> &ParseNode {
        &self.nodes[id.raw as usize]
    }

    pub fn root(&self) -> Option<NodeID> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Render the tree shape as an s-expression: nonterminals as
    /// `(NAME child ...)`, terminal leaves as their symbol name, epsilon
    /// leaves as `ε`.
    pub fn sexp(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.write_sexp(root, &mut out);
        }
        out
    }

    fn write_sexp(&self, id: NodeID, out: &mut String) {
        let node = self.node(id);
        if node.terminal {
            if node.is_epsilon() {
                out.push('ε');
            } else {
                out.push_str(&node.symbol);
            }
            return;
        }
        out.push('(');
        out.push_str(&node.symbol);
        for child in &node.children {
            out.push(' ');
            self.write_sexp(*child, out);
        }
        out.push(')');
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sexp())
    }
}
