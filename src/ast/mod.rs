//! Syntax tree definitions for Storyscript.
//!
//! The tree is produced by an external parser from the token stream and
//! rewritten in place by the lowering pass. Leaves keep the token kind and
//! text plus a dotted [`LineId`].

pub mod line;

pub use line::{LineId, LineIdError};

use crate::lexer::{Token, TokenKind, TokenValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an interior tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Start,
    Block,
    NestedBlock,
    Line,
    Statement,
    Assignment,
    AssignmentFragment,
    Path,
    PathFragment,
    BaseExpression,
    Expression,
    Entity,
    Values,
    String,
    Number,
    Boolean,
    List,
    Map,
    Service,
    Mutation,
    Arguments,
    Call,
    IfBlock,
    ElseBlock,
    ReturnStatement,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Start => "start",
            NodeKind::Block => "block",
            NodeKind::NestedBlock => "nested_block",
            NodeKind::Line => "line",
            NodeKind::Statement => "statement",
            NodeKind::Assignment => "assignment",
            NodeKind::AssignmentFragment => "assignment_fragment",
            NodeKind::Path => "path",
            NodeKind::PathFragment => "path_fragment",
            NodeKind::BaseExpression => "base_expression",
            NodeKind::Expression => "expression",
            NodeKind::Entity => "entity",
            NodeKind::Values => "values",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::List => "list",
            NodeKind::Map => "map",
            NodeKind::Service => "service",
            NodeKind::Mutation => "mutation",
            NodeKind::Arguments => "arguments",
            NodeKind::Call => "call",
            NodeKind::IfBlock => "if_block",
            NodeKind::ElseBlock => "else_block",
            NodeKind::ReturnStatement => "return_statement",
        };
        f.write_str(name)
    }
}

/// A token as stored in the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub kind: TokenKind,
    pub value: String,
    pub line: LineId,
}

impl Leaf {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: LineId) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
        }
    }

    /// Builds a leaf from a lexer token, keeping its text and source line.
    pub fn from_token(token: &Token) -> Self {
        let value = match &token.value {
            TokenValue::Text(text) => text.clone(),
            TokenValue::None => String::new(),
            other => other.to_string(),
        };
        Self::new(token.kind, value, LineId::from(token.line))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Child {
    Token(Leaf),
    Node(Tree),
}

impl Child {
    pub fn line(&self) -> Option<&LineId> {
        match self {
            Child::Token(leaf) => Some(&leaf.line),
            Child::Node(tree) => tree.line(),
        }
    }

    pub fn as_node(&self) -> Option<&Tree> {
        match self {
            Child::Node(tree) => Some(tree),
            Child::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Leaf> {
        match self {
            Child::Token(leaf) => Some(leaf),
            Child::Node(_) => None,
        }
    }
}

impl From<Leaf> for Child {
    fn from(leaf: Leaf) -> Self {
        Child::Token(leaf)
    }
}

impl From<Tree> for Child {
    fn from(tree: Tree) -> Self {
        Child::Node(tree)
    }
}

/// An interior node with ordered children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub kind: NodeKind,
    pub children: Vec<Child>,
}

impl Tree {
    pub fn new(kind: NodeKind, children: Vec<Child>) -> Self {
        Self { kind, children }
    }

    /// The first token reachable through first children, depth first.
    pub fn find_first_token(&self) -> Option<&Leaf> {
        self.children.iter().find_map(|child| match child {
            Child::Token(leaf) => Some(leaf),
            Child::Node(tree) => tree.find_first_token(),
        })
    }

    /// Line of the first token, if the subtree has any tokens.
    pub fn line(&self) -> Option<&LineId> {
        self.find_first_token().map(|leaf| &leaf.line)
    }

    /// First direct child node of the given kind.
    pub fn node(&self, kind: NodeKind) -> Option<&Tree> {
        self.children
            .iter()
            .filter_map(Child::as_node)
            .find(|tree| tree.kind == kind)
    }

    pub fn path(&self) -> Option<&Tree> {
        self.node(NodeKind::Path)
    }

    pub fn child(&self, index: usize) -> Option<&Child> {
        self.children.get(index)
    }

    /// Visits every token in the subtree, in order.
    pub fn for_each_token_mut(&mut self, f: &mut impl FnMut(&mut Leaf)) {
        for child in &mut self.children {
            match child {
                Child::Token(leaf) => f(leaf),
                Child::Node(tree) => tree.for_each_token_mut(f),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: &str, line: u32) -> Leaf {
        Leaf::new(TokenKind::Path, value, LineId::new(line))
    }

    fn sample() -> Tree {
        Tree::new(
            NodeKind::Assignment,
            vec![
                Tree::new(NodeKind::Path, vec![leaf("x", 3).into()]).into(),
                Tree::new(
                    NodeKind::AssignmentFragment,
                    vec![
                        Leaf::new(TokenKind::Eq, "=", LineId::new(3)).into(),
                        Tree::new(NodeKind::Number, vec![leaf("1", 4).into()]).into(),
                    ],
                )
                .into(),
            ],
        )
    }

    #[test]
    fn test_line_is_first_token_line() {
        assert_eq!(sample().line(), Some(&LineId::new(3)));
        assert_eq!(Tree::new(NodeKind::Block, vec![]).line(), None);
    }

    #[test]
    fn test_path_lookup() {
        let tree = sample();
        let path = tree.path().unwrap();
        assert_eq!(path.find_first_token().unwrap().value, "x");
        assert!(tree.node(NodeKind::Service).is_none());
    }

    #[test]
    fn test_for_each_token_mut_visits_all() {
        let mut tree = sample();
        let mut count = 0;
        tree.for_each_token_mut(&mut |leaf: &mut Leaf| {
            leaf.line = LineId::new(9);
            count += 1;
        });
        assert_eq!(count, 3);
        assert_eq!(tree.line(), Some(&LineId::new(9)));
    }

    #[test]
    fn test_leaf_from_token() {
        let token = Token::new(TokenKind::Digits, TokenValue::Fraction(0.5), 2, 7);
        let leaf = Leaf::from_token(&token);
        assert_eq!(leaf.value, "0.5");
        assert_eq!(leaf.line, LineId::new(2));
    }
}
