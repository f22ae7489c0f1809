use std::{fmt::Display, rc::Rc};

use crate::lexer::tokens::{Token, TokenKind};

/// A token paired with everything it expanded into. Plain tokens have an
/// empty expansion; `$reference` and `%USE` roots hold their bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub root: Rc<Token>,
    pub expansion: Vec<Unit>,
}

impl Unit {
    pub fn leaf(root: Rc<Token>) -> Self {
        Unit {
            root,
            expansion: vec![],
        }
    }

    pub fn is_expansion(&self) -> bool {
        matches!(self.root.kind, TokenKind::PpReference | TokenKind::PpUse)
    }

    fn flatten_into(&self, out: &mut Vec<Token>) {
        if self.is_expansion() {
            for child in &self.expansion {
                child.flatten_into(out);
            }
        } else {
            out.push(self.root.as_ref().clone());
        }
    }

    fn render(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        write!(f, "{}{} => {{", "\t".repeat(depth), self.root)?;
        if !self.expansion.is_empty() {
            writeln!(f)?;
            for child in &self.expansion {
                child.render(f, depth + 1)?;
                writeln!(f)?;
            }
            write!(f, "{}", "\t".repeat(depth))?;
        }
        write!(f, "}}")
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.render(f, 0)
    }
}

/// Linearizes a unit tree into the token stream it denotes, replacing every
/// expansion root with its expanded tokens.
pub fn flatten(units: &[Unit]) -> Vec<Token> {
    let mut out = vec![];
    for unit in units {
        unit.flatten_into(&mut out);
    }
    out
}
