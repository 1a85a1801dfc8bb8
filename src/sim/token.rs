//! Token kinds that can occupy a grid cell

use serde::{Deserialize, Serialize};

/// One of the six fixed token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    Apple,
    Cherry,
    Lemon,
    Grape,
    Coconut,
    Peach,
}

impl TokenKind {
    /// Every kind, in declaration order
    pub const ALL: [TokenKind; 6] = [
        TokenKind::Apple,
        TokenKind::Cherry,
        TokenKind::Lemon,
        TokenKind::Grape,
        TokenKind::Coconut,
        TokenKind::Peach,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Apple => "apple",
            TokenKind::Cherry => "cherry",
            TokenKind::Lemon => "lemon",
            TokenKind::Grape => "grape",
            TokenKind::Coconut => "coconut",
            TokenKind::Peach => "peach",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "apple" => Some(TokenKind::Apple),
            "cherry" => Some(TokenKind::Cherry),
            "lemon" => Some(TokenKind::Lemon),
            "grape" => Some(TokenKind::Grape),
            "coconut" => Some(TokenKind::Coconut),
            "peach" => Some(TokenKind::Peach),
            _ => None,
        }
    }

    /// Single-letter tag used by text fixtures and the demo printout
    pub fn letter(&self) -> char {
        match self {
            TokenKind::Apple => 'A',
            TokenKind::Cherry => 'C',
            TokenKind::Lemon => 'L',
            TokenKind::Grape => 'G',
            TokenKind::Coconut => 'O',
            TokenKind::Peach => 'P',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.letter() == c.to_ascii_uppercase())
    }
}
